//! Engine model handles and model directory lookup

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::engine::sys;
use crate::error::ModelError;

/// Owned handle to a loaded recognition model.
///
/// The underlying engine object is created once here and released exactly
/// once when the value is dropped. Recognizers borrow the model; the engine
/// keeps its own internal reference, so a `Model` may be dropped before the
/// recognizers created from it.
pub struct Model {
    handle: NonNull<sys::VoskModel>,
}

impl Model {
    /// Load a model from a directory on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }

        info!("Loading model from: {}", path.display());

        let c_path = path_to_cstring(path)?;
        let raw = unsafe { sys::vosk_model_new(c_path.as_ptr()) };
        let handle = NonNull::new(raw)
            .ok_or_else(|| ModelError::LoadFailed(path.display().to_string()))?;

        debug!("Model loaded: {}", path.display());
        Ok(Self { handle })
    }

    /// Resolve a model directory from configuration and load it.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelError> {
        let path = resolve_model_path(config)?;
        Self::open(path)
    }

    /// Look up a word in the model vocabulary.
    ///
    /// Returns the word's symbol index, or `None` if the model cannot
    /// recognize it.
    pub fn find_word(&self, word: &str) -> Option<u32> {
        let c_word = CString::new(word).ok()?;
        let index = unsafe { sys::vosk_model_find_word(self.handle.as_ptr(), c_word.as_ptr()) };
        u32::try_from(index).ok()
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::VoskModel {
        self.handle.as_ptr()
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        unsafe { sys::vosk_model_free(self.handle.as_ptr()) };
    }
}

// Safety: the engine only reads a model after loading; recognizers take
// their own internal reference.
unsafe impl Send for Model {}
unsafe impl Sync for Model {}

/// Owned handle to a speaker identification model.
pub struct SpeakerModel {
    handle: NonNull<sys::VoskSpkModel>,
}

impl SpeakerModel {
    /// Load a speaker model from a directory on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }

        info!("Loading speaker model from: {}", path.display());

        let c_path = path_to_cstring(path)?;
        let raw = unsafe { sys::vosk_spk_model_new(c_path.as_ptr()) };
        let handle = NonNull::new(raw)
            .ok_or_else(|| ModelError::SpeakerLoadFailed(path.display().to_string()))?;

        Ok(Self { handle })
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::VoskSpkModel {
        self.handle.as_ptr()
    }
}

impl Drop for SpeakerModel {
    fn drop(&mut self) {
        unsafe { sys::vosk_spk_model_free(self.handle.as_ptr()) };
    }
}

unsafe impl Send for SpeakerModel {}
unsafe impl Sync for SpeakerModel {}

/// Resolve the model directory from configuration.
///
/// Precedence: explicit `path`, then lookup by `name`, then lookup by
/// `lang` prefix across `model_dirs`.
pub fn resolve_model_path(config: &ModelConfig) -> Result<PathBuf, ModelError> {
    if let Some(ref path) = config.path {
        return Ok(path.clone());
    }
    if let Some(ref name) = config.name {
        return find_by_name(&config.model_dirs, name);
    }
    if let Some(ref lang) = config.lang {
        return find_by_lang(&config.model_dirs, lang);
    }
    Err(ModelError::NoMatch(
        "any model".to_string(),
        dirs_display(&config.model_dirs),
    ))
}

fn find_by_name(dirs: &[PathBuf], name: &str) -> Result<PathBuf, ModelError> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }
    Err(ModelError::NoMatch(name.to_string(), dirs_display(dirs)))
}

fn find_by_lang(dirs: &[PathBuf], lang: &str) -> Result<PathBuf, ModelError> {
    let small_prefix = format!("vosk-model-small-{}", lang);
    let full_prefix = format!("vosk-model-{}", lang);

    for dir in dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();

        for candidate in &names {
            if candidate.starts_with(&small_prefix) || candidate.starts_with(&full_prefix) {
                return Ok(dir.join(candidate));
            }
        }
    }
    Err(ModelError::NoMatch(lang.to_string(), dirs_display(dirs)))
}

fn dirs_display(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn path_to_cstring(path: &Path) -> Result<CString, ModelError> {
    let s = path
        .to_str()
        .ok_or_else(|| ModelError::InvalidPath(path.display().to_string()))?;
    CString::new(s).map_err(|_| ModelError::InvalidPath(path.display().to_string()))
}

#[cfg(all(test, not(feature = "vosk")))]
mod tests {
    use super::*;

    fn temp_model_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("kaldi-rs-tests").join(name);
        std::fs::create_dir_all(&dir).expect("create temp model dir");
        dir
    }

    #[test]
    fn test_open_missing_path() {
        let result = Model::open("/nonexistent/model-dir");
        assert!(matches!(result, Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_open_engine_refusal() {
        // The stub engine rejects paths containing "corrupt" even though
        // the directory exists on disk.
        let dir = temp_model_dir("corrupt-model");
        let result = Model::open(&dir);
        assert!(matches!(result, Err(ModelError::LoadFailed(_))));
    }

    #[test]
    fn test_find_word() {
        let dir = temp_model_dir("vocab-model");
        let model = Model::open(&dir).expect("model should load");

        assert_eq!(model.find_word("one"), Some(0));
        assert_eq!(model.find_word("three"), Some(2));
        assert_eq!(model.find_word("banana"), None);
    }

    #[test]
    fn test_speaker_model_missing_path() {
        let result = SpeakerModel::open("/nonexistent/spk-model");
        assert!(matches!(result, Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_resolve_by_name() {
        let root = temp_model_dir("by-name");
        std::fs::create_dir_all(root.join("vosk-model-small-en-us-0.15")).unwrap();

        let config = ModelConfig {
            model_dirs: vec![root.clone()],
            name: Some("vosk-model-small-en-us-0.15".to_string()),
            lang: None,
            ..Default::default()
        };

        let path = resolve_model_path(&config).expect("should resolve");
        assert_eq!(path, root.join("vosk-model-small-en-us-0.15"));
    }

    #[test]
    fn test_resolve_by_lang() {
        let root = temp_model_dir("by-lang");
        std::fs::create_dir_all(root.join("vosk-model-small-de-0.15")).unwrap();

        let config = ModelConfig {
            model_dirs: vec![root.clone()],
            name: None,
            lang: Some("de".to_string()),
            ..Default::default()
        };

        let path = resolve_model_path(&config).expect("should resolve");
        assert_eq!(path, root.join("vosk-model-small-de-0.15"));
    }

    #[test]
    fn test_resolve_no_match() {
        let root = temp_model_dir("no-match");
        let config = ModelConfig {
            model_dirs: vec![root],
            name: None,
            lang: Some("xx".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            resolve_model_path(&config),
            Err(ModelError::NoMatch(_, _))
        ));
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = ModelConfig {
            path: Some(PathBuf::from("/explicit/model")),
            name: Some("ignored".to_string()),
            ..Default::default()
        };

        let path = resolve_model_path(&config).expect("explicit path");
        assert_eq!(path, PathBuf::from("/explicit/model"));
    }
}
