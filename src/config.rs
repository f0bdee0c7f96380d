//! Configuration structures for kaldi-rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub recognizer: RecognizerConfig,
    pub audio: AudioConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, crate::error::ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            crate::error::ConfigError::FileNotFound(path.display().to_string())
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::ConfigError::Parse(e.to_string()))
    }
}

/// Model lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Explicit model directory; takes precedence over name/lang lookup
    pub path: Option<PathBuf>,
    /// Directories searched when resolving a model by name or language
    pub model_dirs: Vec<PathBuf>,
    /// Exact model directory name, e.g. "vosk-model-small-en-us-0.15"
    pub name: Option<String>,
    /// Language code used for prefix lookup, e.g. "en-us"
    pub lang: Option<String>,
    /// Optional speaker identification model directory
    pub speaker_model_path: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            model_dirs: vec![PathBuf::from("./models")],
            name: None,
            lang: Some("en-us".to_string()),
            speaker_model_path: None,
        }
    }
}

/// Recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Sample rate of the audio fed to the engine (Hz)
    pub sample_rate: f32,
    /// Number of alternative hypotheses to request (0 = single best)
    pub max_alternatives: u16,
    /// Include per-word timing in results
    pub words: bool,
    /// Include per-word timing in partial results
    pub partial_words: bool,
    /// Emit NLSML instead of JSON
    pub nlsml: bool,
    /// Restrict recognition to these phrases
    pub grammar: Option<Vec<String>>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000.0,
            max_alternatives: 0,
            words: true,
            partial_words: false,
            nlsml: false,
            grammar: None,
        }
    }
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate (Hz)
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Buffer size in frames
    pub buffer_size: u32,
    /// Audio device name (None = default device)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_size: 1024,
            device: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (None = console only)
    pub output_path: Option<PathBuf>,
    /// Include timestamps in text output
    pub enable_timestamps: bool,
    /// Enable console output
    pub enable_console: bool,
    /// Words per subtitle line in SRT output
    pub words_per_line: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            output_path: None,
            enable_timestamps: true,
            enable_console: true,
            words_per_line: 7,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Engine JSON, one object per utterance
    Json,
    /// SRT subtitle format
    Srt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Srt => write!(f, "srt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.recognizer.sample_rate, 16000.0);
        assert_eq!(config.recognizer.max_alternatives, 0);
        assert!(config.recognizer.words);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.output.words_per_line, 7);
        assert_eq!(config.model.lang.as_deref(), Some("en-us"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [model]
            name = "vosk-model-small-en-us-0.15"
            model_dirs = ["/opt/models"]

            [recognizer]
            sample_rate = 8000.0
            max_alternatives = 3
            nlsml = true
            grammar = ["yes", "no", "[unk]"]

            [output]
            format = "srt"
            words_per_line = 5
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name.as_deref(), Some("vosk-model-small-en-us-0.15"));
        assert_eq!(config.recognizer.sample_rate, 8000.0);
        assert_eq!(config.recognizer.max_alternatives, 3);
        assert!(config.recognizer.nlsml);
        assert_eq!(
            config.recognizer.grammar.as_deref(),
            Some(&["yes".to_string(), "no".to_string(), "[unk]".to_string()][..])
        );
        assert_eq!(config.output.format, OutputFormat::Srt);
        assert_eq!(config.output.words_per_line, 5);
    }
}
