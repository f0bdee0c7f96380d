//! The recognizer handle
//!
//! A `Recognizer` owns exactly one engine recognizer instance. It is created
//! by one of three constructors, mutated in place by configuration setters
//! and waveform ingestion, and released exactly once on drop. Ownership is
//! move-only, so double-free and use-after-teardown cannot be expressed.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr::NonNull;

use crate::config::RecognizerConfig;
use crate::engine::sys;
use crate::error::RecognizerError;
use crate::model::{Model, SpeakerModel};

/// Decoder state reported by waveform ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingState {
    /// The current utterance is still in progress.
    Running,
    /// The engine detected the end of an utterance; `result()` carries it.
    Finalized,
    /// The engine could not process the chunk.
    Failed,
}

/// One recognition session on the engine.
pub struct Recognizer {
    handle: NonNull<sys::VoskRecognizer>,
}

impl Recognizer {
    /// Create a recognizer for `model` expecting audio at `sample_rate` Hz.
    pub fn new(model: &Model, sample_rate: f32) -> Result<Self, RecognizerError> {
        let raw = unsafe { sys::vosk_recognizer_new(model.as_ptr(), sample_rate) };
        Self::from_raw(raw, sample_rate)
    }

    /// Create a recognizer that also produces speaker identification
    /// vectors in its final results.
    pub fn with_speaker_model(
        model: &Model,
        sample_rate: f32,
        speaker_model: &SpeakerModel,
    ) -> Result<Self, RecognizerError> {
        let raw = unsafe {
            sys::vosk_recognizer_new_spk(model.as_ptr(), sample_rate, speaker_model.as_ptr())
        };
        Self::from_raw(raw, sample_rate)
    }

    /// Create a recognizer constrained to the given phrase list.
    ///
    /// Phrases are serialized to the engine's JSON grammar format. Include
    /// `"[unk]"` to allow out-of-grammar words to be reported as unknown.
    pub fn with_grammar<S: AsRef<str>>(
        model: &Model,
        sample_rate: f32,
        phrases: &[S],
    ) -> Result<Self, RecognizerError> {
        let grammar = grammar_cstring(phrases)?;
        let raw = unsafe {
            sys::vosk_recognizer_new_grm(model.as_ptr(), sample_rate, grammar.as_ptr())
        };
        Self::from_raw(raw, sample_rate)
    }

    /// Create a recognizer and apply every option from the configuration.
    pub fn from_config(model: &Model, config: &RecognizerConfig) -> Result<Self, RecognizerError> {
        let mut recognizer = match &config.grammar {
            Some(phrases) => Self::with_grammar(model, config.sample_rate, phrases)?,
            None => Self::new(model, config.sample_rate)?,
        };

        recognizer.set_max_alternatives(config.max_alternatives);
        recognizer.set_words(config.words);
        recognizer.set_partial_words(config.partial_words);
        if config.nlsml {
            recognizer.set_nlsml(true);
        }

        Ok(recognizer)
    }

    fn from_raw(raw: *mut sys::VoskRecognizer, sample_rate: f32) -> Result<Self, RecognizerError> {
        NonNull::new(raw)
            .map(|handle| Self { handle })
            .ok_or(RecognizerError::CreationFailed { sample_rate })
    }

    /// Request up to `n` alternative hypotheses per result (0 = single best).
    pub fn set_max_alternatives(&mut self, n: u16) {
        unsafe {
            sys::vosk_recognizer_set_max_alternatives(self.handle.as_ptr(), c_int::from(n))
        };
    }

    /// Include per-word timing in results.
    pub fn set_words(&mut self, enable: bool) {
        unsafe { sys::vosk_recognizer_set_words(self.handle.as_ptr(), c_int::from(enable)) };
    }

    /// Include per-word timing in partial results.
    pub fn set_partial_words(&mut self, enable: bool) {
        unsafe {
            sys::vosk_recognizer_set_partial_words(self.handle.as_ptr(), c_int::from(enable))
        };
    }

    /// Emit NLSML instead of JSON.
    pub fn set_nlsml(&mut self, enable: bool) {
        unsafe { sys::vosk_recognizer_set_nlsml(self.handle.as_ptr(), c_int::from(enable)) };
    }

    /// Rebind the speaker identification model.
    ///
    /// The speaker model is borrowed; the engine takes its own internal
    /// reference and this recognizer never frees it.
    pub fn set_speaker_model(&mut self, speaker_model: &SpeakerModel) {
        unsafe {
            sys::vosk_recognizer_set_spk_model(self.handle.as_ptr(), speaker_model.as_ptr())
        };
    }

    /// Rebind the recognition grammar at runtime.
    pub fn set_grammar<S: AsRef<str>>(&mut self, phrases: &[S]) -> Result<(), RecognizerError> {
        let grammar = grammar_cstring(phrases)?;
        unsafe { sys::vosk_recognizer_set_grm(self.handle.as_ptr(), grammar.as_ptr()) };
        Ok(())
    }

    /// Feed 16-bit mono PCM samples into the decoder.
    pub fn accept_waveform(&mut self, samples: &[i16]) -> Result<DecodingState, RecognizerError> {
        let byte_len = samples.len() * 2;
        if byte_len > c_int::MAX as usize {
            return Err(RecognizerError::WaveformTooLarge(byte_len));
        }
        let state = unsafe {
            sys::vosk_recognizer_accept_waveform(
                self.handle.as_ptr(),
                samples.as_ptr() as *const c_char,
                byte_len as c_int,
            )
        };
        Ok(decoding_state(state))
    }

    /// Feed raw signed 16-bit little-endian PCM bytes into the decoder.
    pub fn accept_waveform_bytes(&mut self, data: &[u8]) -> Result<DecodingState, RecognizerError> {
        if data.len() > c_int::MAX as usize {
            return Err(RecognizerError::WaveformTooLarge(data.len()));
        }
        let state = unsafe {
            sys::vosk_recognizer_accept_waveform(
                self.handle.as_ptr(),
                data.as_ptr() as *const c_char,
                data.len() as c_int,
            )
        };
        Ok(decoding_state(state))
    }

    /// The hypothesis for the most recently finalized utterance.
    ///
    /// Formatted as JSON, or NLSML when enabled. See [`crate::result`] for
    /// typed parsing.
    pub fn result(&mut self) -> String {
        let ptr = unsafe { sys::vosk_recognizer_result(self.handle.as_ptr()) };
        copy_engine_string(ptr)
    }

    /// The provisional hypothesis for the utterance in progress.
    pub fn partial_result(&mut self) -> String {
        let ptr = unsafe { sys::vosk_recognizer_partial_result(self.handle.as_ptr()) };
        copy_engine_string(ptr)
    }

    /// Flush the decoder and return the hypothesis for any remaining audio.
    pub fn final_result(&mut self) -> String {
        let ptr = unsafe { sys::vosk_recognizer_final_result(self.handle.as_ptr()) };
        copy_engine_string(ptr)
    }

    /// Clear accumulated decoding state so the recognizer can be reused
    /// for a new utterance without reallocation.
    pub fn reset(&mut self) {
        unsafe { sys::vosk_recognizer_reset(self.handle.as_ptr()) };
    }
}

impl Drop for Recognizer {
    fn drop(&mut self) {
        unsafe { sys::vosk_recognizer_free(self.handle.as_ptr()) };
    }
}

// Safety: a recognizer may move between threads, but the engine requires
// exclusive access per instance, which `&mut self` already enforces.
// Deliberately not Sync.
unsafe impl Send for Recognizer {}

fn decoding_state(raw: c_int) -> DecodingState {
    match raw {
        0 => DecodingState::Running,
        r if r > 0 => DecodingState::Finalized,
        _ => DecodingState::Failed,
    }
}

// The engine owns the returned buffer and reuses it on the next call into
// the same recognizer, so the contents are copied out immediately.
fn copy_engine_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

fn grammar_cstring<S: AsRef<str>>(phrases: &[S]) -> Result<CString, RecognizerError> {
    let phrases: Vec<&str> = phrases.iter().map(|p| p.as_ref()).collect();
    let json = serde_json::to_string(&phrases).map_err(|_| RecognizerError::InvalidGrammar)?;
    CString::new(json).map_err(|_| RecognizerError::InvalidGrammar)
}

#[cfg(all(test, not(feature = "vosk")))]
mod tests {
    use super::*;

    fn test_model(name: &str) -> Model {
        let dir = std::env::temp_dir().join("kaldi-rs-tests").join(name);
        std::fs::create_dir_all(&dir).expect("create temp model dir");
        Model::open(&dir).expect("stub model should load")
    }

    fn calls(recognizer: &Recognizer) -> sys::CallCounts {
        unsafe { sys::vosk_mock_call_counts(recognizer.handle.as_ptr()) }
    }

    /// One second of silence at 16 kHz, enough to finalize an utterance on
    /// the stub engine.
    fn one_second() -> Vec<i16> {
        vec![0; 16000]
    }

    #[test]
    fn test_creation_failed() {
        let model = test_model("rec-bad-rate");
        let result = Recognizer::new(&model, 0.0);
        assert!(matches!(
            result,
            Err(RecognizerError::CreationFailed { .. })
        ));
    }

    #[test]
    fn test_forwards_exactly_once() {
        let model = test_model("rec-forwarding");
        let mut rec = Recognizer::new(&model, 16000.0).unwrap();

        rec.set_max_alternatives(2);
        rec.set_words(true);
        rec.set_partial_words(false);
        rec.set_nlsml(false);
        rec.set_grammar(&["yes", "no"]).unwrap();
        rec.accept_waveform(&[0i16; 100]).unwrap();
        rec.accept_waveform(&[0i16; 100]).unwrap();
        let _ = rec.partial_result();
        let _ = rec.result();
        let _ = rec.final_result();
        rec.reset();

        let counts = calls(&rec);
        assert_eq!(counts.set_max_alternatives, 1);
        assert_eq!(counts.set_words, 1);
        assert_eq!(counts.set_partial_words, 1);
        assert_eq!(counts.set_nlsml, 1);
        assert_eq!(counts.set_grm, 1);
        assert_eq!(counts.accept_waveform, 2);
        assert_eq!(counts.partial_result, 1);
        assert_eq!(counts.result, 1);
        assert_eq!(counts.final_result, 1);
        assert_eq!(counts.reset, 1);
    }

    #[test]
    fn test_accept_waveform_finalizes() {
        let model = test_model("rec-finalize");
        let mut rec = Recognizer::new(&model, 16000.0).unwrap();

        let state = rec.accept_waveform(&one_second()).unwrap();
        assert_eq!(state, DecodingState::Finalized);

        let result = rec.result();
        assert!(result.contains("one two three"), "unexpected: {}", result);
    }

    #[test]
    fn test_reset_clears_partial() {
        let model = test_model("rec-reset");
        let mut rec = Recognizer::new(&model, 16000.0).unwrap();

        let state = rec.accept_waveform(&[0i16; 4000]).unwrap();
        assert_eq!(state, DecodingState::Running);
        assert!(!rec.partial_result().contains("\"partial\":\"\""));

        rec.reset();
        let partial = rec.partial_result();
        assert!(
            partial.contains("\"partial\":\"\""),
            "expected empty-state partial, got: {}",
            partial
        );
    }

    #[test]
    fn test_grammar_constrains_and_rebinds() {
        let model = test_model("rec-grammar");
        let mut rec = Recognizer::with_grammar(&model, 16000.0, &["yes no"]).unwrap();

        rec.accept_waveform(&one_second()).unwrap();
        assert!(rec.result().contains("yes no"));

        rec.set_grammar(&["left right"]).unwrap();
        rec.accept_waveform(&one_second()).unwrap();
        assert!(rec.result().contains("left right"));
    }

    #[test]
    fn test_nlsml_switches_format() {
        let model = test_model("rec-nlsml");
        let mut rec = Recognizer::new(&model, 16000.0).unwrap();
        rec.set_nlsml(true);

        rec.accept_waveform(&one_second()).unwrap();
        let result = rec.result();
        assert!(result.starts_with("<?xml"), "expected NLSML, got: {}", result);
    }

    #[test]
    fn test_speaker_constructor() {
        let model = test_model("rec-spk");
        let spk_dir = std::env::temp_dir().join("kaldi-rs-tests").join("rec-spk-model");
        std::fs::create_dir_all(&spk_dir).unwrap();
        let speaker = SpeakerModel::open(&spk_dir).unwrap();

        let mut rec = Recognizer::with_speaker_model(&model, 16000.0, &speaker).unwrap();
        rec.accept_waveform(&one_second()).unwrap();
        let result = rec.result();
        assert!(result.contains("\"spk\""), "expected spk vector: {}", result);
    }
}
