//! Deterministic stand-in for the native engine
//!
//! Mirrors the `vosk_*` call surface over heap-allocated state so the safe
//! layer can be built and exercised without libvosk. An utterance finalizes
//! after one second of audio has been fed; the recognized text is the first
//! phrase of the bound grammar, or a fixed phrase when no grammar is set.
//! Model creation fails for empty paths and paths containing "corrupt",
//! giving tests a deterministic engine-refusal case.
//! Each recognizer records how often every operation was forwarded to it,
//! which the unit tests use to verify the wrapper forwards exactly once per
//! call.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_float, c_int};
use std::ptr;

const DEFAULT_PHRASE: &str = "one two three";
const VOCABULARY: &[&str] = &["one", "two", "three", "four", "five", "zero", "oh"];

pub struct VoskModel {
    #[allow(dead_code)]
    path: String,
}

pub struct VoskSpkModel {
    #[allow(dead_code)]
    path: String,
}

/// Per-recognizer tally of forwarded operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub set_max_alternatives: u32,
    pub set_words: u32,
    pub set_partial_words: u32,
    pub set_nlsml: u32,
    pub set_spk_model: u32,
    pub set_grm: u32,
    pub accept_waveform: u32,
    pub result: u32,
    pub partial_result: u32,
    pub final_result: u32,
    pub reset: u32,
}

pub struct VoskRecognizer {
    sample_rate: f32,
    grammar: Option<Vec<String>>,
    speaker: bool,
    max_alternatives: i32,
    words: bool,
    partial_words: bool,
    nlsml: bool,
    pending_bytes: usize,
    finalized: Option<String>,
    // Last returned string; the pointer handed out stays valid until the
    // next call on this recognizer, matching the native engine's contract.
    scratch: CString,
    calls: CallCounts,
}

impl VoskRecognizer {
    fn phrase(&self) -> String {
        match &self.grammar {
            Some(phrases) if !phrases.is_empty() => phrases[0].clone(),
            _ => DEFAULT_PHRASE.to_string(),
        }
    }

    /// One second of 16-bit mono audio at the configured rate.
    fn utterance_bytes(&self) -> usize {
        (self.sample_rate * 2.0) as usize
    }

    fn words_json(text: &str) -> serde_json::Value {
        let words: Vec<_> = text
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| {
                serde_json::json!({
                    "conf": 1.0,
                    "start": i as f32 * 0.3,
                    "end": i as f32 * 0.3 + 0.25,
                    "word": w,
                })
            })
            .collect();
        serde_json::Value::Array(words)
    }

    fn render_complete(&mut self, text: &str) -> *const c_char {
        if self.nlsml {
            let xml = format!(
                "<?xml version=\"1.0\"?>\n<result><interpretation confidence=\"1.0\">\
                 <input mode=\"speech\">{}</input></interpretation></result>",
                text
            );
            return self.stash(xml);
        }
        let value = if self.max_alternatives > 0 {
            let mut alternative = serde_json::json!({ "confidence": 240.0, "text": text });
            if self.words && !text.is_empty() {
                alternative["result"] = Self::words_json(text);
            }
            serde_json::json!({ "alternatives": [alternative] })
        } else {
            let mut single = serde_json::json!({ "text": text });
            if self.words && !text.is_empty() {
                single["result"] = Self::words_json(text);
            }
            if self.speaker && !text.is_empty() {
                single["spk"] = serde_json::json!([0.25, -0.5, 1.0, 0.0]);
                single["spk_frames"] = serde_json::json!(98);
            }
            single
        };
        self.stash(value.to_string())
    }

    fn stash(&mut self, s: String) -> *const c_char {
        self.scratch = CString::new(s).unwrap_or_default();
        self.scratch.as_ptr()
    }
}

fn parse_grammar(raw: &CStr) -> Vec<String> {
    let s = raw.to_string_lossy();
    serde_json::from_str::<Vec<String>>(&s).unwrap_or_else(|_| vec![s.into_owned()])
}

fn new_recognizer(
    model: *mut VoskModel,
    sample_rate: c_float,
    grammar: Option<Vec<String>>,
    speaker: bool,
) -> *mut VoskRecognizer {
    if model.is_null() || !(sample_rate > 0.0) {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(VoskRecognizer {
        sample_rate,
        grammar,
        speaker,
        max_alternatives: 0,
        words: false,
        partial_words: false,
        nlsml: false,
        pending_bytes: 0,
        finalized: None,
        scratch: CString::default(),
        calls: CallCounts::default(),
    }))
}

pub unsafe fn vosk_model_new(model_path: *const c_char) -> *mut VoskModel {
    if model_path.is_null() {
        return ptr::null_mut();
    }
    let path = CStr::from_ptr(model_path).to_string_lossy().into_owned();
    if path.is_empty() || path.contains("corrupt") {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(VoskModel { path }))
}

pub unsafe fn vosk_model_free(model: *mut VoskModel) {
    if !model.is_null() {
        drop(Box::from_raw(model));
    }
}

pub unsafe fn vosk_model_find_word(model: *mut VoskModel, word: *const c_char) -> c_int {
    if model.is_null() || word.is_null() {
        return -1;
    }
    let w = CStr::from_ptr(word).to_string_lossy();
    VOCABULARY
        .iter()
        .position(|v| *v == w)
        .map(|i| i as c_int)
        .unwrap_or(-1)
}

pub unsafe fn vosk_spk_model_new(model_path: *const c_char) -> *mut VoskSpkModel {
    if model_path.is_null() {
        return ptr::null_mut();
    }
    let path = CStr::from_ptr(model_path).to_string_lossy().into_owned();
    if path.is_empty() || path.contains("corrupt") {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(VoskSpkModel { path }))
}

pub unsafe fn vosk_spk_model_free(model: *mut VoskSpkModel) {
    if !model.is_null() {
        drop(Box::from_raw(model));
    }
}

pub unsafe fn vosk_recognizer_new(
    model: *mut VoskModel,
    sample_rate: c_float,
) -> *mut VoskRecognizer {
    new_recognizer(model, sample_rate, None, false)
}

pub unsafe fn vosk_recognizer_new_spk(
    model: *mut VoskModel,
    sample_rate: c_float,
    spk_model: *mut VoskSpkModel,
) -> *mut VoskRecognizer {
    if spk_model.is_null() {
        return ptr::null_mut();
    }
    new_recognizer(model, sample_rate, None, true)
}

pub unsafe fn vosk_recognizer_new_grm(
    model: *mut VoskModel,
    sample_rate: c_float,
    grammar: *const c_char,
) -> *mut VoskRecognizer {
    if grammar.is_null() {
        return ptr::null_mut();
    }
    let phrases = parse_grammar(CStr::from_ptr(grammar));
    new_recognizer(model, sample_rate, Some(phrases), false)
}

pub unsafe fn vosk_recognizer_free(recognizer: *mut VoskRecognizer) {
    if !recognizer.is_null() {
        drop(Box::from_raw(recognizer));
    }
}

pub unsafe fn vosk_recognizer_set_max_alternatives(
    recognizer: *mut VoskRecognizer,
    max_alternatives: c_int,
) {
    let rec = &mut *recognizer;
    rec.calls.set_max_alternatives += 1;
    rec.max_alternatives = max_alternatives;
}

pub unsafe fn vosk_recognizer_set_words(recognizer: *mut VoskRecognizer, words: c_int) {
    let rec = &mut *recognizer;
    rec.calls.set_words += 1;
    rec.words = words != 0;
}

pub unsafe fn vosk_recognizer_set_partial_words(
    recognizer: *mut VoskRecognizer,
    partial_words: c_int,
) {
    let rec = &mut *recognizer;
    rec.calls.set_partial_words += 1;
    rec.partial_words = partial_words != 0;
}

pub unsafe fn vosk_recognizer_set_nlsml(recognizer: *mut VoskRecognizer, nlsml: c_int) {
    let rec = &mut *recognizer;
    rec.calls.set_nlsml += 1;
    rec.nlsml = nlsml != 0;
}

pub unsafe fn vosk_recognizer_set_spk_model(
    recognizer: *mut VoskRecognizer,
    spk_model: *mut VoskSpkModel,
) {
    let rec = &mut *recognizer;
    rec.calls.set_spk_model += 1;
    rec.speaker = !spk_model.is_null();
}

pub unsafe fn vosk_recognizer_set_grm(recognizer: *mut VoskRecognizer, grammar: *const c_char) {
    let rec = &mut *recognizer;
    rec.calls.set_grm += 1;
    if !grammar.is_null() {
        rec.grammar = Some(parse_grammar(CStr::from_ptr(grammar)));
    }
}

pub unsafe fn vosk_recognizer_accept_waveform(
    recognizer: *mut VoskRecognizer,
    data: *const c_char,
    length: c_int,
) -> c_int {
    let rec = &mut *recognizer;
    rec.calls.accept_waveform += 1;
    if data.is_null() || length < 0 {
        return -1;
    }
    rec.pending_bytes += length as usize;
    if rec.pending_bytes >= rec.utterance_bytes() {
        rec.finalized = Some(rec.phrase());
        rec.pending_bytes = 0;
        1
    } else {
        0
    }
}

pub unsafe fn vosk_recognizer_result(recognizer: *mut VoskRecognizer) -> *const c_char {
    let rec = &mut *recognizer;
    rec.calls.result += 1;
    let text = rec.finalized.take().unwrap_or_default();
    rec.render_complete(&text)
}

pub unsafe fn vosk_recognizer_partial_result(recognizer: *mut VoskRecognizer) -> *const c_char {
    let rec = &mut *recognizer;
    rec.calls.partial_result += 1;
    if rec.pending_bytes == 0 {
        return rec.stash(serde_json::json!({ "partial": "" }).to_string());
    }
    let phrase = rec.phrase();
    let head = phrase.split_whitespace().next().unwrap_or("").to_string();
    let mut value = serde_json::json!({ "partial": head });
    if rec.partial_words && !head.is_empty() {
        value["partial_result"] = VoskRecognizer::words_json(&head);
    }
    rec.stash(value.to_string())
}

pub unsafe fn vosk_recognizer_final_result(recognizer: *mut VoskRecognizer) -> *const c_char {
    let rec = &mut *recognizer;
    rec.calls.final_result += 1;
    let text = match rec.finalized.take() {
        Some(text) => text,
        None if rec.pending_bytes > 0 => {
            rec.pending_bytes = 0;
            rec.phrase()
        }
        None => String::new(),
    };
    rec.render_complete(&text)
}

pub unsafe fn vosk_recognizer_reset(recognizer: *mut VoskRecognizer) {
    let rec = &mut *recognizer;
    rec.calls.reset += 1;
    rec.pending_bytes = 0;
    rec.finalized = None;
}

pub unsafe fn vosk_set_log_level(_log_level: c_int) {}

/// Snapshot of the per-recognizer call tally. Test-support only.
pub unsafe fn vosk_mock_call_counts(recognizer: *mut VoskRecognizer) -> CallCounts {
    (*recognizer).calls
}
