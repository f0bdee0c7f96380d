//! Raw bindings to the native Vosk library (`vosk_api.h`)

use std::os::raw::{c_char, c_float, c_int};

/// Opaque engine model (acoustic + language model).
#[repr(C)]
pub struct VoskModel {
    _unused: [u8; 0],
}

/// Opaque speaker identification model.
#[repr(C)]
pub struct VoskSpkModel {
    _unused: [u8; 0],
}

/// Opaque recognizer instance.
#[repr(C)]
pub struct VoskRecognizer {
    _unused: [u8; 0],
}

#[link(name = "vosk")]
extern "C" {
    pub fn vosk_model_new(model_path: *const c_char) -> *mut VoskModel;
    pub fn vosk_model_free(model: *mut VoskModel);
    pub fn vosk_model_find_word(model: *mut VoskModel, word: *const c_char) -> c_int;

    pub fn vosk_spk_model_new(model_path: *const c_char) -> *mut VoskSpkModel;
    pub fn vosk_spk_model_free(model: *mut VoskSpkModel);

    pub fn vosk_recognizer_new(model: *mut VoskModel, sample_rate: c_float) -> *mut VoskRecognizer;
    pub fn vosk_recognizer_new_spk(
        model: *mut VoskModel,
        sample_rate: c_float,
        spk_model: *mut VoskSpkModel,
    ) -> *mut VoskRecognizer;
    pub fn vosk_recognizer_new_grm(
        model: *mut VoskModel,
        sample_rate: c_float,
        grammar: *const c_char,
    ) -> *mut VoskRecognizer;
    pub fn vosk_recognizer_free(recognizer: *mut VoskRecognizer);

    pub fn vosk_recognizer_set_max_alternatives(
        recognizer: *mut VoskRecognizer,
        max_alternatives: c_int,
    );
    pub fn vosk_recognizer_set_words(recognizer: *mut VoskRecognizer, words: c_int);
    pub fn vosk_recognizer_set_partial_words(
        recognizer: *mut VoskRecognizer,
        partial_words: c_int,
    );
    pub fn vosk_recognizer_set_nlsml(recognizer: *mut VoskRecognizer, nlsml: c_int);
    pub fn vosk_recognizer_set_spk_model(
        recognizer: *mut VoskRecognizer,
        spk_model: *mut VoskSpkModel,
    );
    pub fn vosk_recognizer_set_grm(recognizer: *mut VoskRecognizer, grammar: *const c_char);

    pub fn vosk_recognizer_accept_waveform(
        recognizer: *mut VoskRecognizer,
        data: *const c_char,
        length: c_int,
    ) -> c_int;

    pub fn vosk_recognizer_result(recognizer: *mut VoskRecognizer) -> *const c_char;
    pub fn vosk_recognizer_partial_result(recognizer: *mut VoskRecognizer) -> *const c_char;
    pub fn vosk_recognizer_final_result(recognizer: *mut VoskRecognizer) -> *const c_char;
    pub fn vosk_recognizer_reset(recognizer: *mut VoskRecognizer);

    pub fn vosk_set_log_level(log_level: c_int);
}
