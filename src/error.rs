//! Custom error types for kaldi-rs

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Result parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Model loading and lookup errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model directory not found: {0}")]
    NotFound(String),

    #[error("No model matching '{0}' under {1}")]
    NoMatch(String, String),

    #[error("Model path is not valid UTF-8: {0}")]
    InvalidPath(String),

    #[error("Engine failed to load model: {0}")]
    LoadFailed(String),

    #[error("Engine failed to load speaker model: {0}")]
    SpeakerLoadFailed(String),
}

/// Recognizer errors
#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Engine refused to create recognizer at {sample_rate} Hz")]
    CreationFailed { sample_rate: f32 },

    #[error("Grammar phrases contain an interior NUL byte")]
    InvalidGrammar,

    #[error("Waveform of {0} bytes exceeds the engine's length limit")]
    WaveformTooLarge(usize),
}

/// Audio capture errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to get device configuration: {0}")]
    DeviceConfig(String),

    #[error("Failed to build audio stream: {0}")]
    StreamBuild(String),

    #[error("Stream playback error: {0}")]
    StreamPlay(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
