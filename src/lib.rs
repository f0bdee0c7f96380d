//! Safe bindings and tooling for the Vosk speech recognition engine
//!
//! Wraps the engine's native interface behind single-owner handle types and
//! carries the small toolkit around them: model lookup, result parsing,
//! transcript output, and microphone capture.
//!
//! # Architecture
//!
//! - `engine`: the native call surface (real FFI behind the `vosk` feature,
//!   a deterministic stub otherwise)
//! - `model`: owned `Model` / `SpeakerModel` handles and directory lookup
//! - `recognizer`: the `Recognizer` handle - construction, configuration,
//!   waveform ingestion, results, reset
//! - `result`: typed parsing of the engine's JSON output
//! - `output`: transcript writers (text, JSON, SRT)
//! - `audio`: microphone capture
//! - `config`: configuration structures
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use kaldi_rs::{CompleteResult, Model, Recognizer};
//!
//! # fn main() -> kaldi_rs::Result<()> {
//! let model = Model::open("models/vosk-model-small-en-us-0.15")?;
//! let mut recognizer = Recognizer::new(&model, 16000.0)?;
//! recognizer.set_words(true);
//!
//! let samples: Vec<i16> = vec![0; 16000];
//! recognizer.accept_waveform(&samples)?;
//!
//! let result = CompleteResult::parse(&recognizer.final_result())?;
//! println!("{}", result.text());
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod recognizer;
pub mod result;

// Re-exports for convenience
pub use audio::AudioCapture;
pub use config::{AudioConfig, Config, ModelConfig, OutputConfig, OutputFormat, RecognizerConfig};
pub use engine::{set_log_level, LogLevel};
pub use error::{AudioError, ConfigError, Error, ModelError, RecognizerError, Result};
pub use model::{resolve_model_path, Model, SpeakerModel};
pub use output::{ConsoleOutput, OutputWriter};
pub use recognizer::{DecodingState, Recognizer};
pub use result::{Alternative, CompleteResult, PartialResult, Utterance, Word};
