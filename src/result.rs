//! Typed views over the engine's JSON results
//!
//! The recognizer hands back whatever the engine produced (JSON, or NLSML
//! when enabled). These structs parse the JSON shape: a single-best
//! utterance, ranked alternatives, or a provisional partial.

use serde::{Deserialize, Serialize};

/// A recognized word with timing and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    /// Start time in seconds.
    pub start: f32,
    /// End time in seconds.
    pub end: f32,
    /// Decoder confidence, 0.0 to 1.0.
    #[serde(default)]
    pub conf: f32,
}

/// A single-best utterance result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    /// Per-word detail, present when word timing is enabled.
    #[serde(default)]
    pub result: Vec<Word>,
    /// Speaker identification vector, present when a speaker model is bound.
    #[serde(default)]
    pub spk: Vec<f32>,
    #[serde(default)]
    pub spk_frames: u32,
}

/// One hypothesis among requested alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub text: String,
    pub confidence: f32,
    #[serde(default)]
    pub result: Vec<Word>,
}

/// A finalized result: the single best hypothesis, or ranked alternatives
/// when `set_max_alternatives` requested them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompleteResult {
    Multiple { alternatives: Vec<Alternative> },
    Single(Utterance),
}

impl CompleteResult {
    /// Parse an engine result string.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The best hypothesis text.
    pub fn text(&self) -> &str {
        match self {
            CompleteResult::Multiple { alternatives } => alternatives
                .first()
                .map(|a| a.text.as_str())
                .unwrap_or(""),
            CompleteResult::Single(utterance) => &utterance.text,
        }
    }

    /// Word timings of the best hypothesis.
    pub fn words(&self) -> &[Word] {
        match self {
            CompleteResult::Multiple { alternatives } => alternatives
                .first()
                .map(|a| a.result.as_slice())
                .unwrap_or(&[]),
            CompleteResult::Single(utterance) => &utterance.result,
        }
    }

    /// True when the engine recognized nothing.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// A provisional hypothesis for the utterance in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResult {
    #[serde(default)]
    pub partial: String,
    /// Per-word detail, present when partial word timing is enabled.
    #[serde(default)]
    pub partial_result: Vec<Word>,
}

impl PartialResult {
    /// Parse an engine partial result string.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.partial.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_with_words() {
        let json = r#"{
            "result" : [
                {"conf" : 1.000000, "end" : 1.110000, "start" : 0.870000, "word" : "what"},
                {"conf" : 0.914706, "end" : 1.530000, "start" : 1.110000, "word" : "zero"}
            ],
            "text" : "what zero"
        }"#;

        let result = CompleteResult::parse(json).expect("should parse");
        assert_eq!(result.text(), "what zero");
        assert_eq!(result.words().len(), 2);
        assert_eq!(result.words()[1].word, "zero");
        assert!((result.words()[0].end - 1.11).abs() < 1e-6);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_parse_alternatives() {
        let json = r#"{
            "alternatives" : [
                {"confidence" : 237.012924, "text" : "one zero one"},
                {"confidence" : 231.191788, "text" : "one zero oh one"}
            ]
        }"#;

        let result = CompleteResult::parse(json).expect("should parse");
        assert_eq!(result.text(), "one zero one");
        assert!(result.words().is_empty());

        match result {
            CompleteResult::Multiple { alternatives } => {
                assert_eq!(alternatives.len(), 2);
                assert!(alternatives[0].confidence > alternatives[1].confidence);
            }
            CompleteResult::Single(_) => panic!("expected alternatives"),
        }
    }

    #[test]
    fn test_parse_speaker_vector() {
        let json = r#"{"text" : "one two", "spk" : [0.25, -0.5, 1.0], "spk_frames" : 98}"#;

        let result = CompleteResult::parse(json).expect("should parse");
        match result {
            CompleteResult::Single(utterance) => {
                assert_eq!(utterance.spk.len(), 3);
                assert_eq!(utterance.spk_frames, 98);
            }
            CompleteResult::Multiple { .. } => panic!("expected single"),
        }
    }

    #[test]
    fn test_parse_empty_result() {
        let result = CompleteResult::parse(r#"{"text" : ""}"#).expect("should parse");
        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_partial() {
        let partial = PartialResult::parse(r#"{"partial" : "one two"}"#).expect("should parse");
        assert_eq!(partial.partial, "one two");
        assert!(!partial.is_empty());

        let empty = PartialResult::parse(r#"{"partial" : ""}"#).expect("should parse");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_nlsml_is_not_json() {
        let nlsml = "<?xml version=\"1.0\"?>\n<result></result>";
        assert!(CompleteResult::parse(nlsml).is_err());
    }
}
