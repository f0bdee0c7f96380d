//! Output format implementations

use crate::result::{CompleteResult, Word};

use super::format_timestamp;

/// Format as plain text, with the utterance time span when word timings
/// are available
pub fn format_text(result: &CompleteResult, show_timestamps: bool) -> String {
    let words = result.words();
    if show_timestamps && !words.is_empty() {
        let start = format_timestamp(secs_to_ms(words[0].start));
        let end = format_timestamp(secs_to_ms(words[words.len() - 1].end));
        format!("[{} --> {}] {}", start, end, result.text())
    } else {
        result.text().to_string()
    }
}

/// Format as one JSON object per utterance
pub fn format_json(result: &CompleteResult) -> String {
    serde_json::to_string(result)
        .unwrap_or_else(|_| format!("{{\"text\": \"{}\"}}", result.text()))
}

/// Format word timings as SRT cues, `words_per_line` words per cue,
/// numbered from `first_sequence`
pub fn format_srt_cues(words: &[Word], words_per_line: usize, first_sequence: u32) -> String {
    let mut out = String::new();
    let mut sequence = first_sequence;

    for line in words.chunks(words_per_line.max(1)) {
        let start = format_srt_timestamp(secs_to_ms(line[0].start));
        let end = format_srt_timestamp(secs_to_ms(line[line.len() - 1].end));
        let text: Vec<&str> = line.iter().map(|w| w.word.as_str()).collect();

        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            sequence,
            start,
            end,
            text.join(" ")
        ));
        sequence += 1;
    }

    out
}

/// Number of SRT cues `format_srt_cues` produces for `word_count` words
pub fn srt_cue_count(word_count: usize, words_per_line: usize) -> u32 {
    let per_line = words_per_line.max(1);
    ((word_count + per_line - 1) / per_line) as u32
}

/// Format timestamp for SRT (HH:MM:SS,mmm)
fn format_srt_timestamp(ms: i64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

fn secs_to_ms(seconds: f32) -> i64 {
    (seconds * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Utterance;

    fn make_words() -> Vec<Word> {
        (0..3)
            .map(|i| Word {
                word: format!("w{}", i),
                start: i as f32 * 0.5,
                end: i as f32 * 0.5 + 0.4,
                conf: 1.0,
            })
            .collect()
    }

    fn make_result() -> CompleteResult {
        CompleteResult::Single(Utterance {
            text: "w0 w1 w2".to_string(),
            result: make_words(),
            spk: Vec::new(),
            spk_frames: 0,
        })
    }

    #[test]
    fn test_format_text() {
        let formatted = format_text(&make_result(), true);
        assert!(formatted.contains("[00:00.000 --> 00:01.400]"));
        assert!(formatted.contains("w0 w1 w2"));

        let plain = format_text(&make_result(), false);
        assert_eq!(plain, "w0 w1 w2");
    }

    #[test]
    fn test_format_json() {
        let formatted = format_json(&make_result());
        let reparsed = CompleteResult::parse(&formatted).expect("round-trips");
        assert_eq!(reparsed.text(), "w0 w1 w2");
    }

    #[test]
    fn test_format_srt_cues_grouping() {
        let cues = format_srt_cues(&make_words(), 2, 1);

        // Two cues: "w0 w1" and "w2".
        assert!(cues.contains("1\n00:00:00,000 --> 00:00:00,900\nw0 w1\n"));
        assert!(cues.contains("2\n00:00:01,000 --> 00:00:01,400\nw2\n"));
        assert_eq!(srt_cue_count(3, 2), 2);
    }

    #[test]
    fn test_srt_timestamp_over_an_hour() {
        let words = vec![Word {
            word: "late".to_string(),
            start: 3661.5,
            end: 3662.0,
            conf: 1.0,
        }];

        let cues = format_srt_cues(&words, 7, 5);
        assert!(cues.contains("5\n01:01:01,500 --> 01:01:02,000\nlate\n"));
    }
}
