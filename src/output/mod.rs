//! Transcript formatting and writing modules

pub mod formats;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::config::{OutputConfig, OutputFormat};
use crate::result::CompleteResult;

pub use formats::{format_json, format_srt_cues, format_text, srt_cue_count};

/// Output writer that handles multiple destinations
pub struct OutputWriter {
    config: OutputConfig,
    file: Option<File>,
    sequence_number: u32,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(config: OutputConfig) -> io::Result<Self> {
        let file = if let Some(ref path) = config.output_path {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?,
            )
        } else {
            None
        };

        Ok(Self {
            config,
            file,
            sequence_number: 0,
        })
    }

    /// Write one finalized utterance
    pub fn write(&mut self, result: &CompleteResult) -> io::Result<()> {
        if result.is_empty() {
            return Ok(());
        }

        match self.config.format {
            OutputFormat::Srt => {
                let words = result.words();
                if words.is_empty() {
                    // SRT needs word timings; enable `words` on the recognizer.
                    debug!("Skipping SRT output for utterance without word timings");
                    return Ok(());
                }
                let cues = format_srt_cues(
                    words,
                    self.config.words_per_line,
                    self.sequence_number + 1,
                );
                self.sequence_number += srt_cue_count(words.len(), self.config.words_per_line);
                self.emit_raw(&cues)
            }
            OutputFormat::Text => {
                let line = format_text(result, self.config.enable_timestamps);
                self.emit_line(&line)
            }
            OutputFormat::Json => self.emit_line(&format_json(result)),
        }
    }

    fn emit_line(&mut self, text: &str) -> io::Result<()> {
        if self.config.enable_console {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text)?;
            stdout.flush()?;
        }

        if let Some(ref mut file) = self.file {
            writeln!(file, "{}", text)?;
            file.flush()?;
        }

        Ok(())
    }

    fn emit_raw(&mut self, text: &str) -> io::Result<()> {
        if self.config.enable_console {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", text)?;
            stdout.flush()?;
        }

        if let Some(ref mut file) = self.file {
            write!(file, "{}", text)?;
            file.flush()?;
        }

        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        Ok(())
    }

    /// Get the output file path if configured
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.config.output_path.as_ref()
    }
}

/// Simple console output for live recognition
#[derive(Default)]
pub struct ConsoleOutput {
    last_text: String,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a finalized utterance on its own line
    pub fn print_final(&mut self, text: &str) {
        if text.trim().is_empty() || text == self.last_text {
            return;
        }

        self.last_text = text.to_string();
        self.clear_line();
        println!("{}", text);
    }

    /// Print a partial hypothesis (updates in place)
    pub fn print_partial(&self, text: &str) {
        print!("\r{}\x1b[K", text);
        let _ = io::stdout().flush();
    }

    /// Clear the current line
    pub fn clear_line(&self) {
        print!("\r\x1b[K");
        let _ = io::stdout().flush();
    }
}

/// Format milliseconds as HH:MM:SS.mmm
pub fn format_timestamp(ms: i64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = ms % 1000;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Utterance;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00.000");
        assert_eq!(format_timestamp(1500), "00:01.500");
        assert_eq!(format_timestamp(61000), "01:01.000");
        assert_eq!(format_timestamp(3661500), "01:01:01.500");
    }

    #[test]
    fn test_writer_skips_empty_results() {
        let config = OutputConfig {
            enable_console: false,
            ..Default::default()
        };
        let mut writer = OutputWriter::new(config).unwrap();

        let empty = CompleteResult::Single(Utterance {
            text: "  ".to_string(),
            result: Vec::new(),
            spk: Vec::new(),
            spk_frames: 0,
        });
        assert!(writer.write(&empty).is_ok());
    }

    #[test]
    fn test_writer_appends_to_file() {
        let path = std::env::temp_dir()
            .join("kaldi-rs-tests")
            .join("writer-output.txt");
        let _ = std::fs::remove_file(&path);

        let config = OutputConfig {
            enable_console: false,
            enable_timestamps: false,
            output_path: Some(path.clone()),
            ..Default::default()
        };
        let mut writer = OutputWriter::new(config).unwrap();

        let result = CompleteResult::parse(r#"{"text" : "one two three"}"#).unwrap();
        writer.write(&result).unwrap();
        writer.flush().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "one two three\n");
    }
}
