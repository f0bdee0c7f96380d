//! Vosk recognizer CLI

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use kaldi_rs::{
    set_log_level, AudioCapture, CompleteResult, Config, ConsoleOutput, DecodingState, LogLevel,
    Model, OutputFormat, OutputWriter, PartialResult, Recognizer, SpeakerModel,
};

/// Vosk speech recognition toolkit
#[derive(Parser)]
#[command(name = "kaldi-rs")]
#[command(about = "Speech recognition with the Vosk engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe a WAV file
    Transcribe {
        /// Input WAV file path
        input: PathBuf,

        /// Path to a model directory
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Path to a speaker model directory
        #[arg(long)]
        speaker_model: Option<PathBuf>,

        /// Restrict recognition to these phrases (repeatable)
        #[arg(short, long)]
        grammar: Vec<String>,

        /// Number of alternative hypotheses to request
        #[arg(short, long, default_value = "0")]
        alternatives: u16,

        /// Output format (text, json, srt)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transcribe live audio from the microphone
    Listen {
        /// Audio input device name (uses default if not specified)
        #[arg(short, long)]
        device: Option<String>,

        /// Path to a model directory
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Restrict recognition to these phrases (repeatable)
        #[arg(short, long)]
        grammar: Vec<String>,
    },

    /// List available audio input devices
    Devices,

    /// Check whether a word is in the model vocabulary
    FindWord {
        /// The word to look up
        word: String,

        /// Path to a model directory
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Download a model archive
    DownloadModel {
        /// Model name, e.g. vosk-model-small-en-us-0.15
        name: String,

        /// Output directory for models
        #[arg(short, long, default_value = "./models")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - quiet by default, use -v for more
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    // Keep Kaldi diagnostics off the transcript unless explicitly asked for.
    set_log_level(match cli.verbose {
        0 | 1 => LogLevel::Silent,
        2 => LogLevel::Default,
        _ => LogLevel::Verbose,
    });

    // Load configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Transcribe {
            input,
            model,
            speaker_model,
            grammar,
            alternatives,
            format,
            output,
        } => {
            if let Some(model) = model {
                config.model.path = Some(model);
            }
            if let Some(speaker_model) = speaker_model {
                config.model.speaker_model_path = Some(speaker_model);
            }
            if !grammar.is_empty() {
                config.recognizer.grammar = Some(grammar);
            }
            config.recognizer.max_alternatives = alternatives;
            config.output.format = parse_format(&format);
            if let Some(output) = output {
                config.output.output_path = Some(output);
            }

            transcribe_file(config, input)
        }
        Commands::Listen {
            device,
            model,
            grammar,
        } => {
            if let Some(device) = device {
                config.audio.device = Some(device);
            }
            if let Some(model) = model {
                config.model.path = Some(model);
            }
            if !grammar.is_empty() {
                config.recognizer.grammar = Some(grammar);
            }

            run_listen(config)
        }
        Commands::Devices => list_devices(),
        Commands::FindWord { word, model } => {
            if let Some(model) = model {
                config.model.path = Some(model);
            }
            find_word(config, &word)
        }
        Commands::DownloadModel { name, output_dir } => download_model(&name, &output_dir),
    }
}

fn parse_format(format: &str) -> OutputFormat {
    match format {
        "json" => OutputFormat::Json,
        "srt" => OutputFormat::Srt,
        _ => OutputFormat::Text,
    }
}

/// Write one engine result through the output writer.
///
/// NLSML output is not JSON; it is emitted verbatim.
fn write_result(writer: &mut OutputWriter, raw: &str) -> Result<()> {
    match CompleteResult::parse(raw) {
        Ok(result) => writer.write(&result).map_err(Into::into),
        Err(_) => {
            println!("{}", raw.trim());
            Ok(())
        }
    }
}

/// Transcribe a WAV file
fn transcribe_file(mut config: Config, input_path: PathBuf) -> Result<()> {
    info!("Transcribing: {}", input_path.display());

    let (samples, sample_rate) = read_wav_mono(&input_path)?;
    info!(
        "Loaded {} samples ({:.2}s at {} Hz)",
        samples.len(),
        samples.len() as f32 / sample_rate as f32,
        sample_rate
    );

    // The engine decodes at the file's rate; no resampling happens here.
    config.recognizer.sample_rate = sample_rate as f32;

    let model = Model::from_config(&config.model).context("Failed to load model")?;
    let mut recognizer = Recognizer::from_config(&model, &config.recognizer)
        .context("Failed to create recognizer")?;

    let speaker = match config.model.speaker_model_path {
        Some(ref path) => Some(SpeakerModel::open(path).context("Failed to load speaker model")?),
        None => None,
    };
    if let Some(ref speaker) = speaker {
        recognizer.set_speaker_model(speaker);
    }

    let mut writer = OutputWriter::new(config.output.clone())?;

    for chunk in samples.chunks(4000) {
        match recognizer.accept_waveform(chunk)? {
            DecodingState::Finalized => {
                let raw = recognizer.result();
                write_result(&mut writer, &raw)?;
            }
            DecodingState::Running => {}
            DecodingState::Failed => warn!("Engine failed to process an audio chunk"),
        }
    }

    let raw = recognizer.final_result();
    write_result(&mut writer, &raw)?;
    writer.flush()?;

    Ok(())
}

/// Read a WAV file as mono 16-bit samples
fn read_wav_mono(path: &PathBuf) -> Result<(Vec<i16>, u32)> {
    let mut reader = hound::WavReader::open(path).context("Failed to open WAV file")?;

    let spec = reader.spec();
    info!(
        "WAV format: {} channels, {} Hz, {} bits",
        spec.channels, spec.sample_rate, spec.bits_per_sample
    );

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .filter_map(|s| s.ok())
            .map(|s| scale_to_i16(s, spec.bits_per_sample))
            .collect(),
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .filter_map(|s| s.ok())
            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect(),
    };

    // Convert to mono if stereo
    let mono_samples: Vec<i16> = if spec.channels > 1 {
        samples
            .chunks(spec.channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec.sample_rate))
}

fn scale_to_i16(sample: i32, bits_per_sample: u16) -> i16 {
    match bits_per_sample {
        16 => sample as i16,
        bits if bits < 16 => (sample << (16 - bits)) as i16,
        bits => (sample >> (bits - 16)) as i16,
    }
}

/// Run live transcription from the microphone
fn run_listen(config: Config) -> Result<()> {
    // Setup signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    // Initialize the model first (most likely to fail if missing)
    let model = Model::from_config(&config.model).context("Failed to load model")?;

    let mut capture = AudioCapture::new(config.audio.clone())?;
    capture.init().context("Failed to initialize audio capture")?;

    // Decode at whatever rate the device actually delivers.
    let mut recognizer_config = config.recognizer.clone();
    recognizer_config.sample_rate = capture.actual_sample_rate() as f32;
    let mut recognizer = Recognizer::from_config(&model, &recognizer_config)
        .context("Failed to create recognizer")?;

    capture.start()?;
    println!("Listening... Press Ctrl+C to stop");

    let mut console = ConsoleOutput::new();

    while running.load(Ordering::SeqCst) {
        let samples = match capture.receive_timeout(Duration::from_millis(100)) {
            Some(samples) => samples,
            None => continue,
        };

        match recognizer.accept_waveform(&samples)? {
            DecodingState::Finalized => {
                if let Ok(result) = CompleteResult::parse(&recognizer.result()) {
                    console.print_final(result.text());
                }
            }
            DecodingState::Running => {
                if let Ok(partial) = PartialResult::parse(&recognizer.partial_result()) {
                    if !partial.is_empty() {
                        console.print_partial(&partial.partial);
                    }
                }
            }
            DecodingState::Failed => warn!("Engine failed to process an audio chunk"),
        }
    }

    capture.stop();
    console.clear_line();

    // Flush whatever was still being decoded when we stopped.
    if let Ok(result) = CompleteResult::parse(&recognizer.final_result()) {
        if !result.is_empty() {
            console.print_final(result.text());
        }
    }

    Ok(())
}

/// List available audio input devices
fn list_devices() -> Result<()> {
    let capture = AudioCapture::new(kaldi_rs::AudioConfig::default())?;
    let devices = capture.list_devices()?;

    if devices.is_empty() {
        println!("No audio input devices found");
    } else {
        println!("Available audio input devices:");
        for (i, name) in devices.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
    }

    Ok(())
}

/// Check whether a word is in the model vocabulary
fn find_word(config: Config, word: &str) -> Result<()> {
    let model = Model::from_config(&config.model).context("Failed to load model")?;

    match model.find_word(word) {
        Some(symbol) => println!("'{}' is in the vocabulary (symbol {})", word, symbol),
        None => println!("'{}' is not in the vocabulary", word),
    }

    Ok(())
}

/// Download a model archive from the Vosk model repository
fn download_model(name: &str, output_dir: &PathBuf) -> Result<()> {
    let url = format!("https://alphacephei.com/vosk/models/{}.zip", name);

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let model_dir = output_dir.join(name);
    if model_dir.exists() {
        println!("Model already exists: {}", model_dir.display());
        println!("Delete it first if you want to re-download.");
        return Ok(());
    }

    let zip_path = output_dir.join(format!("{}.zip", name));

    println!("Downloading {} ...", name);
    println!("URL: {}", url);
    println!("Destination: {}", model_dir.display());
    println!();

    // Convert paths to strings, handling non-UTF8 gracefully
    let zip_path_str = zip_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8 characters"))?;
    let output_dir_str = output_dir
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8 characters"))?;

    // Use curl for download with progress
    let status = std::process::Command::new("curl")
        .args(["-L", "--progress-bar", "-o", zip_path_str, &url])
        .status()
        .context("Failed to execute curl. Make sure curl is installed.")?;

    if !status.success() {
        anyhow::bail!("Download failed with exit code: {:?}", status.code());
    }

    let status = std::process::Command::new("unzip")
        .args(["-q", zip_path_str, "-d", output_dir_str])
        .status()
        .context("Failed to execute unzip. Make sure unzip is installed.")?;

    if !status.success() {
        anyhow::bail!("Extraction failed with exit code: {:?}", status.code());
    }

    std::fs::remove_file(&zip_path)?;

    if !model_dir.exists() {
        anyhow::bail!(
            "Model directory not found after extraction: {}",
            model_dir.display()
        );
    }

    println!();
    println!("Model ready at: {}", model_dir.display());
    println!();
    println!("To use this model:");
    println!("  kaldi-rs transcribe recording.wav -m {}", model_dir.display());

    Ok(())
}
