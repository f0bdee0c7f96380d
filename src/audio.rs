//! Microphone capture for live recognition
//!
//! Delivers mono 16-bit PCM chunks over a bounded channel, ready to feed
//! straight into a recognizer. No preprocessing happens here; the engine
//! consumes raw PCM at the capture rate.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleRate, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::AudioConfig;
use crate::error::{AudioError, Result};

/// Audio capture handle
pub struct AudioCapture {
    config: AudioConfig,
    host: Host,
    device: Option<Device>,
    stream: Option<Stream>,
    sample_sender: Sender<Vec<i16>>,
    sample_receiver: Receiver<Vec<i16>>,
    is_running: Arc<AtomicBool>,
    actual_sample_rate: u32,
    actual_channels: u16,
}

impl AudioCapture {
    /// Create a new audio capture instance
    pub fn new(config: AudioConfig) -> Result<Self> {
        let host = cpal::default_host();
        let (sender, receiver) = bounded(100); // Buffer up to 100 chunks

        Ok(Self {
            config,
            host,
            device: None,
            stream: None,
            sample_sender: sender,
            sample_receiver: receiver,
            is_running: Arc::new(AtomicBool::new(false)),
            actual_sample_rate: 0,
            actual_channels: 1,
        })
    }

    /// List available audio input devices
    pub fn list_devices(&self) -> Result<Vec<String>> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Initialize the audio capture device
    pub fn init(&mut self) -> Result<()> {
        let device = if let Some(ref device_name) = self.config.device {
            self.find_device_by_name(device_name)?
        } else {
            self.host
                .default_input_device()
                .ok_or(AudioError::NoInputDevice)?
        };

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("Using audio input device: {}", device_name);

        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        // Prefer a f32 config matching the requested channel count at the
        // requested rate; otherwise take what the device offers.
        let mut best_config = None;
        for cfg in supported_configs {
            if cfg.sample_format() != cpal::SampleFormat::F32 {
                continue;
            }
            debug!(
                "Supported config: channels={}, sample_rate={:?}-{:?}",
                cfg.channels(),
                cfg.min_sample_rate(),
                cfg.max_sample_rate()
            );

            if cfg.channels() == self.config.channels {
                let target_rate = SampleRate(self.config.sample_rate);
                if cfg.min_sample_rate() <= target_rate && target_rate <= cfg.max_sample_rate() {
                    best_config = Some(cfg.with_sample_rate(target_rate));
                } else {
                    best_config = Some(cfg.with_max_sample_rate());
                }
                break;
            }
            if best_config.is_none() {
                best_config = Some(cfg.with_max_sample_rate());
            }
        }

        let supported_config = best_config.ok_or_else(|| {
            AudioError::DeviceConfig("No suitable audio configuration found".to_string())
        })?;

        self.actual_sample_rate = supported_config.sample_rate().0;
        self.actual_channels = supported_config.channels();
        if self.actual_sample_rate != self.config.sample_rate {
            warn!(
                "Device runs at {} Hz, not the requested {} Hz; create the \
                 recognizer at the device rate",
                self.actual_sample_rate, self.config.sample_rate
            );
        }

        info!(
            "Audio config: {} channels @ {} Hz",
            self.actual_channels, self.actual_sample_rate
        );

        self.device = Some(device);
        Ok(())
    }

    /// Get the actual sample rate of the capture device
    pub fn actual_sample_rate(&self) -> u32 {
        self.actual_sample_rate
    }

    /// Start capturing audio
    pub fn start(&mut self) -> Result<()> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| AudioError::DeviceConfig("Device not initialized".to_string()))?;

        let config = StreamConfig {
            channels: self.actual_channels,
            sample_rate: SampleRate(self.actual_sample_rate),
            buffer_size: cpal::BufferSize::Fixed(self.config.buffer_size),
        };

        let sender = self.sample_sender.clone();
        let is_running = self.is_running.clone();
        let channels = self.actual_channels as usize;

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_running.load(Ordering::Relaxed) {
                        return;
                    }

                    // Mix down to mono and convert to the engine's 16-bit
                    // sample format.
                    let samples: Vec<i16> = if channels > 1 {
                        data.chunks(channels)
                            .map(|frame| {
                                let mixed = frame.iter().sum::<f32>() / channels as f32;
                                to_i16(mixed)
                            })
                            .collect()
                    } else {
                        data.iter().map(|&s| to_i16(s)).collect()
                    };

                    if sender.try_send(samples).is_err() {
                        warn!("Audio buffer overflow - dropping samples");
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        self.is_running.store(true, Ordering::Relaxed);
        self.stream = Some(stream);

        info!("Audio capture started");
        Ok(())
    }

    /// Stop capturing audio
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::Relaxed);
        self.stream = None;
        info!("Audio capture stopped");
    }

    /// Try to receive audio samples (non-blocking)
    pub fn try_receive(&self) -> Option<Vec<i16>> {
        self.sample_receiver.try_recv().ok()
    }

    /// Receive audio samples (blocking with timeout)
    pub fn receive_timeout(&self, timeout: std::time::Duration) -> Option<Vec<i16>> {
        self.sample_receiver.recv_timeout(timeout).ok()
    }

    fn find_device_by_name(&self, name: &str) -> Result<Device> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        for device in devices {
            if let Ok(device_name) = device.name() {
                if device_name.contains(name) {
                    return Ok(device);
                }
            }
        }

        Err(AudioError::DeviceNotFound(name.to_string()).into())
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_capture_creation() {
        let config = AudioConfig::default();
        let capture = AudioCapture::new(config);
        assert!(capture.is_ok());
    }

    #[test]
    fn test_to_i16_clamps() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
    }

    #[test]
    fn test_list_devices_does_not_panic() {
        let capture = AudioCapture::new(AudioConfig::default()).unwrap();
        // Actual devices depend on the system; headless machines may have
        // none at all.
        let _ = capture.list_devices();
    }
}
