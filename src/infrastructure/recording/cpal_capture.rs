//! Cross-platform microphone capture using cpal
//!
//! Captures at the device's native sample rate and channel count, as f32.
//! No resampling or down-mixing: the WAV encoder writes whatever layout
//! the device delivered.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::time::{sleep, Duration as TokioDuration};

use crate::application::ports::{AudioCapture, CaptureError};
use crate::domain::audio::DecodedAudio;

/// Scale applied to i16 device samples
const I16_SCALE: f32 = 1.0 / 32768.0;

/// State shared with the capture thread
#[derive(Default)]
struct Shared {
    /// Interleaved samples as delivered by the device
    buffer: StdMutex<Vec<f32>>,
    sample_rate: AtomicU32,
    channels: AtomicU16,
    is_recording: AtomicBool,
    elapsed_ms: AtomicU64,
    /// Set by the capture thread when the device failed to open
    start_error: StdMutex<Option<CaptureError>>,
}

/// Microphone capture on the default input device
///
/// `cpal::Stream` is not `Send`, so the stream lives on its own OS thread
/// for the duration of a take.
pub struct CpalCapture {
    shared: Arc<Shared>,
}

impl CpalCapture {
    /// Create a new capture adapter
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Pick the device's default config when it is f32 or i16, otherwise
    /// the first supported f32/i16 range at its max rate
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        if let Ok(default) = device.default_input_config() {
            if matches!(default.sample_format(), SampleFormat::F32 | SampleFormat::I16) {
                let format = default.sample_format();
                return Ok((default.into(), format));
            }
        }

        let range = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?
            .find(|c| matches!(c.sample_format(), SampleFormat::F32 | SampleFormat::I16))
            .ok_or_else(|| CaptureError::StartFailed("No f32 or i16 input config".into()))?;

        let format = range.sample_format();
        Ok((range.with_max_sample_rate().into(), format))
    }

    /// Append a device callback's samples while a take is running
    fn push_samples(shared: &Shared, samples: impl Iterator<Item = f32>) {
        if !shared.is_recording.load(Ordering::SeqCst) {
            return;
        }
        if let Ok(mut buffer) = shared.buffer.lock() {
            buffer.extend(samples);
        }
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        format: SampleFormat,
        shared: &Arc<Shared>,
    ) -> Result<cpal::Stream, CaptureError> {
        let on_error = |err: cpal::StreamError| log::error!("Audio stream error: {}", err);

        let stream = match format {
            SampleFormat::F32 => {
                let shared = Arc::clone(shared);
                device.build_input_stream(
                    config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        Self::push_samples(&shared, data.iter().copied());
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::I16 => {
                let shared = Arc::clone(shared);
                device.build_input_stream(
                    config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        Self::push_samples(&shared, data.iter().map(|&s| s as f32 * I16_SCALE));
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(CaptureError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| CaptureError::StartFailed(e.to_string()))
    }

    /// Body of the capture thread
    fn run_capture(shared: Arc<Shared>) -> Result<(), CaptureError> {
        let device = Self::get_input_device()?;
        let (config, format) = Self::get_input_config(&device)?;

        shared.sample_rate.store(config.sample_rate.0, Ordering::SeqCst);
        shared.channels.store(config.channels, Ordering::SeqCst);

        let stream = Self::build_stream(&device, &config, format, &shared)?;
        stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        let start = Instant::now();
        while shared.is_recording.load(Ordering::SeqCst) {
            shared
                .elapsed_ms
                .store(start.elapsed().as_millis() as u64, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        drop(stream);
        Ok(())
    }

    /// Failure recorded by the capture thread, if any
    fn take_start_error(&self) -> Option<CaptureError> {
        self.shared
            .start_error
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
    }

    fn take_buffer(&self) -> Vec<f32> {
        match self.shared.buffer.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn start(&self) -> Result<(), CaptureError> {
        if self.shared.is_recording.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Capture already in progress".to_string(),
            ));
        }

        self.take_buffer();
        self.shared.elapsed_ms.store(0, Ordering::SeqCst);
        if let Ok(mut slot) = self.shared.start_error.lock() {
            *slot = None;
        }

        let shared = Arc::clone(&self.shared);
        std::thread::spawn(move || {
            if let Err(e) = Self::run_capture(Arc::clone(&shared)) {
                log::error!("capture thread failed: {}", e);
                if let Ok(mut slot) = shared.start_error.lock() {
                    *slot = Some(e);
                }
                shared.is_recording.store(false, Ordering::SeqCst);
            }
        });

        // Give the device a moment to open
        sleep(TokioDuration::from_millis(100)).await;

        if !self.shared.is_recording.load(Ordering::SeqCst) {
            return Err(self.take_start_error().unwrap_or_else(|| {
                CaptureError::StartFailed("Failed to start capture".into())
            }));
        }

        Ok(())
    }

    async fn stop(&self) -> Result<DecodedAudio, CaptureError> {
        if !self.shared.is_recording.swap(false, Ordering::SeqCst) {
            // The device may have failed after `start` returned
            return Err(self
                .take_start_error()
                .unwrap_or(CaptureError::NotRecording));
        }

        // Let the capture thread drop the stream
        sleep(TokioDuration::from_millis(100)).await;

        let sample_rate = self.shared.sample_rate.load(Ordering::SeqCst);
        let channels = usize::from(self.shared.channels.load(Ordering::SeqCst));
        let mut samples = self.take_buffer();

        if samples.is_empty() || channels == 0 {
            return Err(CaptureError::Empty);
        }

        // A callback may have been cut off mid-frame
        samples.truncate(samples.len() - samples.len() % channels);

        DecodedAudio::from_interleaved(sample_rate, channels, &samples)
            .map_err(|e| CaptureError::Failed(e.to_string()))
    }

    async fn cancel(&self) -> Result<(), CaptureError> {
        self.shared.is_recording.store(false, Ordering::SeqCst);
        sleep(TokioDuration::from_millis(100)).await;
        self.take_buffer();
        self.shared.elapsed_ms.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.shared.is_recording.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.shared.elapsed_ms.load(Ordering::SeqCst)
    }
}
