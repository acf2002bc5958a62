//! Capture port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::DecodedAudio;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("No capture in progress")]
    NotRecording,

    #[error("Capture failed: {0}")]
    Failed(String),

    #[error("No audio was captured")]
    Empty,
}

/// Port for signal-controlled microphone capture
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Open the input device and start buffering samples
    async fn start(&self) -> Result<(), CaptureError>;

    /// Stop capturing and return everything buffered since `start`,
    /// at the device's native rate and channel count
    async fn stop(&self) -> Result<DecodedAudio, CaptureError>;

    /// Stop capturing and discard the buffer
    async fn cancel(&self) -> Result<(), CaptureError>;

    /// Check if currently capturing
    fn is_recording(&self) -> bool;

    /// Get elapsed capture time in milliseconds
    fn elapsed_ms(&self) -> u64;
}
