//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::AudioData;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("Upload failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse transcription response: {0}")]
    ParseError(String),

    #[error("Transcription service error: {0}")]
    ApiError(String),
}

/// Port for speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an encoded audio file to text.
    ///
    /// # Arguments
    /// * `audio` - The WAV payload, sent as an opaque blob
    ///
    /// # Returns
    /// The transcribed text or an error
    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError>;
}
