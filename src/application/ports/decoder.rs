//! Decoder port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::DecodedAudio;
use crate::domain::transcription::AudioData;

/// Decoding errors
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("Unsupported or unrecognized audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No decodable audio track found")]
    NoTrack,

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Decoded audio is empty")]
    Empty,
}

/// Port for turning a compressed audio file into planar samples
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Decode the whole file.
    ///
    /// The result keeps the source's sample rate and channel layout.
    async fn decode(&self, audio: &AudioData) -> Result<DecodedAudio, DecodeError>;
}
