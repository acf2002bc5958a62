//! Responder port interface

use async_trait::async_trait;
use thiserror::Error;

/// Responder errors
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    #[error("Nothing to respond to: the transcript is empty")]
    EmptyInput,

    #[error("Responder failed: {0}")]
    Failed(String),
}

/// Port for the conversational persona
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce the persona's reply to a transcribed utterance
    async fn respond(&self, transcript: &str) -> Result<String, ResponderError>;
}
