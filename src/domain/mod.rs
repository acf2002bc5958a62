//! Domain layer - Core business logic
//!
//! Contains value objects, entities, the WAV encoder and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod persona;
pub mod recording;
pub mod session;
pub mod transcription;

// Re-export common types
pub use audio::{encode_wav, encode_wav_with, DecodedAudio, EncodingError, QuantizeMode};
pub use config::{AppConfig, PersonaConfig};
pub use error::*;
pub use persona::{Intent, PersonaScript};
pub use recording::Duration;
pub use session::{RecordingSession, SessionState};
pub use transcription::{AudioData, AudioMimeType};
