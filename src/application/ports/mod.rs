//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod decoder;
pub mod responder;
pub mod transcriber;

// Re-export common types
pub use capture::{AudioCapture, CaptureError};
pub use config::ConfigStore;
pub use decoder::{AudioDecoder, DecodeError};
pub use responder::{Responder, ResponderError};
pub use transcriber::{Transcriber, TranscriptionError};
