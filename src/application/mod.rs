//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod capture_session;
pub mod converse;
pub mod convert;
pub mod ports;

// Re-export use cases
pub use capture_session::{CaptureSession, CaptureSessionError};
pub use converse::{
    ConverseCallbacks, ConverseError, ConverseInput, ConverseOutput, ConverseUseCase,
};
pub use convert::{AudioSource, ConvertError, WavConverter};
