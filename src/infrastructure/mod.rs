//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the microphone, symphonia, the transcription
//! service and the config file.

pub mod config;
pub mod decoding;
pub mod recording;
pub mod responder;
pub mod transcription;

// Re-export adapters
pub use config::XdgConfigStore;
pub use decoding::SymphoniaDecoder;
pub use recording::{create_capture, CpalCapture};
pub use responder::ScriptedResponder;
pub use transcription::HttpTranscriber;
