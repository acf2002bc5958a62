//! Voice teller - speech in, PCM WAV over HTTP, scripted banking answer out
//!
//! This crate records audio from the microphone (or decodes an audio file),
//! encodes it as a canonical 16-bit PCM WAV file, uploads it to a
//! transcription service and answers the transcript as a bank teller.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: WAV encoder, value objects, persona script, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, symphonia, HTTP, config file)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
