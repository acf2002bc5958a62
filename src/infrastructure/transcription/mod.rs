//! Transcription adapters

mod http;

pub use http::HttpTranscriber;
