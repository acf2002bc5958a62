//! Domain error types

use thiserror::Error;

/// Error when parsing a recording length
#[derive(Debug, Clone, Error)]
#[error("Invalid duration \"{input}\": {reason} (examples: 30s, 1m, 2m30s, 1500ms)")]
pub struct DurationParseError {
    pub input: String,
    pub reason: &'static str,
}

/// Error when an unknown quantize mode is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid quantize mode: \"{input}\". Valid modes are: wrap, clamp, strict")]
pub struct InvalidQuantizeModeError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
