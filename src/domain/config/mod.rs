//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, PersonaConfig, DEFAULT_TRANSCRIBE_URL};
