//! Teller persona: intent detection and scripted replies

mod intent;
mod script;

pub use intent::{Intent, ALL_INTENTS};
pub use script::{PersonaScript, DEFAULT_INSTITUTION};
