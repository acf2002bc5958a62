//! Scripted teller responder
//!
//! Keyword intent matching over a [`PersonaScript`]. No model, no network.

use async_trait::async_trait;

use crate::application::ports::{Responder, ResponderError};
use crate::domain::config::PersonaConfig;
use crate::domain::persona::PersonaScript;

/// Responder that answers from a fixed persona script
#[derive(Debug, Clone, Default)]
pub struct ScriptedResponder {
    script: PersonaScript,
}

impl ScriptedResponder {
    /// Create a responder from a resolved script
    pub fn new(script: PersonaScript) -> Self {
        Self { script }
    }

    /// Create a responder from persona config
    pub fn from_config(config: &PersonaConfig) -> Self {
        Self::new(PersonaScript::from_config(config))
    }

    /// The script in use
    pub fn script(&self) -> &PersonaScript {
        &self.script
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    async fn respond(&self, transcript: &str) -> Result<String, ResponderError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(ResponderError::EmptyInput);
        }

        let (intent, reply) = self.script.answer(transcript);
        log::debug!("detected intent '{}' for {:?}", intent, transcript);
        Ok(reply)
    }
}
