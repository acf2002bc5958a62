//! Persona script value object

use super::intent::Intent;
use crate::domain::config::PersonaConfig;

/// Default institution name
pub const DEFAULT_INSTITUTION: &str = "Harbor Trust Bank";

/// Placeholder replaced with the institution name in every reply
const INSTITUTION_PLACEHOLDER: &str = "{institution}";

/// Resolved set of replies for the teller persona.
/// Built from config; missing entries fall back to the built-in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaScript {
    institution: String,
    config: PersonaConfig,
}

impl PersonaScript {
    /// Build a script from (possibly partial) persona config
    pub fn from_config(config: &PersonaConfig) -> Self {
        let institution = config
            .institution
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_INSTITUTION)
            .to_string();

        Self {
            institution,
            config: config.clone(),
        }
    }

    /// Institution the persona speaks for
    pub fn institution(&self) -> &str {
        &self.institution
    }

    /// Reply text for an intent, with the institution substituted
    pub fn reply_for(&self, intent: Intent) -> String {
        let template = self
            .config
            .reply(intent)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| intent.default_reply());
        template.replace(INSTITUTION_PLACEHOLDER, &self.institution)
    }

    /// Detect the intent of an utterance and return the matching reply
    pub fn answer(&self, utterance: &str) -> (Intent, String) {
        let intent = Intent::detect(utterance);
        (intent, self.reply_for(intent))
    }
}

impl Default for PersonaScript {
    fn default() -> Self {
        Self::from_config(&PersonaConfig::default())
    }
}
