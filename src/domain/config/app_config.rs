//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::audio::QuantizeMode;
use crate::domain::persona::Intent;
use crate::domain::recording::Duration;

/// Default transcription endpoint
pub const DEFAULT_TRANSCRIBE_URL: &str = "http://127.0.0.1:8000/transcribe";

/// Teller persona configuration.
/// One optional reply per intent; `{institution}` is substituted at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub institution: Option<String>,
    pub greeting: Option<String>,
    pub balance: Option<String>,
    pub transfer: Option<String>,
    pub card: Option<String>,
    pub loan: Option<String>,
    pub hours: Option<String>,
    pub fallback: Option<String>,
}

impl PersonaConfig {
    /// Configured reply for an intent, if any
    pub fn reply(&self, intent: Intent) -> Option<&str> {
        self.reply_slot(intent).as_deref()
    }

    /// Set the reply for an intent
    pub fn set_reply(&mut self, intent: Intent, text: impl Into<String>) {
        *self.reply_slot_mut(intent) = Some(text.into());
    }

    fn reply_slot(&self, intent: Intent) -> &Option<String> {
        match intent {
            Intent::Greeting => &self.greeting,
            Intent::Balance => &self.balance,
            Intent::Transfer => &self.transfer,
            Intent::Card => &self.card,
            Intent::Loan => &self.loan,
            Intent::Hours => &self.hours,
            Intent::Fallback => &self.fallback,
        }
    }

    fn reply_slot_mut(&mut self, intent: Intent) -> &mut Option<String> {
        match intent {
            Intent::Greeting => &mut self.greeting,
            Intent::Balance => &mut self.balance,
            Intent::Transfer => &mut self.transfer,
            Intent::Card => &mut self.card,
            Intent::Loan => &mut self.loan,
            Intent::Hours => &mut self.hours,
            Intent::Fallback => &mut self.fallback,
        }
    }

    /// Merge, where other takes precedence field by field
    fn merge(self, other: Self) -> Self {
        Self {
            institution: other.institution.or(self.institution),
            greeting: other.greeting.or(self.greeting),
            balance: other.balance.or(self.balance),
            transfer: other.transfer.or(self.transfer),
            card: other.card.or(self.card),
            loan: other.loan.or(self.loan),
            hours: other.hours.or(self.hours),
            fallback: other.fallback.or(self.fallback),
        }
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub transcribe_url: Option<String>,
    pub duration: Option<String>,
    pub quantize: Option<String>,
    pub persona: Option<PersonaConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            transcribe_url: Some(DEFAULT_TRANSCRIBE_URL.to_string()),
            duration: Some(Duration::default_duration().to_string()),
            quantize: Some(QuantizeMode::default().to_string()),
            persona: Some(PersonaConfig {
                institution: Some(crate::domain::persona::DEFAULT_INSTITUTION.to_string()),
                ..Default::default()
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            transcribe_url: other.transcribe_url.or(self.transcribe_url),
            duration: other.duration.or(self.duration),
            quantize: other.quantize.or(self.quantize),
            persona: match (self.persona, other.persona) {
                (None, None) => None,
                (Some(b), None) => Some(b),
                (None, Some(o)) => Some(o),
                (Some(b), Some(o)) => Some(b.merge(o)),
            },
        }
    }

    /// Get the transcription endpoint, or the local default
    pub fn transcribe_url_or_default(&self) -> &str {
        self.transcribe_url
            .as_deref()
            .unwrap_or(DEFAULT_TRANSCRIBE_URL)
    }

    /// Get persona config, or an empty one
    pub fn persona_or_default(&self) -> PersonaConfig {
        self.persona.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.transcribe_url.as_deref(), Some(DEFAULT_TRANSCRIBE_URL));
        assert_eq!(config.duration, Some("10s".to_string()));
        assert_eq!(config.quantize, Some("wrap".to_string()));
        let persona = config.persona.as_ref().unwrap();
        assert_eq!(persona.institution.as_deref(), Some("Harbor Trust Bank"));
        assert!(persona.greeting.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.transcribe_url.is_none());
        assert!(config.duration.is_none());
        assert!(config.quantize.is_none());
        assert!(config.persona.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            transcribe_url: Some("http://base/transcribe".to_string()),
            duration: Some("10s".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            transcribe_url: Some("http://other/transcribe".to_string()),
            duration: None, // Should not override
            quantize: Some("clamp".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.transcribe_url.as_deref(), Some("http://other/transcribe"));
        assert_eq!(merged.duration, Some("10s".to_string())); // Kept from base
        assert_eq!(merged.quantize.as_deref(), Some("clamp"));
    }

    #[test]
    fn merge_persona_fields() {
        let base = AppConfig {
            persona: Some(PersonaConfig {
                institution: Some("Base Bank".to_string()),
                hours: Some("9 to 5".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = AppConfig {
            persona: Some(PersonaConfig {
                institution: Some("Other Bank".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let persona = base.merge(other).persona_or_default();
        assert_eq!(persona.institution.as_deref(), Some("Other Bank"));
        assert_eq!(persona.hours.as_deref(), Some("9 to 5"));
    }

    #[test]
    fn transcribe_url_falls_back() {
        assert_eq!(
            AppConfig::empty().transcribe_url_or_default(),
            DEFAULT_TRANSCRIBE_URL
        );
    }

    #[test]
    fn persona_reply_slots() {
        let mut persona = PersonaConfig::default();
        assert!(persona.reply(Intent::Loan).is_none());
        persona.set_reply(Intent::Loan, "Ask about loans");
        assert_eq!(persona.reply(Intent::Loan), Some("Ask about loans"));
        assert!(persona.reply(Intent::Card).is_none());
    }
}
