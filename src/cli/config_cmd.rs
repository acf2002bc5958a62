//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audio::QuantizeMode;
use crate::domain::config::{AppConfig, PersonaConfig};
use crate::domain::error::ConfigError;
use crate::domain::persona::Intent;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Prefix of the persona table keys
const PERSONA_PREFIX: &str = "persona.";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value);

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;

    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            get_value(&config, key).as_deref().unwrap_or("(not set)"),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Intent whose reply a `persona.<intent>` key sets
fn persona_intent(key: &str) -> Option<Intent> {
    let name = key.strip_prefix(PERSONA_PREFIX)?;
    crate::domain::persona::ALL_INTENTS
        .iter()
        .copied()
        .find(|intent| intent.as_str() == name)
}

/// Write a validated value into the config
fn set_value(config: &mut AppConfig, key: &str, value: &str) {
    match key {
        "transcribe_url" => config.transcribe_url = Some(value.to_string()),
        "duration" => config.duration = Some(value.to_string()),
        "quantize" => config.quantize = Some(value.to_lowercase()),
        _ => {
            let persona = config.persona.get_or_insert_with(PersonaConfig::default);
            if key == "persona.institution" {
                persona.institution = Some(value.to_string());
            } else if let Some(intent) = persona_intent(key) {
                persona.set_reply(intent, value);
            }
        }
    }
}

/// Read a value from the config
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "transcribe_url" => config.transcribe_url.clone(),
        "duration" => config.duration.clone(),
        "quantize" => config.quantize.clone(),
        "persona.institution" => config.persona.as_ref().and_then(|p| p.institution.clone()),
        _ => {
            let intent = persona_intent(key)?;
            config
                .persona
                .as_ref()
                .and_then(|p| p.reply(intent))
                .map(str::to_string)
        }
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "transcribe_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(
                    "URL must start with http:// or https://".to_string(),
                ));
            }
        }
        "duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "quantize" => {
            value
                .parse::<QuantizeMode>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        _ => {
            // persona.* accepts any non-empty text
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
    }
    Ok(())
}
