//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, MAX_PAGE_LIMIT};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

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
    ensure_known_key(key)?;
    let value = value.trim();

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match read_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = read_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_url" => config.api_url.clone(),
        "page_limit" => config.page_limit.map(|n| n.to_string()),
        "max_display_duration" => config.max_display_duration.clone(),
        "request_timeout" => config.request_timeout.clone(),
        _ => None,
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "api_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(
                    "Value must be an http:// or https:// URL".to_string(),
                ));
            }
            config.api_url = Some(value.trim_end_matches('/').to_string());
        }
        "page_limit" => {
            let limit = value
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_PAGE_LIMIT).contains(n))
                .ok_or_else(|| {
                    invalid(format!("Value must be a number from 1 to {}", MAX_PAGE_LIMIT))
                })?;
            config.page_limit = Some(limit);
        }
        "max_display_duration" | "request_timeout" => {
            let duration = value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
            let canonical = Some(duration.to_string());
            if key == "max_display_duration" {
                config.max_display_duration = canonical;
            } else {
                config.request_timeout = canonical;
            }
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_requires_http_scheme() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "api_url", "ftp://example.com").is_err());

        apply_value(&mut config, "api_url", "https://diary.example.com/").unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://diary.example.com"));
    }

    #[test]
    fn page_limit_is_bounded() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "page_limit", "0").is_err());
        assert!(apply_value(&mut config, "page_limit", "101").is_err());
        assert!(apply_value(&mut config, "page_limit", "many").is_err());

        apply_value(&mut config, "page_limit", "100").unwrap();
        assert_eq!(config.page_limit, Some(100));
    }

    #[test]
    fn durations_are_validated_and_normalised() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "request_timeout", "soon").is_err());

        apply_value(&mut config, "request_timeout", "90s").unwrap();
        assert!(config.request_timeout.is_some());
        assert!(config.max_display_duration.is_none());

        apply_value(&mut config, "max_display_duration", "10m").unwrap();
        assert_eq!(config.max_display_duration.as_deref(), Some("10m"));
    }

    #[test]
    fn read_value_covers_every_key() {
        let config = AppConfig::defaults();
        for key in VALID_CONFIG_KEYS {
            assert!(read_value(&config, key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(ensure_known_key("api_key").is_err());
        assert!(ensure_known_key("api_url").is_ok());
    }
}
