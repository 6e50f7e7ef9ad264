use std::{collections::HashMap, fs, time::Duration};

use serde::Deserialize;
use shared::protocol::DEFAULT_API_BASE_URL;
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "verify.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub api_base_url: String,
    /// Unset means a request may wait on the service indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, SettingsError> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Defaults, then `verify.toml` in the working directory, then the environment.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
                    settings.api_base_url = v.to_string();
                }
                if let Some(v) = file_cfg
                    .get("request_timeout_secs")
                    .and_then(toml::Value::as_integer)
                {
                    settings.request_timeout_secs = u64::try_from(v).ok();
                }
            }
            Err(err) => {
                tracing::warn!(file = SETTINGS_FILE, %err, "ignoring unparseable settings file");
            }
        }
    }

    if let Some(v) = env("VERIFY_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    Ok(settings)
}

pub fn normalize_base_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|source| SettingsError::InvalidBaseUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}
