use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::{ConfigError, PanelSyncError};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Lower bound for text-input quiescence before a search query fires.
pub const MIN_DEBOUNCE_MS: u64 = 250;

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

/// Settings for talking to the dashboard backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub csrf_cookie_name: String,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    pub preferences_path: Option<PathBuf>,
    pub environment: Environment,
}

impl ClientConfig {
    /// Builds a configuration for `base_url` with every other setting at its default.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: normalize_base(base_url),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            preferences_path: None,
            environment: Environment::default(),
        }
    }

    /// Loads configuration from the process environment (`PANELSYNC_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix("PANELSYNC_")
    }

    /// Loads configuration from env vars prefixed with the provided value.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let base_key = key("BASE_URL");
        let base_url = match env::var(&base_key) {
            Ok(raw) => Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
                key: base_key.clone(),
                source,
            })?,
            Err(_) => Url::parse(DEFAULT_BASE_URL).map_err(|source| ConfigError::InvalidUrl {
                key: base_key.clone(),
                source,
            })?,
        };

        let csrf_cookie_name = env::var(key("CSRF_COOKIE"))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CSRF_COOKIE.to_string());

        let timeout_secs = parse_env::<u64>(&key("TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: key("TIMEOUT_SECS"),
                value: "0".into(),
            });
        }

        let debounce_ms =
            parse_env::<u64>(&key("DEBOUNCE_MS"), DEFAULT_DEBOUNCE_MS)?.max(MIN_DEBOUNCE_MS);

        let preferences_path = env::var(key("PREFS_PATH"))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let environment = env::var(key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        Ok(Self {
            base_url: normalize_base(base_url),
            csrf_cookie_name,
            request_timeout: Duration::from_secs(timeout_secs),
            search_debounce: Duration::from_millis(debounce_ms),
            preferences_path,
            environment,
        })
    }

    /// Overrides the backend base URL, keeping the trailing-slash invariant.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            key: "base_url".into(),
            source,
        })?;
        self.base_url = normalize_base(url);
        Ok(self)
    }

    /// Whether the client is running against production.
    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

/// Helper that loads config and converts to the canonical error type.
pub fn load_client_config() -> Result<ClientConfig, PanelSyncError> {
    Ok(ClientConfig::from_env()?)
}

// Relative endpoint paths are joined onto the base, so it must end in '/'.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let mut path = url.path().trim_end_matches('/').to_string();
        path.push('/');
        url.set_path(&path);
    }
    url
}

fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}
