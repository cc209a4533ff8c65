use std::net::SocketAddr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Healthwise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_NEWS_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthwise=info,healthwise_lib=info,tower_http=warn"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub gemini_url: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub news_url: String,
    pub news_api_key: Option<String>,
    pub weather_url: String,
    pub http_timeout_secs: u64,
    /// Raw `token:uid:email:role` entries, parsed by `auth::StaticTokenAuth`.
    pub api_tokens: Option<String>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("HEALTHWISE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "HEALTHWISE_BIND_ADDR",
                reason: e.to_string(),
            })?;

        let http_timeout_secs = match get("HEALTHWISE_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue {
                        key: "HEALTHWISE_HTTP_TIMEOUT_SECS",
                        reason: "must be greater than zero".into(),
                    })
                }
                Ok(secs) => secs,
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "HEALTHWISE_HTTP_TIMEOUT_SECS",
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            gemini_url: get("HEALTHWISE_GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.into()),
            gemini_model: get("HEALTHWISE_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            gemini_api_key: get("HEALTHWISE_GEMINI_API_KEY"),
            news_url: get("HEALTHWISE_NEWS_URL").unwrap_or_else(|| DEFAULT_NEWS_URL.into()),
            news_api_key: get("HEALTHWISE_NEWS_API_KEY"),
            weather_url: get("HEALTHWISE_WEATHER_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.into()),
            http_timeout_secs,
            api_tokens: get("HEALTHWISE_API_TOKENS"),
        })
    }
}
