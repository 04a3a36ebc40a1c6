//! Environment-driven application configuration.
//!
//! The parsing core is decoupled from the process environment so it can be
//! tested against a plain `HashMap` lookup.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime configuration for clients and the engine.
#[derive(Clone)]
pub struct AppConfig {
    /// Per-call HTTP timeout for geocoding and routing requests.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Politeness delay between consecutive external calls.
    pub inter_request_delay_ms: u64,
    /// Default response language for geocoding and routing.
    pub language: String,
    pub geocoder_base_url: String,
    pub routing_base_url: String,
    pub routing_api_key: Option<String>,
    /// Optional path to a postal dataset CSV overriding the bundled one.
    pub postal_data_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("language", &self.language)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("routing_base_url", &self.routing_base_url)
            .field(
                "routing_api_key",
                &self.routing_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("postal_data_path", &self.postal_data_path)
            .finish()
    }
}

/// Load configuration from the process environment, reading `.env` first.
///
/// # Errors
///
/// Returns [`ConfigError`] when a present variable fails to parse. Every
/// variable has a default, so a bare environment is valid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unparseable numeric values.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_owned()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_owned(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_owned(),
                reason: e.to_string(),
            })
    };

    Ok(AppConfig {
        request_timeout_secs: parse_u64("KYORI_REQUEST_TIMEOUT_SECS", "10")?,
        user_agent: or_default("KYORI_USER_AGENT", "kyori/0.1 (postal-distance)"),
        max_retries: parse_u32("KYORI_MAX_RETRIES", "3")?,
        retry_backoff_base_ms: parse_u64("KYORI_RETRY_BACKOFF_BASE_MS", "1000")?,
        inter_request_delay_ms: parse_u64("KYORI_INTER_REQUEST_DELAY_MS", "250")?,
        language: or_default("KYORI_LANGUAGE", "ja"),
        geocoder_base_url: or_default(
            "KYORI_GEOCODER_BASE_URL",
            "https://nominatim.openstreetmap.org/search",
        ),
        routing_base_url: or_default(
            "KYORI_ROUTING_BASE_URL",
            "https://maps.googleapis.com/maps/api/directions/json",
        ),
        routing_api_key: lookup("KYORI_ROUTING_API_KEY").ok(),
        postal_data_path: lookup("KYORI_POSTAL_DATA_PATH").ok().map(PathBuf::from),
    })
}
