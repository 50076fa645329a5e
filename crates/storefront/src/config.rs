//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `MARCHENET_API_URL` - Backend origin (default: <https://marchenet-server.onrender.com>)
//! - `MARCHENET_API_PREFIX` - Path prefix of the REST API (default: `/api`)
//! - `MARCHENET_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `MARCHENET_PAYMENT_PROXY_URL` - Invoice proxy endpoint
//!   (default: <http://127.0.0.1:8888/payments/invoice>)
//! - `MARCHENET_TOKEN_FILE` - Where the bearer token is persisted (default: `.marchenet-token`)
//! - `MARCHENET_SUGGESTION_TTL_SECS` - Search suggestion cache TTL (default: 300)
//! - `MARCHENET_SUGGESTION_ATTEMPTS` - Suggestion fetch attempts (default: 3)
//!
//! Payment provider credentials are deliberately absent: they only exist in
//! the payment proxy's environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://marchenet-server.onrender.com";
const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_PAYMENT_PROXY_URL: &str = "http://127.0.0.1:8888/payments/invoice";
const DEFAULT_TOKEN_FILE: &str = ".marchenet-token";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("URL cannot be used as an API base: {0}")]
    NotABase(String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API root, always ending in `/` (origin + prefix).
    pub api_base: Url,
    /// Timeout applied to every backend and proxy request.
    pub request_timeout: Duration,
    /// Payment invoice proxy endpoint.
    pub payment_proxy_url: Url,
    /// Persistent bearer token location.
    pub token_file: PathBuf,
    /// Search suggestion tuning.
    pub suggestions: SuggestionConfig,
}

/// Search suggestion cache and retry settings.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub cache_ttl: Duration,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl StorefrontConfig {
    /// Configuration with defaults for everything but the backend origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` cannot be used as a base URL.
    pub fn new(api_url: &Url) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: build_api_base(api_url, DEFAULT_API_PREFIX)?,
            request_timeout: Duration::from_secs(10),
            payment_proxy_url: parse_url(DEFAULT_PAYMENT_PROXY_URL)?,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            suggestions: SuggestionConfig::default(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url(&get_env_or_default("MARCHENET_API_URL", DEFAULT_API_URL))?;
        let prefix = get_env_or_default("MARCHENET_API_PREFIX", DEFAULT_API_PREFIX);
        let timeout_secs: u64 = parse_env("MARCHENET_API_TIMEOUT_SECS", 10)?;
        let payment_proxy_url = parse_url(&get_env_or_default(
            "MARCHENET_PAYMENT_PROXY_URL",
            DEFAULT_PAYMENT_PROXY_URL,
        ))?;
        let token_file = PathBuf::from(get_env_or_default("MARCHENET_TOKEN_FILE", DEFAULT_TOKEN_FILE));

        let suggestions = SuggestionConfig {
            cache_ttl: Duration::from_secs(parse_env("MARCHENET_SUGGESTION_TTL_SECS", 300)?),
            max_attempts: parse_env("MARCHENET_SUGGESTION_ATTEMPTS", 3)?,
            ..SuggestionConfig::default()
        };

        Ok(Self {
            api_base: build_api_base(&api_url, &prefix)?,
            request_timeout: Duration::from_secs(timeout_secs),
            payment_proxy_url,
            token_file,
            suggestions,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Join origin and prefix into a base URL that ends in `/`, so relative
/// endpoint paths resolve underneath it.
fn build_api_base(api_url: &Url, prefix: &str) -> Result<Url, ConfigError> {
    if api_url.cannot_be_a_base() {
        return Err(ConfigError::NotABase(api_url.to_string()));
    }

    let mut path = api_url.path().trim_end_matches('/').to_owned();
    let prefix = prefix.trim_matches('/');
    if !prefix.is_empty() {
        path.push('/');
        path.push_str(prefix);
    }
    path.push('/');

    let mut base = api_url.clone();
    base.set_path(&path);
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl(value.to_owned(), e))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_base_appends_prefix() {
        let base = build_api_base(&Url::parse("https://api.exemple.sn").unwrap(), "/api").unwrap();
        assert_eq!(base.as_str(), "https://api.exemple.sn/api/");
    }

    #[test]
    fn test_build_api_base_keeps_existing_path() {
        let base =
            build_api_base(&Url::parse("http://127.0.0.1:9000/v2/").unwrap(), "api/").unwrap();
        assert_eq!(base.as_str(), "http://127.0.0.1:9000/v2/api/");
    }

    #[test]
    fn test_build_api_base_without_prefix() {
        let base = build_api_base(&Url::parse("http://localhost:4000").unwrap(), "").unwrap();
        assert_eq!(base.as_str(), "http://localhost:4000/");
        assert_eq!(base.join("auth/check").unwrap().path(), "/auth/check");
    }

    #[test]
    fn test_build_api_base_rejects_non_base() {
        let url = Url::parse("mailto:contact@marchenet.sn").unwrap();
        assert!(matches!(
            build_api_base(&url, "/api"),
            Err(ConfigError::NotABase(_))
        ));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = StorefrontConfig::new(&Url::parse("http://localhost:4000").unwrap()).unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:4000/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.suggestions.max_attempts, 3);
        assert_eq!(config.suggestions.cache_ttl, Duration::from_secs(300));
    }
}
