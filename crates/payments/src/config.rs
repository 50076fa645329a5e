//! Payment proxy configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PAYMENTS_PUBLIC_URL` - Public origin of the storefront (callback, return
//!   and cancel URLs are derived from it)
//! - `PAYDUNYA_MASTER_KEY` - PayDunya master key
//! - `PAYDUNYA_PUBLIC_KEY` - PayDunya public key
//! - `PAYDUNYA_PRIVATE_KEY` - PayDunya private key
//! - `PAYDUNYA_TOKEN` - PayDunya token
//!
//! ## Optional
//! - `PAYMENTS_HOST` - Bind address (default: 127.0.0.1)
//! - `PAYMENTS_PORT` - Listen port (default: 8888)
//! - `PAYMENTS_TIMEOUT_SECS` - Provider request timeout (default: 10)
//! - `PAYDUNYA_API_URL` - API base (default: <https://app.paydunya.com/api/v1>)
//! - `PAYDUNYA_CHECKOUT_URL` - Checkout page prefix used when the provider
//!   only returns a token (default: <https://paydunya.com/checkout/invoice/>)
//! - `PAYDUNYA_MODE` - `test` or `live` (default: test)
//! - `STORE_NAME`, `STORE_TAGLINE`, `STORE_PHONE` - Store metadata shown on
//!   the checkout page
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_API_URL: &str = "https://app.paydunya.com/api/v1";
const DEFAULT_CHECKOUT_URL: &str = "https://paydunya.com/checkout/invoice/";
const DEFAULT_STORE_NAME: &str = "MarchéNet Afrique";
const DEFAULT_STORE_TAGLINE: &str = "La plateforme des vendeurs africains";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Payment proxy configuration.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public origin of the storefront
    pub public_url: Url,
    /// Timeout for provider requests
    pub request_timeout: Duration,
    pub paydunya: PaydunyaConfig,
    pub store: StoreInfo,
    pub sentry: SentryConfig,
}

/// Whether invoices are created against the sandbox or for real.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaydunyaMode {
    #[default]
    Test,
    Live,
}

impl PaydunyaMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for PaydunyaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaydunyaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "live" => Ok(Self::Live),
            other => Err(format!("expected 'test' or 'live', got '{other}'")),
        }
    }
}

/// The four header credentials PayDunya requires on every call.
///
/// Implements `Debug` manually to redact every field.
#[derive(Clone)]
pub struct PaydunyaKeys {
    pub master_key: SecretString,
    pub public_key: SecretString,
    pub private_key: SecretString,
    pub token: SecretString,
}

impl fmt::Debug for PaydunyaKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaydunyaKeys")
            .field("master_key", &"[REDACTED]")
            .field("public_key", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// PayDunya API configuration.
#[derive(Debug, Clone)]
pub struct PaydunyaConfig {
    /// API base, always ending with `/`
    pub api_url: Url,
    /// Checkout page prefix, always ending with `/`
    pub checkout_url: Url,
    pub mode: PaydunyaMode,
    pub keys: PaydunyaKeys,
}

/// Store metadata attached to every invoice.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    pub name: String,
    pub tagline: String,
    pub phone: Option<String>,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            tagline: DEFAULT_STORE_TAGLINE.to_string(),
            phone: None,
        }
    }
}

/// Sentry settings.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        }
    }
}

impl PaymentsConfig {
    /// Configuration with defaults for everything but the origin and keys.
    #[must_use]
    pub fn new(public_url: Url, paydunya: PaydunyaConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8888,
            public_url,
            request_timeout: Duration::from_secs(10),
            paydunya,
            store: StoreInfo::default(),
            sentry: SentryConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("PAYMENTS_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env("PAYMENTS_PORT", 8888_u16)?;
        let public_url = parse_url("PAYMENTS_PUBLIC_URL", &get_required_env("PAYMENTS_PUBLIC_URL")?)?;
        let timeout_secs = parse_env("PAYMENTS_TIMEOUT_SECS", 10_u64)?;

        Ok(Self {
            host,
            port,
            public_url,
            request_timeout: Duration::from_secs(timeout_secs),
            paydunya: PaydunyaConfig::from_env()?,
            store: StoreInfo::from_env(),
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// A page of the storefront, resolved against the public origin.
    #[must_use]
    pub fn page(&self, path: &str) -> Url {
        let mut url = self.public_url.clone();
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

impl PaydunyaConfig {
    /// Default endpoints in test mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a default URL fails to parse.
    pub fn new(keys: PaydunyaKeys) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_base_url("PAYDUNYA_API_URL", DEFAULT_API_URL)?,
            checkout_url: parse_base_url("PAYDUNYA_CHECKOUT_URL", DEFAULT_CHECKOUT_URL)?,
            mode: PaydunyaMode::Test,
            keys,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let keys = PaydunyaKeys {
            master_key: get_validated_secret("PAYDUNYA_MASTER_KEY")?,
            public_key: get_validated_secret("PAYDUNYA_PUBLIC_KEY")?,
            private_key: get_validated_secret("PAYDUNYA_PRIVATE_KEY")?,
            token: get_validated_secret("PAYDUNYA_TOKEN")?,
        };

        Ok(Self {
            api_url: parse_base_url(
                "PAYDUNYA_API_URL",
                &get_env_or_default("PAYDUNYA_API_URL", DEFAULT_API_URL),
            )?,
            checkout_url: parse_base_url(
                "PAYDUNYA_CHECKOUT_URL",
                &get_env_or_default("PAYDUNYA_CHECKOUT_URL", DEFAULT_CHECKOUT_URL),
            )?,
            mode: parse_env("PAYDUNYA_MODE", PaydunyaMode::Test)?,
            keys,
        })
    }
}

impl StoreInfo {
    fn from_env() -> Self {
        Self {
            name: get_env_or_default("STORE_NAME", DEFAULT_STORE_NAME),
            tagline: get_env_or_default("STORE_TAGLINE", DEFAULT_STORE_TAGLINE),
            phone: get_optional_env("STORE_PHONE"),
        }
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", defaults.sample_rate)?,
            traces_sample_rate: parse_env(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.traces_sample_rate,
            )?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match get_optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a URL used as a base for `Url::join`, so it must end with `/`.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.ends_with('/') {
        parse_url(key, raw)
    } else {
        parse_url(key, &format!("{raw}/"))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the key from the PayDunya dashboard."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(value.trim(), key)?;
    Ok(SecretString::from(value.trim().to_string()))
}
