//! CLI command implementations.

pub mod auth;
pub mod packs;
pub mod route;
pub mod search;
pub mod vendor;

use std::sync::Arc;

use marchenet_core::{Country, EmailError, PhoneError, Session};
use marchenet_storefront::search::SearchError;
use marchenet_storefront::subscription::SubscriptionError;
use marchenet_storefront::{
    ApiClient, ApiError, ConfigError, FileTokenStore, OnboardingError, PaymentClient,
    PaymentError, SessionResolution, SessionResolver, StorefrontConfig, TokenStoreError,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token store error: {0}")]
    Token(#[from] TokenStoreError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    #[error("Not signed in. Run `mn-cli auth login` first")]
    NotSignedIn,
}

/// Clients shared by every command, built from the environment.
pub struct Context {
    pub config: StorefrontConfig,
    pub api: ApiClient,
}

impl Context {
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the token file
    /// cannot be read.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let tokens = Arc::new(FileTokenStore::open(config.token_file.clone())?);
        let api = ApiClient::new(&config, tokens)?;
        Ok(Self { config, api })
    }

    pub fn resolver(&self) -> SessionResolver {
        SessionResolver::new(self.api.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn payments(&self) -> Result<PaymentClient, CommandError> {
        Ok(PaymentClient::new(&self.config)?)
    }

    /// The current session, or `NotSignedIn`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the backend could not be reached.
    pub async fn require_session(&self) -> Result<Session, CommandError> {
        match self.resolver().resolve().await {
            SessionResolution::Authenticated(session) => Ok(session),
            SessionResolution::Anonymous => Err(CommandError::NotSignedIn),
            SessionResolution::Unreachable(e) => Err(e.into()),
        }
    }
}

/// Parse a country name or ISO code.
///
/// # Errors
///
/// Returns `UnknownCountry` for anything outside the supported list.
pub fn parse_country(value: &str) -> Result<Country, CommandError> {
    Country::find(value).ok_or_else(|| CommandError::UnknownCountry(value.to_string()))
}
