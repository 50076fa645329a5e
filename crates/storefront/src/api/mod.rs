//! REST client for the MarchéNet backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, cloned cheaply (`Arc` inside)
//! - The bearer token is read from the injected [`TokenStore`] on every
//!   request, never cached in a default header
//! - Any `401` clears the token store, resets the watched [`SessionState`]
//!   and surfaces as [`ApiError::Unauthorized`]
//!
//! Endpoint wrappers live in submodules as `impl ApiClient` blocks.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marchenet_storefront::api::ApiClient;
//! use marchenet_storefront::token::MemoryTokenStore;
//!
//! let api = ApiClient::new(&config, Arc::new(MemoryTokenStore::new()))?;
//! let vendor = api.my_vendor().await?;
//! ```

mod admin;
mod auth;
mod cart;
mod favorites;
mod notifications;
mod products;
mod vendors;

pub use admin::{ContactMessage, MessageFilter, MessageKind, MessagePage, NewNotification};
pub use auth::{AuthCheck, AuthResponse, Registration};
pub use cart::{CartEntry, CartToggle};
pub use favorites::FavoriteToggle;
pub use notifications::{ADMIN_SENDER, Notification, NotificationSender};
pub use products::{
    NewProduct, Product, ProductFilter, ProductImage, ProductPage, ProductStatus, ProductUpdate,
    StockStatus, Suggestion,
};

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::StorefrontConfig;
use crate::session::SessionState;
use crate::token::{TokenStore, TokenStoreError};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body read failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the bearer token (or its absence).
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    /// Any other non-success status, with the backend's message.
    #[error("Backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid endpoint path {0}: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("Token store error: {0}")]
    Token(#[from] TokenStoreError),
}

impl ApiError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Unauthorized => "Session expirée, veuillez vous reconnecter.".to_owned(),
            Self::NotFound => "Ressource introuvable.".to_owned(),
            Self::Transport(_) => "Le serveur est injoignable, réessayez plus tard.".to_owned(),
            Self::Parse(_) | Self::InvalidUrl(..) | Self::Token(_) => {
                "Une erreur inattendue est survenue.".to_owned()
            }
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the MarchéNet REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base: Url,
    tokens: Arc<dyn TokenStore>,
    /// Session reset on `401`, if any.
    session: RwLock<Option<SessionState>>,
}

impl ApiClient {
    /// Create a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base: config.api_base.clone(),
                tokens,
                session: RwLock::new(None),
            }),
        })
    }

    /// The token store this client reads from.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Replace (or clear) the bearer token used by subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Token` if the store could not persist the change.
    pub fn set_token(&self, token: Option<SecretString>) -> Result<(), ApiError> {
        self.inner.tokens.set(token)?;
        Ok(())
    }

    /// Invalidate `state` whenever the backend rejects the token.
    ///
    /// Applies to every clone of this client. A later call replaces the
    /// watched state.
    pub fn watch_session(&self, state: &SessionState) {
        let mut slot = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(state.clone());
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// Resolve an endpoint path (`/auth/check`, `products/12`) under the base.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(path.to_owned(), e))
    }

    /// Start a request with the current bearer token attached, if any.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let builder = self.inner.http.request(method, url);
        Ok(match self.inner.tokens.get() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request and map non-success statuses to errors.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            debug!(url = %response.url(), "Backend returned 401, clearing token");
            if let Err(e) = self.inner.tokens.set(None) {
                warn!(error = %e, "Failed to clear token after 401");
            }
            self.reset_session();
            return Err(ApiError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_owned()
        });
        warn!(status = %status, message = %message, "Backend returned error status");
        Err(ApiError::Status { status, message })
    }

    fn reset_session(&self) {
        let slot = self
            .inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(state) = slot.as_ref() {
            state.invalidate();
        }
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(self.request(Method::GET, path)?).await
    }

    /// `GET` a resource that may legitimately be absent: a `404`, an empty
    /// body or a JSON `null` all yield `Ok(None)`.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let response = match self.send(self.request(Method::GET, path)?).await {
            Ok(response) => response,
            Err(ApiError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<Option<T>>(&text)?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, path)?.json(body)).await
    }

    /// `PATCH` a resource, ignoring any response body.
    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PATCH, path)?.json(body)).await?;
        Ok(())
    }

    /// `DELETE` a resource, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base.as_str())
            .field("token", &self.inner.tokens.is_set().then_some("[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Pull a human-readable message out of a backend error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::to_owned)
}
