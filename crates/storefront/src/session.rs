//! Session resolution and the in-memory session holder.
//!
//! # Resolution order
//!
//! 1. `GET /auth/check` with the stored bearer token
//! 2. only if step 1 reported a user, `GET /vendors/me` with the same token
//!
//! The two calls are sequential and never retried here. The vendor lookup
//! relies on the bearer identity of step 1, so issuing it earlier would leak
//! a request for a possibly invalid token.

use std::sync::{Arc, PoisonError, RwLock};

use marchenet_core::{Email, Session};
use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, ApiError, Registration};

/// Outcome of a session check, before collapsing failures.
#[derive(Debug)]
pub enum SessionResolution {
    Authenticated(Session),
    /// No token, an expired token, or the backend reports no user.
    Anonymous,
    /// The backend could not be reached or answered with an error.
    Unreachable(ApiError),
}

impl SessionResolution {
    /// Collapse to the session, treating every failure as "no session".
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous | Self::Unreachable(_) => None,
        }
    }
}

// =============================================================================
// SessionResolver
// =============================================================================

/// Derives a [`Session`] from the bearer token held by the API client.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    api: ApiClient,
}

impl SessionResolver {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Check the stored token and look up the vendor record.
    ///
    /// A missing vendor record (404 or `null`) is not a failure: the session
    /// is returned with no vendor. Any other vendor lookup failure makes the
    /// whole resolution fail.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> SessionResolution {
        let user = match self.api.auth_check().await {
            Ok(Some(user)) => user,
            Ok(None) | Err(ApiError::Unauthorized) => {
                debug!("No authenticated user");
                return SessionResolution::Anonymous;
            }
            Err(e) => {
                warn!(error = %e, "Session check failed");
                return SessionResolution::Unreachable(e);
            }
        };

        match self.api.my_vendor().await {
            Ok(vendor) => {
                debug!(user_id = %user.id, is_vendor = vendor.is_some(), "Session resolved");
                SessionResolution::Authenticated(Session::new(user, vendor))
            }
            Err(ApiError::Unauthorized) => SessionResolution::Anonymous,
            Err(e) => {
                warn!(error = %e, "Vendor lookup failed");
                SessionResolution::Unreachable(e)
            }
        }
    }

    /// [`resolve`](Self::resolve), collapsed to an optional session.
    pub async fn resolve_session(&self) -> Option<Session> {
        self.resolve().await.into_session()
    }

    /// Log in, store the token, then resolve the vendor record.
    ///
    /// # Errors
    ///
    /// Returns the first failing backend call. The token stays stored if only
    /// the vendor lookup failed.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<Session, ApiError> {
        let response = self.api.login(email, password).await?;
        self.api.set_token(Some(response.token))?;

        let user = match response.user {
            Some(user) => user,
            None => self.api.auth_check().await?.ok_or(ApiError::Unauthorized)?,
        };
        let vendor = self.api.my_vendor().await?;

        info!(user_id = %user.id, is_vendor = vendor.is_some(), "Logged in");
        Ok(Session::new(user, vendor))
    }

    /// Create an account and store its token. New accounts have no vendor
    /// record, so no vendor lookup is made.
    ///
    /// # Errors
    ///
    /// Returns the backend error if registration fails.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &Registration) -> Result<Session, ApiError> {
        let response = self.api.register(form).await?;
        self.api.set_token(Some(response.token))?;

        let user = match response.user {
            Some(user) => user,
            None => self.api.auth_check().await?.ok_or(ApiError::Unauthorized)?,
        };

        info!(user_id = %user.id, "Registered");
        Ok(Session::new(user, None))
    }

    /// Log out. The token is cleared even if the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Token` only if the token could not be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Backend logout failed, clearing token anyway");
        }
        self.api.set_token(None)?;
        info!("Logged out");
        Ok(())
    }
}

// =============================================================================
// SessionState
// =============================================================================

/// What the rest of the application sees of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionSnapshot {
    /// A check is in flight; nothing is known yet.
    #[default]
    Loading,
    Resolved(Option<Session>),
}

impl SessionSnapshot {
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Resolved(Some(session)) => Some(session),
            Self::Loading | Self::Resolved(None) => None,
        }
    }
}

/// Handle identifying one session check. Only the most recent ticket can
/// complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTicket(u64);

/// Shared, cloneable holder of the current session.
///
/// Every state change bumps a generation counter; a check started before
/// the latest change completes with a stale ticket and its result is
/// dropped. After [`teardown`](Self::teardown) no result is accepted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<StateInner>>,
}

#[derive(Debug, Default)]
struct StateInner {
    generation: u64,
    snapshot: SessionSnapshot,
    torn_down: bool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(|inner| inner.snapshot.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read(|inner| matches!(inner.snapshot, SessionSnapshot::Loading))
    }

    /// Start a check: the snapshot goes back to `Loading`.
    #[must_use]
    pub fn begin_check(&self) -> CheckTicket {
        self.write(|inner| {
            inner.generation += 1;
            inner.snapshot = SessionSnapshot::Loading;
            CheckTicket(inner.generation)
        })
    }

    /// Publish the result of a check. Returns `false` (and changes nothing)
    /// if the ticket is stale or the state was torn down.
    pub fn complete(&self, ticket: CheckTicket, session: Option<Session>) -> bool {
        self.write(|inner| {
            if inner.torn_down || ticket.0 != inner.generation {
                debug!(ticket = ticket.0, current = inner.generation, "Discarding stale session result");
                return false;
            }
            inner.snapshot = SessionSnapshot::Resolved(session);
            true
        })
    }

    /// Replace the session directly (after login or registration),
    /// invalidating any check in flight.
    pub fn set(&self, session: Option<Session>) {
        self.write(|inner| {
            if inner.torn_down {
                return;
            }
            inner.generation += 1;
            inner.snapshot = SessionSnapshot::Resolved(session);
        });
    }

    /// Drop the session after logout or an `Unauthorized` error.
    pub fn invalidate(&self) {
        self.set(None);
    }

    /// Stop accepting results. Checks still in flight are discarded.
    pub fn teardown(&self) {
        self.write(|inner| {
            inner.generation += 1;
            inner.torn_down = true;
        });
    }

    /// Run a full check through `resolver` and publish it.
    ///
    /// Returns the snapshot after the check, which is the check's own result
    /// unless a newer change won.
    pub async fn refresh(&self, resolver: &SessionResolver) -> SessionSnapshot {
        let ticket = self.begin_check();
        let session = resolver.resolve_session().await;
        self.complete(ticket, session);
        self.snapshot()
    }

    fn read<T>(&self, f: impl FnOnce(&StateInner) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut StateInner) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
