//! Authenticated identities and resolved sessions.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;
use super::role::Role;
use super::vendor::VendorProfile;

/// The user object returned by `/auth/check`, `/auth/login` and
/// `/auth/register`.
///
/// Fields this crate does not model are kept in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Identity and role information derived from a bearer token at a point in
/// time.
///
/// Held in memory only; the bearer token is the only persisted piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: AuthUser,
    /// The vendor record found for this identity, active or not.
    pub vendor: Option<VendorProfile>,
}

impl Session {
    #[must_use]
    pub const fn new(user: AuthUser, vendor: Option<VendorProfile>) -> Self {
        Self { user, vendor }
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user.id
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.user.email
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.user.role
    }

    /// The vendor flag: whether a vendor record exists for this identity.
    #[must_use]
    pub const fn is_vendor(&self) -> bool {
        self.vendor.is_some()
    }

    #[must_use]
    pub fn has_active_store(&self) -> bool {
        self.vendor.as_ref().is_some_and(|v| v.is_store_active)
    }
}
