//! User roles.

use serde::{Deserialize, Serialize};

/// Role carried by an authenticated user.
///
/// Unknown role strings coming from the backend deserialize as
/// [`Role::User`], the least privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A shopper who also operates a store. Only meaningful together with a
    /// vendor record.
    Vendor,
    /// A moderator with access to the admin dashboard.
    Admin,
    /// A shopper. Catches unknown role strings, so it must stay last.
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Vendor => write!(f, "vendor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "vendor" => Ok(Self::Vendor),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
