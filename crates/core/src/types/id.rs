//! Newtype IDs for type-safe entity references.
//!
//! The backend hands out identifiers in more than one shape (auth IDs are
//! UUID strings, product and cart rows use integers), so every ID is stored
//! as an opaque string and accepts either a JSON string or a JSON integer.

use serde::Deserialize;

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain JSON string
/// - `Deserialize` from a JSON string or integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
///
/// # Example
///
/// ```rust
/// # use marchenet_core::define_id;
/// define_id!(ShopId);
/// define_id!(OrderId);
///
/// let shop = ShopId::new("42");
/// let order = OrderId::new("42");
///
/// // These are different types, so this won't compile:
/// // let _: ShopId = order;
/// # let _ = (shop, order);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                <$crate::types::id::OpaqueId as ::serde::Deserialize>::deserialize(deserializer)
                    .map(|raw| Self(raw.into_string()))
            }
        }
    };
}

/// Wire representation accepted for any opaque ID.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum OpaqueId {
    Text(String),
    Integer(i64),
}

impl OpaqueId {
    #[doc(hidden)]
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
        }
    }
}

define_id!(UserId);
define_id!(VendorId);
define_id!(ProductId);
define_id!(CartItemId);
define_id!(NotificationId);
define_id!(MessageId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let id: UserId = serde_json::from_str("\"6f1c2a9e-auth\"").unwrap();
        assert_eq!(id.as_str(), "6f1c2a9e-auth");
    }

    #[test]
    fn test_deserialize_from_integer() {
        let id: ProductId = serde_json::from_str("128").unwrap();
        assert_eq!(id, ProductId::new("128"));
    }

    #[test]
    fn test_serializes_as_string() {
        let id = CartItemId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_rejects_other_json() {
        assert!(serde_json::from_str::<VendorId>("true").is_err());
        assert!(serde_json::from_str::<VendorId>("{}").is_err());
    }
}
