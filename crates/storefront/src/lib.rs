//! MarchéNet storefront library.
//!
//! Everything the storefront needs to talk to the marketplace backend:
//!
//! - [`token`]: where the bearer token lives between runs
//! - [`api`]: the authenticated REST client
//! - [`session`]: resolving who the current user is, and the shared snapshot
//! - [`guard`]: role-based route protection
//! - [`onboarding`]: the become-a-vendor flow, ending in a payment redirect
//! - [`payments`]: client for the invoice proxy
//! - [`subscription`], [`products`], [`search`]: store management

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod guard;
pub mod onboarding;
pub mod payments;
pub mod products;
pub mod search;
pub mod session;
pub mod subscription;
pub mod token;

pub use api::{ApiClient, ApiError};
pub use config::{ConfigError, StorefrontConfig};
pub use guard::{Access, GuardState, RedirectTarget, RouteGuard, RouteTable};
pub use onboarding::{OnboardingError, OnboardingStart, OnboardingStep, VendorForm, VendorOnboarding};
pub use payments::{PaymentClient, PaymentError};
pub use session::{SessionResolution, SessionResolver, SessionSnapshot, SessionState};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
