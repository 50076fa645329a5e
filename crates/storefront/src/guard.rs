//! Role-based route protection.
//!
//! The guard is evaluated once per navigation against the current
//! [`SessionSnapshot`]. It never fetches anything itself: while the session
//! is loading the answer is [`GuardState::Loading`].

use std::fmt;

use marchenet_core::Session;

use crate::session::{SessionSnapshot, SessionState};

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Authenticated,
    /// Requires a vendor record.
    Vendor,
    Admin,
}

/// Where a refused navigation is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectTarget {
    Login,
    VendorOnboarding,
    Profile,
}

impl RedirectTarget {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/connexion",
            Self::VendorOnboarding => "/devenir-vendeur",
            Self::Profile => "/mon-profil",
        }
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authorized,
    Redirect(RedirectTarget),
}

/// Apply the access rules to a session snapshot.
#[must_use]
pub fn evaluate(snapshot: &SessionSnapshot, access: Access) -> GuardState {
    match snapshot {
        SessionSnapshot::Loading => GuardState::Loading,
        SessionSnapshot::Resolved(session) => evaluate_session(session.as_ref(), access),
    }
}

fn evaluate_session(session: Option<&Session>, access: Access) -> GuardState {
    let Some(session) = session else {
        return match access {
            Access::Public => GuardState::Authorized,
            Access::Authenticated | Access::Vendor | Access::Admin => {
                GuardState::Redirect(RedirectTarget::Login)
            }
        };
    };

    match access {
        Access::Vendor if !session.is_vendor() => {
            GuardState::Redirect(RedirectTarget::VendorOnboarding)
        }
        Access::Admin if !session.role().is_admin() => GuardState::Redirect(RedirectTarget::Profile),
        _ => GuardState::Authorized,
    }
}

// =============================================================================
// RouteTable
// =============================================================================

/// Maps application paths to access levels.
///
/// Patterns are matched segment by segment; a `:name` segment matches any
/// single segment. Paths not in the table are public.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(Vec<Segment>, Access)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

impl RouteTable {
    #[must_use]
    pub const fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a pattern. Later registrations take precedence.
    #[must_use]
    pub fn route(mut self, pattern: &str, access: Access) -> Self {
        let segments = split(pattern)
            .map(|s| {
                if s.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_owned())
                }
            })
            .collect();
        self.routes.push((segments, access));
        self
    }

    /// Access level of `path`. Query strings and fragments are ignored.
    #[must_use]
    pub fn access_for(&self, path: &str) -> Access {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = split(path).collect();

        self.routes
            .iter()
            .rev()
            .find(|(pattern, _)| matches(pattern, &segments))
            .map_or(Access::Public, |(_, access)| *access)
    }
}

impl Default for RouteTable {
    /// The storefront's pages.
    fn default() -> Self {
        Self::empty()
            .route("/devenir-vendeur", Access::Authenticated)
            .route("/mes-favoris", Access::Authenticated)
            .route("/panier", Access::Authenticated)
            .route("/ma-boutique", Access::Authenticated)
            .route("/mon-profil", Access::Authenticated)
            .route("/mes-messages", Access::Authenticated)
            .route("/notifications", Access::Authenticated)
            .route("/ajouter-produit", Access::Vendor)
            .route("/tableau-de-bord", Access::Vendor)
            .route("/gérer-abonnement", Access::Vendor)
            .route("/modifier-produit/:id", Access::Vendor)
            .route("/admin", Access::Admin)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn matches(pattern: &[Segment], segments: &[&str]) -> bool {
    pattern.len() == segments.len()
        && pattern.iter().zip(segments).all(|(p, s)| match p {
            Segment::Param => true,
            Segment::Literal(lit) => lit == s,
        })
}

// =============================================================================
// RouteGuard
// =============================================================================

/// A route table bound to the shared session state.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RouteTable,
    state: SessionState,
}

impl RouteGuard {
    #[must_use]
    pub const fn new(table: RouteTable, state: SessionState) -> Self {
        Self { table, state }
    }

    /// Decide a navigation to `path` with the current session snapshot.
    #[must_use]
    pub fn check(&self, path: &str) -> GuardState {
        let access = self.table.access_for(path);
        let state = evaluate(&self.state.snapshot(), access);
        tracing::debug!(path, ?access, ?state, "Route guard");
        state
    }

    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }
}
