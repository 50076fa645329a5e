//! Sign-in commands.
//!
//! # Usage
//!
//! ```bash
//! mn-cli auth login -e awa@example.sn -p '...'
//! mn-cli auth register -e awa@example.sn -p '...' --first-name Awa \
//!     --last-name Diop --phone 771234567 --country SN
//! mn-cli auth whoami
//! mn-cli auth logout
//! ```

use marchenet_core::{Email, PhoneNumber, Session};
use marchenet_storefront::api::Registration;
use marchenet_storefront::SessionResolution;
use secrecy::SecretString;

use super::{CommandError, Context, parse_country};

/// Sign in and keep the token.
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let session = ctx
        .resolver()
        .login(&email, &SecretString::from(password))
        .await?;
    tracing::info!("Signed in as {}", session.email());
    describe(&session);
    Ok(())
}

/// Build a registration form from command-line values.
pub fn registration(
    email: &str,
    password: String,
    first_name: String,
    last_name: String,
    phone: &str,
    country: &str,
) -> Result<Registration, CommandError> {
    let country = parse_country(country)?;
    Ok(Registration {
        email: Email::parse(email)?,
        password: SecretString::from(password),
        first_name,
        last_name,
        phone_number: PhoneNumber::from_local(country, phone)?,
        country,
    })
}

/// Create an account and keep the token.
pub async fn register(ctx: &Context, form: &Registration) -> Result<(), CommandError> {
    let session = ctx.resolver().register(form).await?;
    tracing::info!("Account created for {}", session.email());
    Ok(())
}

/// Sign out. The local token is forgotten even if the backend is unreachable.
pub async fn logout(ctx: &Context) -> Result<(), CommandError> {
    if let Err(e) = ctx.resolver().logout().await {
        tracing::warn!("Backend logout failed: {}", e.user_message());
    }
    tracing::info!("Signed out");
    Ok(())
}

/// Show the current session.
pub async fn whoami(ctx: &Context) -> Result<(), CommandError> {
    match ctx.resolver().resolve().await {
        SessionResolution::Authenticated(session) => {
            describe(&session);
            Ok(())
        }
        SessionResolution::Anonymous => {
            tracing::info!("Not signed in");
            Ok(())
        }
        SessionResolution::Unreachable(e) => Err(e.into()),
    }
}

fn describe(session: &Session) {
    tracing::info!("User:   {} ({})", session.email(), session.user_id());
    tracing::info!("Role:   {}", session.role());
    match &session.vendor {
        Some(vendor) => tracing::info!(
            "Store:  {} [{}]",
            vendor.shop_name,
            if vendor.is_store_active { "active" } else { "inactive" }
        ),
        None => tracing::info!("Store:  none"),
    }
}
