//! `/auth/*` endpoints.

use marchenet_core::{AuthUser, Country, Email, PhoneNumber};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Body of `GET /auth/check`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCheck {
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Body of a successful login or registration.
///
/// Some backend versions only return the token on registration, so `user`
/// is optional.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(deserialize_with = "secret_string")]
    pub token: SecretString,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Account registration form.
pub struct Registration {
    pub email: Email,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
    pub country: Country,
}

fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegistrationBody<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    phone_number: &'a str,
    country: &'a str,
}

impl ApiClient {
    /// Ask the backend who the current bearer token belongs to.
    ///
    /// Returns `Ok(None)` when the backend reports no user.
    #[instrument(skip(self))]
    pub async fn auth_check(&self) -> Result<Option<AuthUser>, ApiError> {
        let check: AuthCheck = self.get("/auth/check").await?;
        Ok(check.user)
    }

    /// Exchange credentials for a token. The token is not stored.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.post("/auth/login", &body).await
    }

    /// Create an account. The returned token is not stored.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &Registration) -> Result<AuthResponse, ApiError> {
        let body = RegistrationBody {
            email: form.email.as_str(),
            password: form.password.expose_secret(),
            first_name: form.first_name.trim(),
            last_name: form.last_name.trim(),
            phone_number: form.phone_number.as_str(),
            country: form.country.name(),
        };
        self.post("/auth/register", &body).await
    }

    /// Tell the backend to end the session. Does not touch the token store.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/auth/logout")?).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::tests::client_for;
    use crate::token::{MemoryTokenStore, TokenStore};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "awa@exemple.sn",
                "password": "mot-de-passe"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "jwt-123",
                "user": { "id": "u-1", "email": "awa@exemple.sn", "role": "user" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let api = client_for(&server, Arc::clone(&tokens));
        let response = api
            .login(
                &Email::parse("awa@exemple.sn").unwrap(),
                &SecretString::from("mot-de-passe"),
            )
            .await
            .unwrap();

        assert_eq!(response.token.expose_secret(), "jwt-123");
        assert_eq!(response.user.unwrap().id.as_str(), "u-1");
        assert!(tokens.get().is_none());
    }

    #[tokio::test]
    async fn test_register_sends_full_phone_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(serde_json::json!({
                "email": "moussa@exemple.ml",
                "password": "secret",
                "first_name": "Moussa",
                "last_name": "Traoré",
                "phone_number": "+22376123456",
                "country": "Mali"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "token": "jwt-new" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::new()));
        let form = Registration {
            email: Email::parse("moussa@exemple.ml").unwrap(),
            password: SecretString::from("secret"),
            first_name: " Moussa ".to_owned(),
            last_name: "Traoré".to_owned(),
            phone_number: PhoneNumber::from_local(Country::Mali, "76 12 34 56").unwrap(),
            country: Country::Mali,
        };

        let response = api.register(&form).await.unwrap();
        assert!(response.user.is_none());
        assert!(!format!("{response:?}").contains("jwt-new"));
    }

    #[tokio::test]
    async fn test_auth_check_without_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "user": null })))
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::new()));
        assert!(api.auth_check().await.unwrap().is_none());
    }
}
