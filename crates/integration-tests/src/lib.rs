//! Integration tests for MarchéNet.
//!
//! Each test gets a [`TestContext`]: a mocked marketplace backend, a mocked
//! PayDunya API, and the real payment proxy served on an ephemeral port in
//! between. Nothing outside the machine is contacted.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marchenet-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use marchenet_payments::config::{PaydunyaConfig, PaydunyaKeys};
use marchenet_payments::{AppState, PaymentsConfig};
use marchenet_storefront::{
    ApiClient, MemoryTokenStore, PaymentClient, SessionResolver, StorefrontConfig, TokenStore,
};
use secrecy::SecretString;
use url::Url;
use wiremock::MockServer;

/// Public origin the proxy derives its callback URLs from.
pub const PUBLIC_ORIGIN: &str = "https://boutique.marchenet.test";

/// A mocked backend and PayDunya with the real proxy in between.
pub struct TestContext {
    pub backend: MockServer,
    pub paydunya: MockServer,
    pub proxy_url: Url,
    pub tokens: Arc<MemoryTokenStore>,
    pub api: ApiClient,
    pub payments: PaymentClient,
}

impl TestContext {
    /// Fresh context with an empty token store.
    pub async fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new()).await
    }

    /// Fresh context with `token` already stored.
    pub async fn signed_in(token: &str) -> Self {
        Self::with_tokens(MemoryTokenStore::with_token(token)).await
    }

    async fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let backend = MockServer::start().await;
        let paydunya = MockServer::start().await;
        let proxy_url = spawn_proxy(&paydunya, PUBLIC_ORIGIN).await;

        let mut config = StorefrontConfig::new(&Url::parse(&backend.uri()).unwrap()).unwrap();
        config.payment_proxy_url = proxy_url.join("payments/invoice").unwrap();

        let tokens = Arc::new(tokens);
        let store: Arc<dyn TokenStore> = tokens.clone();
        let api = ApiClient::new(&config, store).unwrap();
        let payments = PaymentClient::new(&config).unwrap();

        Self {
            backend,
            paydunya,
            proxy_url,
            tokens,
            api,
            payments,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> SessionResolver {
        SessionResolver::new(self.api.clone())
    }
}

/// PayDunya keys that pass the proxy's secret validation.
#[must_use]
pub fn paydunya_keys() -> PaydunyaKeys {
    PaydunyaKeys {
        master_key: SecretString::from("wQzk9ZwR-Qq9m-0hD0-zpud-je5coGC3FHKW"),
        public_key: SecretString::from("test_public_kb9Wo0Qpn8vNzOXQ4fj7RkLz0YS"),
        private_key: SecretString::from("test_private_rMIdJM3PLLhLjyArx9tF3VURAF5"),
        token: SecretString::from("IivOiOxGJuWhc5znlIiK"),
    }
}

/// Serve the payment proxy on an ephemeral port, talking to `paydunya`.
///
/// Returns the proxy's base URL (ending with `/`).
pub async fn spawn_proxy(paydunya: &MockServer, public_origin: &str) -> Url {
    let mut paydunya_config = PaydunyaConfig::new(paydunya_keys()).unwrap();
    paydunya_config.api_url = Url::parse(&format!("{}/api/v1/", paydunya.uri())).unwrap();
    let config = PaymentsConfig::new(Url::parse(public_origin).unwrap(), paydunya_config);

    let app = marchenet_payments::app(AppState::new(config).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// A `/auth/check` style user object.
#[must_use]
pub fn user_json(id: u64, email: &str) -> serde_json::Value {
    serde_json::json!({ "id": id, "email": email, "role": "user" })
}
