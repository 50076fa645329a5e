//! `/favorites/*` endpoints.

use marchenet_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError, Product};

/// Result of `POST /favorites/toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FavoriteToggle {
    #[serde(default, rename = "isFavorite")]
    pub is_favorite: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleBody<'a> {
    product_id: &'a ProductId,
}

impl ApiClient {
    /// Products the current user marked as favorite.
    #[instrument(skip(self))]
    pub async fn favorites(&self) -> Result<Vec<Product>, ApiError> {
        let products: Option<Vec<Product>> = self.get("/favorites").await?;
        Ok(products.unwrap_or_default())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn toggle_favorite(&self, product_id: &ProductId) -> Result<FavoriteToggle, ApiError> {
        self.post("/favorites/toggle", &ToggleBody { product_id })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::tests::client_for;
    use crate::token::MemoryTokenStore;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_toggle_favorite() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/favorites/toggle"))
            .and(body_json(serde_json::json!({ "productId": "8" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "isFavorite": false })),
            )
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::with_token("jwt")));
        assert!(!api.toggle_favorite(&ProductId::new("8")).await.unwrap().is_favorite);
    }

    #[tokio::test]
    async fn test_favorites_null_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::with_token("jwt")));
        assert!(api.favorites().await.unwrap().is_empty());
    }
}
