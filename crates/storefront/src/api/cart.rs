//! `/cart/*` endpoints.

use marchenet_core::{CartItemId, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError, Product};

/// A line of the current user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartEntry {
    pub id: CartItemId,
    #[serde(default, alias = "productId")]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub product: Option<Product>,
}

/// Result of `POST /cart/toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CartToggle {
    /// Whether the product is in the cart after the toggle.
    #[serde(default, rename = "isInCart")]
    pub in_cart: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleBody<'a> {
    product_id: &'a ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct QuantityBody {
    quantity: u32,
}

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Vec<CartEntry>, ApiError> {
        let entries: Option<Vec<CartEntry>> = self.get("/cart").await?;
        Ok(entries.unwrap_or_default())
    }

    /// Add the product to the cart, or remove it if it is already there.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn toggle_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartToggle, ApiError> {
        self.post("/cart/toggle", &ToggleBody {
            product_id,
            quantity,
        })
        .await
    }

    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn update_cart_item(
        &self,
        id: &CartItemId,
        quantity: u32,
    ) -> Result<CartEntry, ApiError> {
        self.put(&format!("/cart/{id}"), &QuantityBody { quantity })
            .await
    }

    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn remove_cart_item(&self, id: &CartItemId) -> Result<(), ApiError> {
        self.delete(&format!("/cart/{id}")).await
    }
}
