//! Wire types of the payment invoice proxy.
//!
//! The storefront sends an [`InvoiceRequest`]; the proxy answers with an
//! [`InvoiceResponse`] on success or an [`InvoiceFailure`] otherwise.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Body of the invoice creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Amount in CFA francs. Must be positive.
    pub total_amount: u64,
    pub description: String,
    /// Name of the pack being paid for, used as the invoice line item.
    pub pack_name: String,
    /// Opaque vendor details echoed back to the backend through the
    /// provider's callback. `shop_name` is used in the line item description.
    #[serde(default)]
    pub vendor_data: serde_json::Value,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Successful invoice creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub payment_url: String,
}

/// Failed invoice creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFailure {
    pub error: String,
}
