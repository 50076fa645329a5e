//! PayDunya checkout invoice wire types.

use marchenet_core::UserId;
use serde::{Deserialize, Serialize};

/// Body of `POST checkout-invoice/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutInvoice {
    pub invoice: Invoice,
    pub store: Store,
    pub actions: Actions,
    pub custom_data: CustomData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub total_amount: u64,
    pub description: String,
    pub currency: &'static str,
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    pub name: String,
    pub tagline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub website_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actions {
    pub callback_url: String,
    pub return_url: String,
    pub cancel_url: String,
}

/// Echoed back by PayDunya in the payment confirmation callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomData {
    pub mode: &'static str,
    pub user_id: Option<UserId>,
    pub pack_name: String,
    pub vendor_data: serde_json::Value,
}

/// Provider answer, for both success and failure.
///
/// `response_code == "00"` means success; `response_text` then holds the
/// checkout URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInvoiceResponse {
    #[serde(default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub response_text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl CreateInvoiceResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_code.as_deref() == Some("00")
    }
}
