//! PayDunya checkout invoice client.
//!
//! Every call carries the four `PAYDUNYA-*` header credentials. Invoice
//! creation is not idempotent: the client never retries.

pub mod types;

use std::sync::Arc;

use marchenet_core::InvoiceRequest;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::{PaymentsConfig, PaydunyaConfig, StoreInfo};
use types::{
    Actions, CheckoutInvoice, CreateInvoiceResponse, CustomData, Invoice, InvoiceItem, Store,
};

const CURRENCY: &str = "XOF";
const CREATE_INVOICE_PATH: &str = "checkout-invoice/create";
const GENERIC_FAILURE: &str = "Échec de la création de la facture";

/// Errors from the PayDunya API.
#[derive(Debug, Error)]
pub enum PaydunyaError {
    /// Network or TLS failure before an answer was received.
    #[error("PayDunya unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// PayDunya answered with a non-success code.
    #[error("{message}")]
    Rejected {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    /// Declared success without a usable checkout URL or token.
    #[error("Malformed PayDunya response: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PaydunyaError {
    /// Message safe to return to the storefront.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(_) => "Le service de paiement est injoignable".to_string(),
            Self::Malformed(_) | Self::InvalidUrl(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

// =============================================================================
// PaydunyaClient
// =============================================================================

/// Client for the PayDunya checkout invoice API.
#[derive(Clone)]
pub struct PaydunyaClient {
    inner: Arc<PaydunyaClientInner>,
}

struct PaydunyaClientInner {
    client: reqwest::Client,
    endpoint: Url,
    config: PaydunyaConfig,
    store: StoreInfo,
    website_url: Url,
    return_url: Url,
    cancel_url: Url,
}

impl std::fmt::Debug for PaydunyaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaydunyaClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("mode", &self.inner.config.mode)
            .finish_non_exhaustive()
    }
}

impl PaydunyaClient {
    /// Create a client from the proxy configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built or the HTTP
    /// client fails to initialize.
    pub fn new(config: &PaymentsConfig) -> Result<Self, PaydunyaError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let endpoint = config.paydunya.api_url.join(CREATE_INVOICE_PATH)?;

        Ok(Self {
            inner: Arc::new(PaydunyaClientInner {
                client,
                endpoint,
                config: config.paydunya.clone(),
                store: config.store.clone(),
                website_url: config.page("/"),
                return_url: config.page("/mon-profil"),
                cancel_url: config.page("/devenir-vendeur"),
            }),
        })
    }

    /// Build the provider invoice for a storefront request.
    #[must_use]
    pub fn build_invoice(&self, request: &InvoiceRequest) -> CheckoutInvoice {
        let item_description = request
            .vendor_data
            .get("shop_name")
            .and_then(serde_json::Value::as_str)
            .map_or_else(
                || request.pack_name.clone(),
                |shop| format!("{} pour {shop}", request.pack_name),
            );

        CheckoutInvoice {
            invoice: Invoice {
                total_amount: request.total_amount,
                description: request.description.clone(),
                currency: CURRENCY,
                items: vec![InvoiceItem {
                    name: request.pack_name.clone(),
                    quantity: 1,
                    unit_price: request.total_amount,
                    description: item_description,
                }],
            },
            store: Store {
                name: self.inner.store.name.clone(),
                tagline: self.inner.store.tagline.clone(),
                phone: self.inner.store.phone.clone(),
                website_url: self.inner.website_url.to_string(),
            },
            actions: Actions {
                callback_url: self.inner.return_url.to_string(),
                return_url: self.inner.return_url.to_string(),
                cancel_url: self.inner.cancel_url.to_string(),
            },
            custom_data: CustomData {
                mode: self.inner.config.mode.as_str(),
                user_id: request.user_id.clone(),
                pack_name: request.pack_name.clone(),
                vendor_data: request.vendor_data.clone(),
            },
        }
    }

    /// Create a checkout invoice and return the URL to send the buyer to.
    ///
    /// # Errors
    ///
    /// Returns `PaydunyaError` on transport failure, a non-`"00"` response
    /// code, or a success response without URL or token.
    #[instrument(skip(self, request), fields(amount = request.total_amount, pack = %request.pack_name))]
    pub async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Url, PaydunyaError> {
        let keys = &self.inner.config.keys;
        let body = self.build_invoice(request);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("PAYDUNYA-MASTER-KEY", keys.master_key.expose_secret())
            .header("PAYDUNYA-PUBLIC-KEY", keys.public_key.expose_secret())
            .header("PAYDUNYA-PRIVATE-KEY", keys.private_key.expose_secret())
            .header("PAYDUNYA-TOKEN", keys.token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let parsed = serde_json::from_str::<CreateInvoiceResponse>(&text);

        let answer = match parsed {
            Ok(answer) if answer.is_success() => answer,
            Ok(answer) => {
                let message = answer
                    .response_text
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                warn!(%status, code = ?answer.response_code, %message, "PayDunya rejected invoice");
                return Err(PaydunyaError::Rejected {
                    status,
                    code: answer.response_code,
                    message,
                });
            }
            Err(_) if !status.is_success() => {
                warn!(%status, "PayDunya returned an unreadable error");
                return Err(PaydunyaError::Rejected {
                    status,
                    code: None,
                    message: GENERIC_FAILURE.to_string(),
                });
            }
            Err(e) => return Err(PaydunyaError::Malformed(e.to_string())),
        };

        let url = self.checkout_url(&answer)?;
        info!(%url, token = ?answer.token, "Invoice created");
        Ok(url)
    }

    /// Checkout URL of a successful answer: `response_text`, else the
    /// checkout page for `token`.
    fn checkout_url(&self, answer: &CreateInvoiceResponse) -> Result<Url, PaydunyaError> {
        if let Some(text) = answer.response_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return Url::parse(text.trim())
                .map_err(|_| PaydunyaError::Malformed(format!("response_text is not a URL: {text}")));
        }
        match answer.token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => Ok(self.inner.config.checkout_url.join(token.trim())?),
            None => Err(PaydunyaError::Malformed(
                "success without checkout URL or token".to_string(),
            )),
        }
    }
}
