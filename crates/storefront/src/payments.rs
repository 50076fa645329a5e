//! Client for the payment invoice proxy.
//!
//! The proxy holds the provider credentials; the storefront only knows its
//! URL. Invoices are not idempotent, so this client never retries.

use std::sync::Arc;

use marchenet_core::{InvoiceFailure, InvoiceRequest, InvoiceResponse, Pack, UserId};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::StorefrontConfig;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy answered with an error body.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Payment service returned an invalid checkout URL: {0}")]
    InvalidUrl(String),

    #[error("Invoice amount must be positive")]
    InvalidAmount,

    #[error("Vendor details could not be encoded: {0}")]
    VendorData(serde_json::Error),
}

/// Encode the vendor details carried through the provider's callback.
///
/// # Errors
///
/// Returns `PaymentError::VendorData` if `details` is not representable as
/// JSON (for instance a map with non-string keys).
pub fn vendor_data<T>(details: &T) -> Result<serde_json::Value, PaymentError>
where
    T: serde::Serialize + ?Sized,
{
    serde_json::to_value(details).map_err(PaymentError::VendorData)
}

/// Build the invoice for one period of `pack`.
///
/// # Errors
///
/// Returns `PaymentError::InvalidAmount` for the free pack.
pub fn pack_invoice(
    pack: &Pack,
    shop_name: &str,
    vendor_data: serde_json::Value,
    user_id: Option<UserId>,
) -> Result<InvoiceRequest, PaymentError> {
    let total_amount = pack
        .price()
        .whole_units()
        .map_err(|_| PaymentError::InvalidAmount)?;
    Ok(InvoiceRequest {
        total_amount,
        description: format!("Paiement pour le {} - {shop_name}", pack.name),
        pack_name: pack.name.to_owned(),
        vendor_data,
        user_id,
    })
}

/// Client for `POST /payments/invoice` on the proxy.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentClientInner>,
}

#[derive(Debug)]
struct PaymentClientInner {
    http: reqwest::Client,
    endpoint: Url,
}

impl PaymentClient {
    /// # Errors
    ///
    /// Returns `PaymentError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            inner: Arc::new(PaymentClientInner {
                http,
                endpoint: config.payment_proxy_url.clone(),
            }),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Create an invoice and return the checkout URL to redirect to.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` on transport failure, on any proxy error
    /// response, or if the returned URL does not parse.
    #[instrument(skip(self, request), fields(amount = request.total_amount, pack = %request.pack_name))]
    pub async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Url, PaymentError> {
        if request.total_amount == 0 {
            return Err(PaymentError::InvalidAmount);
        }

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<InvoiceFailure>(&text)
                .map(|f| f.error)
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Erreur lors de la création de la facture".to_owned());
            warn!(status = %status, message = %message, "Invoice creation failed");
            return Err(PaymentError::Rejected { status, message });
        }

        let body: InvoiceResponse = serde_json::from_str(&text)
            .map_err(|_| PaymentError::InvalidUrl(text.chars().take(200).collect()))?;
        let url = Url::parse(&body.payment_url)
            .map_err(|_| PaymentError::InvalidUrl(body.payment_url.clone()))?;

        info!(url = %url, "Invoice created");
        Ok(url)
    }
}
