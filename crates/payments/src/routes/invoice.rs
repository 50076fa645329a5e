//! Invoice creation handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use marchenet_core::{InvoiceRequest, InvoiceResponse};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create a PayDunya checkout invoice and return its URL.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<InvoiceRequest>, JsonRejection>,
) -> Result<Json<InvoiceResponse>> {
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(format!("Requête invalide: {}", e.body_text())))?;

    if request.total_amount == 0 {
        return Err(AppError::BadRequest(
            "Le montant doit être un entier positif".to_string(),
        ));
    }

    info!(
        total_amount = request.total_amount,
        pack_name = %request.pack_name,
        user_id = ?request.user_id,
        "Invoice requested"
    );

    let url = state.paydunya().create_invoice(&request).await?;
    Ok(Json(InvoiceResponse {
        payment_url: url.to_string(),
    }))
}
