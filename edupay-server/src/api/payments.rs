//! Payment API handlers.
//!
//! # Endpoints
//!
//! - `POST /payment/create-payment` – create an order and register a
//!   collect request with the gateway

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use edupay_core::services::payments::PaymentError;
use edupay_sdk::objects::create_payment::CreatePaymentRequest;

use crate::state::AppState;

/// Build the Payment API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/create-payment", post(create_payment))
}

/// `POST /payment/create-payment` — create a new payment order.
///
/// Persists the order and its initial `pending` status, registers the
/// collect request with the gateway, and returns the payment and
/// redirect URLs the gateway handed back.
async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let response = state.payments.create_payment(request).await?;
    Ok(Json(response))
}

/// Error wrapper for the creation path.
///
/// Every failure maps to the same shape: HTTP 400 with one message
/// synthesized from the deepest available detail, preferring the
/// gateway's own error text when it reported one.
#[derive(Debug)]
struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self.0, "payment creation failed");
        let body = serde_json::json!({
            "success": false,
            "message": format!("Payment creation failed: {}", self.0.client_message()),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
