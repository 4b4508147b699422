//! Webhook API handler for gateway payment callbacks.
//!
//! # Endpoints
//!
//! - `POST /webhook` – apply a gateway status callback

use axum::{Json, Router, extract::State, routing::post};
use edupay_sdk::objects::webhook::{WebhookAck, WebhookPayload};

use crate::state::AppState;

/// Build the Webhook API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(handle_webhook))
}

/// `POST /webhook` — apply a payment status callback.
///
/// Always answers 200 with the outcome in the body so the gateway has
/// no transport error to retry on; failures are visible to operators
/// in the webhook log, not on the wire.
async fn handle_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<WebhookAck> {
    Json(state.webhooks.handle(payload).await)
}
