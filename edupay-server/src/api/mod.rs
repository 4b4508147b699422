//! HTTP surface for the payment broker.
//!
//! Handlers here are thin: they extract, delegate to the core
//! services, and map outcomes to status codes. No payment semantics
//! live in this layer.
//!
//! # Endpoints (served under the `/api` prefix)
//!
//! - `POST /api/payment/create-payment`            – create a payment order
//! - `POST /api/webhook`                           – gateway status callback
//! - `GET  /api/transactions`                      – list transactions
//! - `GET  /api/transactions/school/{school_id}`   – list for one school
//! - `GET  /api/transactions/status/{custom_order_id}` – single-order status
//! - `POST /api/seed/dummy-data`                   – seed demo data

pub mod extractors;

mod payments;
mod seed;
mod transactions;
mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/payment", payments::router())
        .nest("/transactions", transactions::router())
        .nest("/seed", seed::router())
        .merge(webhooks::router())
}
