//! Transaction API handlers.
//!
//! # Endpoints
//!
//! - `GET /transactions`                          – list transactions (paginated, filterable)
//! - `GET /transactions/school/{school_id}`       – list transactions for one school
//! - `GET /transactions/status/{custom_order_id}` – status detail for one order

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use edupay_core::services::transactions::TransactionError;
use edupay_core::store::StoreError;

use crate::api::extractors::ListParams;
use crate::state::AppState;

/// Build the Transaction API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions))
        .route("/school/{school_id}", get(list_by_school))
        .route("/status/{custom_order_id}", get(transaction_status))
}

/// `GET /transactions` — list all transactions.
async fn list_transactions(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<impl IntoResponse, TransactionApiError> {
    let page = state.transactions.list(query).await?;
    Ok(Json(page))
}

/// `GET /transactions/school/{school_id}` — list transactions for one school.
async fn list_by_school(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
    ListParams(query): ListParams,
) -> Result<impl IntoResponse, TransactionApiError> {
    let page = state.transactions.list_by_school(&school_id, query).await?;
    Ok(Json(page))
}

/// `GET /transactions/status/{custom_order_id}` — status detail for one order.
///
/// Unlike the listings, a miss here is an error: an order id that
/// resolves to nothing returns 404, while a listing with no matches
/// returns an empty page.
async fn transaction_status(
    State(state): State<AppState>,
    Path(custom_order_id): Path<String>,
) -> Result<impl IntoResponse, TransactionApiError> {
    let view = state.transactions.status(&custom_order_id).await?;
    Ok(Json(view))
}

/// Errors that can occur in Transaction API handlers.
#[derive(Debug)]
enum TransactionApiError {
    /// A store query failed.
    Store(StoreError),
    /// The requested order was not found.
    NotFound,
}

impl From<TransactionError> for TransactionApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound => Self::NotFound,
            TransactionError::Store(e) => Self::Store(e),
        }
    }
}

impl IntoResponse for TransactionApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            TransactionApiError::Store(e) => {
                tracing::error!(error = %e, "Transaction API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            TransactionApiError::NotFound => {
                (StatusCode::NOT_FOUND, "Transaction not found").into_response()
            }
        }
    }
}
