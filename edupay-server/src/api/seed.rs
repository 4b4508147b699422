//! Seed API handler for demo data.
//!
//! # Endpoints
//!
//! - `POST /seed/dummy-data` – insert demo orders into an empty store

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use edupay_core::store::StoreError;

use crate::state::AppState;

/// Build the Seed API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dummy-data", post(seed_dummy_data))
}

/// `POST /seed/dummy-data` — seed demo transactions.
///
/// Inserts the fixtures only when the store holds no orders at all;
/// the response message says which of the two cases applied.
async fn seed_dummy_data(State(state): State<AppState>) -> Result<impl IntoResponse, SeedApiError> {
    let outcome = state.seeder.seed().await.map_err(SeedApiError::Store)?;
    Ok(Json(serde_json::json!({ "message": outcome.message() })))
}

/// Errors that can occur in Seed API handlers.
#[derive(Debug)]
enum SeedApiError {
    Store(StoreError),
}

impl IntoResponse for SeedApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SeedApiError::Store(e) => {
                tracing::error!(error = %e, "Seed API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
