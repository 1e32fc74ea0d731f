use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use crate::api::{ApiError, AppState, InitializeResponse};
use crate::constants::messages;

/// Loads the product feed into an empty store.
///
/// # Endpoint
/// `GET /initialize`
///
/// # Errors
/// - 500 when the feed cannot be fetched.
/// - 409 when the store already holds the feed.
pub async fn initialize(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<InitializeResponse>), ApiError> {
    let report = state.ingest().initialize().await?;

    Ok((
        StatusCode::CREATED,
        Json(InitializeResponse {
            message: messages::INITIALIZED.to_string(),
            inserted: report.inserted,
        }),
    ))
}
