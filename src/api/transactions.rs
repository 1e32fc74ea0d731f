//! Listing endpoint for stored transactions.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::services::{ListTransactionsRequest, TransactionListing};

/// Lists transactions, optionally filtered by month and search text.
///
/// # Endpoint
/// `GET /transactions`
///
/// # Query Parameters
/// - `month`: full month name, any year (optional)
/// - `search`: matched against title, description and price (optional)
/// - `page`: 1-based page number (default: 1)
/// - `per_page`: page size (default: 10)
///
/// # Errors
/// Returns 400 for an unknown month or malformed paging values.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListTransactionsRequest>, QueryRejection>,
) -> Result<Json<TransactionListing>, ApiError> {
    let Query(request) = query?;
    let listing = state.transactions().list_transactions(request).await?;
    Ok(Json(listing))
}
