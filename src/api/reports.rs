//! Month-scoped report endpoints backing the dashboard charts.
//!
//! Each route requires `month` and considers sales from that month in every year.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use crate::api::{ApiError, AppState, MonthQuery};
use crate::services::{CategoryBreakdown, PriceHistogram, SalesStatistics};

/// `GET /statistics?month=`
pub async fn statistics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<SalesStatistics>, ApiError> {
    let Query(query) = query?;
    let stats = state
        .transactions()
        .statistics(query.month.as_deref())
        .await?;
    Ok(Json(stats))
}

/// `GET /bar-chart?month=`
pub async fn bar_chart(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<PriceHistogram>, ApiError> {
    let Query(query) = query?;
    let histogram = state
        .transactions()
        .price_histogram(query.month.as_deref())
        .await?;
    Ok(Json(histogram))
}

/// `GET /pie-chart?month=`
pub async fn pie_chart(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<CategoryBreakdown>, ApiError> {
    let Query(query) = query?;
    let breakdown = state
        .transactions()
        .category_breakdown(query.month.as_deref())
        .await?;
    Ok(Json(breakdown))
}
