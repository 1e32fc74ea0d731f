use axum::{Router, http::HeaderValue, middleware, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::TransactionSource;
use crate::config::Config;
use crate::state::SharedState;

mod assets;
mod error;
mod initialize;
mod observability;
mod reports;
mod system;
mod transactions;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn transactions(&self) -> &Arc<dyn crate::services::TransactionService> {
        &self.shared.transactions
    }

    #[must_use]
    pub fn ingest(&self) -> &Arc<crate::services::IngestService> {
        &self.shared.ingest
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Builds state around a caller-supplied product feed, e.g. fixed test data.
pub async fn create_app_state_with_source(
    config: Config,
    source: Arc<dyn TransactionSource>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_source(config, source).await?);
    Ok(create_app_state(shared, None))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config().server.cors_allowed_origins;

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/initialize", get(initialize::initialize))
        .route("/index", get(assets::index_page))
        .route("/static/{*path}", get(assets::serve_asset))
        .route("/transactions", get(transactions::list_transactions))
        .route("/statistics", get(reports::statistics))
        .route("/bar-chart", get(reports::bar_chart))
        .route("/pie-chart", get(reports::pie_chart))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(observability::track_requests))
        .fallback(system::not_found)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers))
}
