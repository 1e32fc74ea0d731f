use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;
use crate::constants::messages;
use crate::services::{IngestError, TransactionError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    MissingParameter(String),

    InvalidMonth(String),

    ValidationError(String),

    FetchError(String),

    ExternalApiError { service: String, message: String },

    Conflict(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            ApiError::InvalidMonth(raw) => write!(f, "Invalid month: {}", raw),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::FetchError(msg) => write!(f, "Fetch error: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::MissingParameter(name) if name == "month" => (
                StatusCode::BAD_REQUEST,
                messages::MONTH_REQUIRED.to_string(),
            ),
            ApiError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                format!("Parameter '{}' is required", name),
            ),
            ApiError::InvalidMonth(raw) => {
                tracing::debug!("Rejected month parameter: {:?}", raw);
                (
                    StatusCode::BAD_REQUEST,
                    messages::INVALID_MONTH.to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::FetchError(msg) => {
                tracing::error!("Fetch error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::FETCH_FAILED.to_string(),
                )
            }
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{} service is unavailable", service),
                )
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(error_message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::MissingMonth => Self::MissingParameter("month".to_string()),
            TransactionError::InvalidMonth(raw) => Self::InvalidMonth(raw),
            TransactionError::Validation(msg) => Self::validation(msg),
            TransactionError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Fetch(msg) => Self::FetchError(msg),
            IngestError::InvalidRecord { .. } => Self::product_feed_error(err.to_string()),
            IngestError::AlreadyInitialized { .. } => Self::Conflict(err.to_string()),
            IngestError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(path: &str) -> Self {
        ApiError::NotFound(format!("No route for {}", path))
    }

    pub fn product_feed_error(msg: impl Into<String>) -> Self {
        ApiError::ExternalApiError {
            service: "Product feed".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_month_uses_fixed_message() {
        let (status, body) = body_json(TransactionError::MissingMonth.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Month parameter is required" }));
    }

    #[tokio::test]
    async fn invalid_month_uses_fixed_message() {
        let (status, body) =
            body_json(TransactionError::InvalidMonth("Jan".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], messages::INVALID_MONTH);
    }

    #[tokio::test]
    async fn ingest_errors_map_to_statuses() {
        let (status, body) = body_json(IngestError::Fetch("timeout".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data from API");

        let (status, _) = body_json(
            IngestError::AlreadyInitialized {
                existing: vec![1],
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = body_json(
            IngestError::InvalidRecord {
                id: 3,
                reason: "bad date".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Product feed service is unavailable");
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, body) =
            body_json(ApiError::DatabaseError("disk I/O error".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "A database error occurred");
    }
}
