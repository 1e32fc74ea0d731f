use serde::Serialize;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub message: String,
    pub inserted: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: u64,
    pub transactions: u64,
}

/// Query string shared by the month reports.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}
