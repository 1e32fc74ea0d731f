//! Domain service for reading transactions: listing and month reports.
//!
//! Handlers pass raw query values through; month resolution, defaults and
//! filtering happen here so every route applies them the same way.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MonthError;
use crate::models::Transaction;
use crate::services::aggregation::{CategoryBreakdown, PriceHistogram, SalesStatistics};

/// Domain errors for transaction queries.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Month parameter is required")]
    MissingMonth,

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<MonthError> for TransactionError {
    fn from(err: MonthError) -> Self {
        match err {
            MonthError::Missing => Self::MissingMonth,
            MonthError::Invalid(raw) => Self::InvalidMonth(raw),
        }
    }
}

impl From<sea_orm::DbErr> for TransactionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TransactionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Listing request as it arrives from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTransactionsRequest {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// One page of transactions.
///
/// # Examples
///
/// ```
/// use salesdash::services::TransactionListing;
///
/// let listing = TransactionListing {
///     transactions: vec![],
///     total: 25,
///     page: 4,
///     per_page: 10,
///     total_pages: 3,
/// };
///
/// assert!(listing.transactions.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TransactionListing {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[async_trait::async_trait]
pub trait TransactionService: Send + Sync {
    /// Lists transactions filtered by month and search text, one page at a time.
    ///
    /// # Errors
    ///
    /// - Returns [`TransactionError::InvalidMonth`] for an unknown month name.
    /// - Returns [`TransactionError::Validation`] for a zero page or an oversized page.
    /// - Returns [`TransactionError::Database`] on connection failures.
    async fn list_transactions(
        &self,
        request: ListTransactionsRequest,
    ) -> Result<TransactionListing, TransactionError>;

    /// Sales totals for a month of any year.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::MissingMonth`] or
    /// [`TransactionError::InvalidMonth`] when `month` doesn't resolve.
    async fn statistics(&self, month: Option<&str>) -> Result<SalesStatistics, TransactionError>;

    /// Price-range histogram for a month of any year.
    async fn price_histogram(&self, month: Option<&str>)
    -> Result<PriceHistogram, TransactionError>;

    /// Count per category for a month of any year.
    async fn category_breakdown(
        &self,
        month: Option<&str>,
    ) -> Result<CategoryBreakdown, TransactionError>;
}
