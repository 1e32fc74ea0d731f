//! `SeaORM` implementation of the `TransactionService` trait.

use tracing::debug;

use crate::config::QueryConfig;
use crate::constants::pagination::DEFAULT_PAGE;
use crate::db::{Store, TransactionFilter};
use crate::domain::SaleMonth;
use crate::models::Transaction;
use crate::services::aggregation::{
    self, CategoryBreakdown, PriceHistogram, SalesStatistics,
};
use crate::services::transaction_service::{
    ListTransactionsRequest, TransactionError, TransactionListing, TransactionService,
};

pub struct SeaOrmTransactionService {
    store: Store,
    query: QueryConfig,
}

impl SeaOrmTransactionService {
    #[must_use]
    pub const fn new(store: Store, query: QueryConfig) -> Self {
        Self { store, query }
    }

    async fn month_records(&self, month: Option<&str>) -> Result<Vec<Transaction>, TransactionError> {
        let month = SaleMonth::from_param(month)?;
        Ok(self.store.list_transactions_by_month(month).await?)
    }

    fn resolve_page(page: Option<u64>) -> Result<u64, TransactionError> {
        match page.unwrap_or(DEFAULT_PAGE) {
            0 => Err(TransactionError::Validation(
                "Invalid page: 0. Page must be a positive integer".to_string(),
            )),
            page => Ok(page),
        }
    }

    fn resolve_per_page(&self, per_page: Option<u64>) -> Result<u64, TransactionError> {
        let per_page = per_page.unwrap_or(self.query.default_per_page);
        if per_page == 0 {
            return Err(TransactionError::Validation(
                "Invalid per_page: 0. per_page must be a positive integer".to_string(),
            ));
        }
        if let Some(max) = self.query.max_per_page
            && per_page > max
        {
            return Err(TransactionError::Validation(format!(
                "Invalid per_page: {per_page}. per_page must be between 1 and {max}"
            )));
        }
        Ok(per_page)
    }
}

#[async_trait::async_trait]
impl TransactionService for SeaOrmTransactionService {
    async fn list_transactions(
        &self,
        request: ListTransactionsRequest,
    ) -> Result<TransactionListing, TransactionError> {
        let month = SaleMonth::from_optional_param(request.month.as_deref())?;
        let page = Self::resolve_page(request.page)?;
        let per_page = self.resolve_per_page(request.per_page)?;

        // Blank text means no search; anything else is matched verbatim.
        let search = request.search.filter(|s| !s.trim().is_empty());

        let filter = TransactionFilter {
            month,
            search,
            price_match: self.query.price_match,
        };

        debug!(?filter, page, per_page, "Listing transactions");

        let result = self
            .store
            .search_transactions(&filter, page, per_page)
            .await?;

        Ok(TransactionListing {
            transactions: result.items,
            total: result.total,
            page,
            per_page,
            total_pages: result.total_pages,
        })
    }

    async fn statistics(&self, month: Option<&str>) -> Result<SalesStatistics, TransactionError> {
        let records = self.month_records(month).await?;
        Ok(aggregation::sales_statistics(&records))
    }

    async fn price_histogram(
        &self,
        month: Option<&str>,
    ) -> Result<PriceHistogram, TransactionError> {
        let records = self.month_records(month).await?;
        Ok(aggregation::price_histogram(&records))
    }

    async fn category_breakdown(
        &self,
        month: Option<&str>,
    ) -> Result<CategoryBreakdown, TransactionError> {
        let records = self.month_records(month).await?;
        Ok(aggregation::category_breakdown(&records))
    }
}
