//! One-shot bootstrap of the transaction table from the product feed.
//!
//! The load is all or nothing: it either inserts the whole feed in a single
//! database transaction or leaves the store untouched. Running it against a
//! populated store is rejected instead of silently upserting.

use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::TransactionSource;
use crate::db::Store;
use crate::models::Transaction;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to fetch product feed: {0}")]
    Fetch(String),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: i32, reason: String },

    #[error("Database already initialized: {} incoming transactions exist", .existing.len())]
    AlreadyInitialized { existing: Vec<i32> },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for IngestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: u64,
}

pub struct IngestService {
    store: Store,
    source: Arc<dyn TransactionSource>,
}

impl IngestService {
    #[must_use]
    pub fn new(store: Store, source: Arc<dyn TransactionSource>) -> Self {
        Self { store, source }
    }

    pub async fn initialize(&self) -> Result<IngestReport, IngestError> {
        info!("Initializing transactions from {}", self.source.describe());

        let items = self
            .source
            .fetch_transactions()
            .await
            .map_err(|e| IngestError::Fetch(format!("{e:#}")))?;

        let mut seen = HashSet::with_capacity(items.len());
        let mut records = Vec::with_capacity(items.len());

        for item in items {
            if !seen.insert(item.id) {
                return Err(IngestError::InvalidRecord {
                    id: item.id,
                    reason: "duplicate id in feed".to_string(),
                });
            }

            let id = item.id;
            let record = Transaction::try_from(item).map_err(|e| IngestError::InvalidRecord {
                id,
                reason: e.to_string(),
            })?;
            records.push(record);
        }

        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let existing = self.store.existing_transaction_ids(&ids).await?;
        if !existing.is_empty() {
            warn!(
                "Refusing to initialize: {} of {} transactions already stored",
                existing.len(),
                ids.len()
            );
            return Err(IngestError::AlreadyInitialized { existing });
        }

        let inserted = self.store_records(&records, &ids).await?;

        metrics::counter!("ingest_records_total").increment(inserted);
        info!("Initialized {} transactions", inserted);

        Ok(IngestReport { inserted })
    }

    /// Inserts the batch. A primary key clash means a concurrent load won
    /// the race after the existing-id check.
    async fn store_records(&self, records: &[Transaction], ids: &[i32]) -> Result<u64, IngestError> {
        match self.store.insert_transactions(records).await {
            Ok(inserted) => Ok(inserted),
            Err(e) if is_unique_violation(&e) => {
                warn!("Concurrent load detected while inserting transactions");
                let existing = self.store.existing_transaction_ids(ids).await?;
                Err(IngestError::AlreadyInitialized { existing })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>()
        .and_then(DbErr::sql_err)
        .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceTransaction;
    use anyhow::Result;

    struct StaticSource(Vec<SourceTransaction>);

    #[async_trait::async_trait]
    impl TransactionSource for StaticSource {
        async fn fetch_transactions(&self) -> Result<Vec<SourceTransaction>> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl TransactionSource for FailingSource {
        async fn fetch_transactions(&self) -> Result<Vec<SourceTransaction>> {
            anyhow::bail!("Product feed error: 503 Service Unavailable")
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn item(id: i32, date: &str) -> SourceTransaction {
        SourceTransaction {
            id,
            title: format!("Item {id}"),
            price: 12.5,
            description: "desc".to_string(),
            category: "electronics".to_string(),
            image: String::new(),
            sold: true,
            date_of_sale: date.to_string(),
        }
    }

    async fn store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn loads_the_whole_feed() {
        let store = store().await;
        let source = Arc::new(StaticSource(vec![
            item(1, "2021-11-27T20:29:54+05:30"),
            item(2, "2022-01-01"),
        ]));
        let service = IngestService::new(store.clone(), source);

        let report = service.initialize().await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(store.count_transactions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn second_run_is_rejected_without_writes() {
        let store = store().await;
        let source = Arc::new(StaticSource(vec![item(1, "2022-01-01"), item(2, "2022-01-02")]));
        let service = IngestService::new(store.clone(), source);

        service.initialize().await.unwrap();
        match service.initialize().await {
            Err(IngestError::AlreadyInitialized { existing }) => assert_eq!(existing, vec![1, 2]),
            other => panic!("expected AlreadyInitialized, got {other:?}"),
        }
        assert_eq!(store.count_transactions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_writes_nothing() {
        let store = store().await;
        let service = IngestService::new(store.clone(), Arc::new(FailingSource));

        assert!(matches!(
            service.initialize().await,
            Err(IngestError::Fetch(_))
        ));
        assert_eq!(store.count_transactions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn bad_dates_and_duplicate_ids_abort_the_load() {
        let store = store().await;

        let bad_date = Arc::new(StaticSource(vec![item(1, "2022-01-01"), item(2, "soon")]));
        let result = IngestService::new(store.clone(), bad_date).initialize().await;
        assert!(matches!(
            result,
            Err(IngestError::InvalidRecord { id: 2, .. })
        ));

        let duplicated = Arc::new(StaticSource(vec![item(7, "2022-01-01"), item(7, "2022-01-02")]));
        let result = IngestService::new(store.clone(), duplicated).initialize().await;
        assert!(matches!(
            result,
            Err(IngestError::InvalidRecord { id: 7, .. })
        ));

        assert_eq!(store.count_transactions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_clash_after_check_reports_already_initialized() {
        let store = store().await;
        let records: Vec<Transaction> = [item(1, "2022-01-01"), item(2, "2022-01-02")]
            .into_iter()
            .map(|i| Transaction::try_from(i).unwrap())
            .collect();
        let ids = [1, 2];

        // Another load commits between the existing-id check and the insert.
        store.insert_transactions(&records[..1]).await.unwrap();

        let service = IngestService::new(store.clone(), Arc::new(StaticSource(vec![])));
        match service.store_records(&records, &ids).await {
            Err(IngestError::AlreadyInitialized { existing }) => assert_eq!(existing, vec![1]),
            other => panic!("expected AlreadyInitialized, got {other:?}"),
        }
        assert_eq!(store.count_transactions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_unique_violation() {
        let store = store().await;
        let record = Transaction::try_from(item(9, "2022-01-01")).unwrap();

        store.insert_transactions(std::slice::from_ref(&record)).await.unwrap();
        let err = store
            .insert_transactions(std::slice::from_ref(&record))
            .await
            .unwrap_err();

        assert!(is_unique_violation(&err));
        assert!(!is_unique_violation(&anyhow::anyhow!("timeout")));
    }

    #[test]
    fn error_messages() {
        let err = IngestError::AlreadyInitialized {
            existing: vec![1, 2, 3],
        };
        assert_eq!(
            err.to_string(),
            "Database already initialized: 3 incoming transactions exist"
        );
    }
}
