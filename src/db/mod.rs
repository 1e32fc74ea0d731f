use crate::domain::SaleMonth;
use crate::models::Transaction;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::transaction::{TransactionFilter, TransactionPage};

/// Handle to the transaction database. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn transaction_repo(&self) -> repositories::transaction::TransactionRepository {
        repositories::transaction::TransactionRepository::new(self.conn.clone())
    }

    pub async fn insert_transactions(&self, records: &[Transaction]) -> Result<u64> {
        self.transaction_repo().insert_all(records).await
    }

    pub async fn existing_transaction_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        self.transaction_repo().existing_ids(ids).await
    }

    pub async fn count_transactions(&self) -> Result<u64> {
        self.transaction_repo().count().await
    }

    pub async fn list_transactions_by_month(&self, month: SaleMonth) -> Result<Vec<Transaction>> {
        self.transaction_repo().list_by_month(month).await
    }

    pub async fn search_transactions(
        &self,
        filter: &TransactionFilter,
        page: u64,
        per_page: u64,
    ) -> Result<TransactionPage> {
        self.transaction_repo()
            .search(filter, page, per_page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceMatch;
    use crate::models::SourceTransaction;

    fn record(id: i32, title: &str, price: f64, sold: bool, date: &str) -> Transaction {
        Transaction::try_from(SourceTransaction {
            id,
            title: title.to_string(),
            price,
            description: format!("{title} description"),
            category: "electronics".to_string(),
            image: format!("https://example.com/{id}.jpg"),
            sold,
            date_of_sale: date.to_string(),
        })
        .unwrap()
    }

    async fn seeded_store() -> Store {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store
            .insert_transactions(&[
                record(1, "Laptop Bag", 310.5, true, "2021-01-15T10:00:00+05:30"),
                record(2, "Wireless Mouse", 25.0, false, "2022-01-03T08:00:00+05:30"),
                record(3, "Monitor Stand", 99.99, true, "2022-02-20T12:00:00+05:30"),
                record(4, "USB Hub", 10.0, true, "2021-03-01"),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn month_filter_ignores_year() {
        let store = seeded_store().await;
        let january = store
            .list_transactions_by_month("January".parse().unwrap())
            .await
            .unwrap();
        let ids: Vec<i32> = january.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn round_trips_typed_sale_date() {
        let store = seeded_store().await;
        let february = store
            .list_transactions_by_month("February".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].date_of_sale, "2022-02-20T12:00:00+05:30");
        assert_eq!(february[0].sale_month().number(), 2);
    }

    #[tokio::test]
    async fn duplicate_ids_roll_back_the_whole_batch() {
        let store = seeded_store().await;
        let result = store
            .insert_transactions(&[
                record(5, "Keyboard", 45.0, true, "2021-05-01"),
                record(1, "Duplicate", 1.0, true, "2021-05-01"),
            ])
            .await;
        assert!(result.is_err());
        assert_eq!(store.count_transactions().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn reports_existing_ids() {
        let store = seeded_store().await;
        let existing = store
            .existing_transaction_ids(&[4, 9, 1, 12])
            .await
            .unwrap();
        assert_eq!(existing, vec![1, 4]);
    }

    #[tokio::test]
    async fn search_matches_text_case_insensitively() {
        let store = seeded_store().await;
        let filter = TransactionFilter {
            search: Some("MOUSE".to_string()),
            ..Default::default()
        };
        let page = store.search_transactions(&filter, 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 2);
    }

    #[tokio::test]
    async fn substring_price_search_matches_rendered_price() {
        let store = seeded_store().await;
        let filter = TransactionFilter {
            search: Some("10".to_string()),
            price_match: PriceMatch::Substring,
            ..Default::default()
        };
        let page = store.search_transactions(&filter, 1, 10).await.unwrap();
        let ids: Vec<i32> = page.items.iter().map(|t| t.id).collect();
        // 310.5 and 10.0 both render with "10" in them.
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn exact_price_search_matches_value_only() {
        let store = seeded_store().await;
        let filter = TransactionFilter {
            search: Some("10".to_string()),
            price_match: PriceMatch::Exact,
            ..Default::default()
        };
        let page = store.search_transactions(&filter, 1, 10).await.unwrap();
        let ids: Vec<i32> = page.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[tokio::test]
    async fn paginates_with_totals_and_empty_tail() {
        let store = seeded_store().await;
        let filter = TransactionFilter::default();

        let first = store.search_transactions(&filter, 1, 3).await.unwrap();
        assert_eq!(first.items.len(), 3);
        assert_eq!((first.total, first.total_pages), (4, 2));

        let second = store.search_transactions(&filter, 2, 3).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, 4);

        let beyond = store.search_transactions(&filter, 9, 3).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!((beyond.total, beyond.total_pages), (4, 2));
    }

    #[tokio::test]
    async fn combines_month_and_search() {
        let store = seeded_store().await;
        let filter = TransactionFilter {
            month: Some("January".parse().unwrap()),
            search: Some("bag".to_string()),
            ..Default::default()
        };
        let page = store.search_transactions(&filter, 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Laptop Bag");
    }
}
