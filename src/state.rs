use std::sync::Arc;

use crate::clients::{ProductFeedClient, TransactionSource};
use crate::config::Config;
use crate::db::Store;
use crate::services::{IngestService, SeaOrmTransactionService, TransactionService};

/// Everything a request handler or CLI command needs, built once at startup.
///
/// The store and services are injected here and handed down explicitly;
/// nothing reaches for a global connection.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub transactions: Arc<dyn TransactionService>,

    pub ingest: Arc<IngestService>,
}

impl SharedState {
    /// Opens the store and wires the product feed client from `config.source`.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let source = Arc::new(ProductFeedClient::new(&config.source)?);
        Self::with_source(config, source).await
    }

    /// Like [`SharedState::new`] but ingesting from the given source.
    pub async fn with_source(
        config: Config,
        source: Arc<dyn TransactionSource>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let transactions = Arc::new(SeaOrmTransactionService::new(
            store.clone(),
            config.query.clone(),
        )) as Arc<dyn TransactionService + Send + Sync + 'static>;

        let ingest = Arc::new(IngestService::new(store.clone(), source));

        Ok(Self {
            config: Arc::new(config),
            store,
            transactions,
            ingest,
        })
    }
}
