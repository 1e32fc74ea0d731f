use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::SourceConfig;
use crate::models::SourceTransaction;

/// Anything that can hand over the full product-transaction dataset.
#[async_trait::async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(&self) -> Result<Vec<SourceTransaction>>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Fetches the dataset as one JSON array over HTTP.
#[derive(Clone)]
pub struct ProductFeedClient {
    client: Client,
    url: String,
}

impl ProductFeedClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build product feed HTTP client")?;

        Ok(Self::with_shared_client(client, config.url.clone()))
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait::async_trait]
impl TransactionSource for ProductFeedClient {
    async fn fetch_transactions(&self) -> Result<Vec<SourceTransaction>> {
        debug!("Fetching product feed from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Product feed error: {} - {}", status, body));
        }

        let items: Vec<SourceTransaction> = response
            .json()
            .await
            .context("Product feed returned an unexpected body")?;

        debug!("Product feed returned {} items", items.len());
        Ok(items)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
