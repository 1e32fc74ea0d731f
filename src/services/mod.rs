pub mod aggregation;
pub use aggregation::{CategoryBreakdown, PriceHistogram, SalesStatistics};

pub mod ingest;
pub use ingest::{IngestError, IngestReport, IngestService};

pub mod transaction_service;
pub use transaction_service::{
    ListTransactionsRequest, TransactionError, TransactionListing, TransactionService,
};

pub mod transaction_service_impl;
pub use transaction_service_impl::SeaOrmTransactionService;
