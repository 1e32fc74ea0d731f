pub mod product_feed;

pub use product_feed::{ProductFeedClient, TransactionSource};
