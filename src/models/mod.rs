pub mod transaction;

pub use transaction::{SourceTransaction, Transaction};
