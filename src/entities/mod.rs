pub mod prelude;

pub mod transactions;
