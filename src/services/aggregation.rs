//! Month-scoped reducers over already-filtered transactions.
//!
//! Every reducer here is pure: callers load the records of one month and
//! hand them over as a slice.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::constants::histogram::{OPEN_BUCKET_LABEL, UPPER_BOUNDS};
use crate::models::Transaction;

const BUCKET_COUNT: usize = UPPER_BOUNDS.len() + 1;

/// Totals for one month.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SalesStatistics {
    pub total_sales_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

/// Record counts per fixed price range.
///
/// Serializes as a JSON object keyed by range label, in ascending order,
/// with every range present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [u64; BUCKET_COUNT],
}

impl PriceHistogram {
    /// Index of the range `price` falls in. Upper bounds are inclusive.
    #[must_use]
    pub fn bucket_index(price: f64) -> usize {
        UPPER_BOUNDS
            .iter()
            .position(|&bound| price <= f64::from(bound))
            .unwrap_or(UPPER_BOUNDS.len())
    }

    /// Label of range `index`, e.g. `"0-100"`, `"101-200"` or `"901-above"`.
    #[must_use]
    pub fn bucket_label(index: usize) -> String {
        match index {
            0 => format!("0-{}", UPPER_BOUNDS[0]),
            i if i < UPPER_BOUNDS.len() => {
                format!("{}-{}", UPPER_BOUNDS[i - 1] + 1, UPPER_BOUNDS[i])
            }
            _ => OPEN_BUCKET_LABEL.to_string(),
        }
    }

    pub fn record(&mut self, price: f64) {
        self.counts[Self::bucket_index(price)] += 1;
    }

    #[must_use]
    pub fn count(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(idx, &count)| (Self::bucket_label(idx), count))
    }
}

impl Serialize for PriceHistogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(BUCKET_COUNT))?;
        for (label, count) in self.iter() {
            map.serialize_entry(&label, &count)?;
        }
        map.end()
    }
}

/// Record counts per observed category label.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategoryBreakdown(pub BTreeMap<String, u64>);

impl CategoryBreakdown {
    #[must_use]
    pub fn get(&self, category: &str) -> u64 {
        self.0.get(category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

#[must_use]
pub fn sales_statistics(transactions: &[Transaction]) -> SalesStatistics {
    transactions
        .iter()
        .fold(SalesStatistics::default(), |mut stats, transaction| {
            if transaction.sold {
                stats.total_sales_amount += transaction.price;
                stats.total_sold_items += 1;
            } else {
                stats.total_not_sold_items += 1;
            }
            stats
        })
}

#[must_use]
pub fn price_histogram(transactions: &[Transaction]) -> PriceHistogram {
    let mut histogram = PriceHistogram::default();
    for transaction in transactions {
        histogram.record(transaction.price);
    }
    histogram
}

#[must_use]
pub fn category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut counts = BTreeMap::new();
    for transaction in transactions {
        *counts.entry(transaction.category.clone()).or_insert(0) += 1;
    }
    CategoryBreakdown(counts)
}
