use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{SaleDateError, SaleMonth, parse_sale_date};

/// A product sale as stored and served by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transaction {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    /// Sale date exactly as the feed delivered it.
    pub date_of_sale: String,
    #[serde(skip)]
    pub sold_at: DateTime<FixedOffset>,
}

impl Transaction {
    /// Calendar month of the sale instant in UTC.
    #[must_use]
    pub fn sale_month(&self) -> SaleMonth {
        SaleMonth::of_date(&self.sold_at.with_timezone(&Utc))
    }
}

/// One element of the product feed's JSON array.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceTransaction {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    #[serde(rename = "dateOfSale")]
    pub date_of_sale: String,
}

impl TryFrom<SourceTransaction> for Transaction {
    type Error = SaleDateError;

    fn try_from(source: SourceTransaction) -> Result<Self, Self::Error> {
        let sold_at = parse_sale_date(&source.date_of_sale)?;
        Ok(Self {
            id: source.id,
            title: source.title,
            price: source.price,
            description: source.description,
            category: source.category,
            image: source.image,
            sold: source.sold,
            date_of_sale: source.date_of_sale,
            sold_at,
        })
    }
}
