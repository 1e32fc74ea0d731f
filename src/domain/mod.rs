//! Domain primitives for sale records.
//!
//! Month filtering works on calendar months regardless of year, so the
//! month is modelled as its own newtype rather than as a date range.

pub mod sale_date;

pub use sale_date::{SaleDateError, parse_sale_date};

use chrono::{Datelike, Month};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while resolving a `month` request parameter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonthError {
    #[error("month parameter is required")]
    Missing,

    #[error("invalid month name: {0}")]
    Invalid(String),
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month (1-12), independent of year.
///
/// # Examples
///
/// ```rust
/// use salesdash::domain::SaleMonth;
///
/// let month: SaleMonth = "march".parse().unwrap();
/// assert_eq!(month.number(), 3);
/// assert_eq!(month.to_string(), "March");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaleMonth(u8);

impl SaleMonth {
    /// Builds a month from its number, `None` outside 1-12.
    #[must_use]
    pub const fn from_number(number: u32) -> Option<Self> {
        if number >= 1 && number <= 12 {
            Some(Self(number as u8))
        } else {
            None
        }
    }

    /// The calendar month a date falls in.
    #[must_use]
    pub fn of_date<D: Datelike>(date: &D) -> Self {
        Self(date.month() as u8)
    }

    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        MONTH_NAMES[self.0 as usize - 1]
    }

    /// Resolves an optional query parameter. Empty strings count as absent.
    pub fn from_param(param: Option<&str>) -> Result<Self, MonthError> {
        match param {
            Some(raw) if !raw.is_empty() => raw.parse(),
            _ => Err(MonthError::Missing),
        }
    }

    /// Like [`SaleMonth::from_param`] but an absent month is not an error.
    pub fn from_optional_param(param: Option<&str>) -> Result<Option<Self>, MonthError> {
        match Self::from_param(param) {
            Ok(month) => Ok(Some(month)),
            Err(MonthError::Missing) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl FromStr for SaleMonth {
    type Err = MonthError;

    /// Accepts full English month names only, ignoring ASCII case.
    /// Abbreviations ("Jan") and numbers ("01") are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .and_then(|idx| Self::from_number(idx as u32 + 1))
            .ok_or_else(|| MonthError::Invalid(s.to_string()))
    }
}

impl From<Month> for SaleMonth {
    fn from(month: Month) -> Self {
        Self(month.number_from_month() as u8)
    }
}

impl From<SaleMonth> for Month {
    fn from(month: SaleMonth) -> Self {
        // The inner value is always 1-12.
        Month::try_from(month.0).unwrap_or(Month::January)
    }
}

impl fmt::Display for SaleMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for SaleMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}
