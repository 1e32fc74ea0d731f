use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognised sale date: {0:?}")]
pub struct SaleDateError(pub String);

// `%.f` also matches an absent fractional part.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses the textual `dateOfSale` of the product feed.
///
/// Values carrying an offset keep it; month bucketing converts to UTC first.
/// Naive values are taken as UTC.
pub fn parse_sale_date(raw: &str) -> Result<DateTime<FixedOffset>, SaleDateError> {
    let raw = raw.trim();
    let utc = FixedOffset::east_opt(0).ok_or_else(|| SaleDateError(raw.to_string()))?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().with_timezone(&utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(&utc))
        .ok_or_else(|| SaleDateError(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn keeps_the_recorded_offset() {
        let parsed = parse_sale_date("2021-12-01T01:30:00+05:30").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
        // The same instant is still November in UTC.
        assert_eq!(parsed.with_timezone(&chrono::Utc).month(), 11);
    }

    #[test]
    fn accepts_naive_datetimes_and_plain_dates() {
        let parsed = parse_sale_date("2022-03-04T10:11:12").unwrap();
        assert_eq!((parsed.month(), parsed.day(), parsed.hour()), (3, 4, 10));

        let parsed = parse_sale_date("2022-03-04 10:11:12.5").unwrap();
        assert_eq!(parsed.second(), 12);

        let parsed = parse_sale_date("2023-01-10").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2023, 1, 10));
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_sale_date("").is_err());
        assert!(parse_sale_date("yesterday").is_err());
        assert!(parse_sale_date("2023-13-01").is_err());
        assert_eq!(
            parse_sale_date("10/01/2023"),
            Err(SaleDateError("10/01/2023".to_string()))
        );
    }
}
