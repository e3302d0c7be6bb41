//! Calendar date parsing for user-entered dates.
//!
//! Clients send dates in whatever format their spreadsheet produced, so
//! parsing accepts `DD/MM/YYYY`, RFC 3339, `YYYY-MM-DD`, naive ISO
//! timestamps and epoch milliseconds. Dates are always emitted as RFC 3339
//! in UTC with millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date pattern"));

/// Outcome of reading a date out of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// `null` or an empty string: the field should be cleared
    Empty,
    /// A parsed instant
    Date(DateTime<Utc>),
    /// Present but not a recognizable date
    Invalid,
}

/// Parse a date string in any of the accepted formats.
///
/// `DD/MM/YYYY` is interpreted as midnight UTC. Impossible calendar dates
/// such as `31/02/2024` are rejected rather than rolled over.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Some(caps) = DAY_MONTH_YEAR.captures(input) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).and_then(start_of_day);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return start_of_day(date);
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Read a date out of an arbitrary JSON value.
pub fn read_date(value: &Value) -> DateInput {
    match value {
        Value::Null => DateInput::Empty,
        Value::String(s) if s.trim().is_empty() => DateInput::Empty,
        Value::String(s) => parse_date(s).map_or(DateInput::Invalid, DateInput::Date),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map_or(DateInput::Invalid, DateInput::Date),
        _ => DateInput::Invalid,
    }
}

/// Format an instant the way the API emits dates.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Serde adapter for optional dates using the lenient input rules.
pub mod flexible {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::{format_date, read_date, DateInput};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&format_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match read_date(&value) {
            DateInput::Empty => Ok(None),
            DateInput::Date(date) => Ok(Some(date)),
            DateInput::Invalid => Err(D::Error::custom(format!("invalid date: {}", value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_day_month_year_is_midnight_utc() {
        let date = parse_date("05/03/2024").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
        assert_eq!(format_date(&date), "2024-03-05T00:00:00.000Z");
    }

    #[test]
    fn test_impossible_calendar_date_is_rejected() {
        assert!(parse_date("31/02/2024").is_none());
        assert!(parse_date("00/01/2024").is_none());
    }

    #[test]
    fn test_iso_formats() {
        assert!(parse_date("2024-03-05").is_some());
        assert!(parse_date("2024-03-05T10:30:00").is_some());
        assert!(parse_date("2024-03-05T10:30:00.123").is_some());

        let offset = parse_date("2024-03-05T10:30:00+02:00").unwrap();
        assert_eq!(format_date(&offset), "2024-03-05T08:30:00.000Z");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_date("next tuesday").is_none());
        assert!(parse_date("5/3/2024").is_none());
    }

    #[test]
    fn test_read_date_from_json() {
        assert_eq!(read_date(&json!(null)), DateInput::Empty);
        assert_eq!(read_date(&json!("  ")), DateInput::Empty);
        assert_eq!(read_date(&json!(true)), DateInput::Invalid);
        assert_eq!(read_date(&json!("not a date")), DateInput::Invalid);

        match read_date(&json!(0)) {
            DateInput::Date(date) => assert_eq!(date.year(), 1970),
            other => panic!("expected epoch date, got {:?}", other),
        }
    }
}
