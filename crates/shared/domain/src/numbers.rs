//! Lenient numeric input.
//!
//! Spreadsheet-style clients send numbers as JSON numbers or as numeric
//! strings, and leave cells blank with `""` or `null`.

use serde_json::{Number, Value};

/// Outcome of reading a number out of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberInput {
    /// `null` or an empty string
    Empty,
    /// A finite number
    Number(f64),
    /// Present but not numeric
    Invalid,
}

/// Read a number out of an arbitrary JSON value.
pub fn read_number(value: &Value) -> NumberInput {
    match value {
        Value::Null => NumberInput::Empty,
        Value::Number(n) => n.as_f64().map_or(NumberInput::Invalid, NumberInput::Number),
        Value::String(s) if s.trim().is_empty() => NumberInput::Empty,
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => NumberInput::Number(n),
            _ => NumberInput::Invalid,
        },
        _ => NumberInput::Invalid,
    }
}

/// Read a number, treating anything non-numeric as zero.
pub fn coerce_number(value: &Value) -> f64 {
    match read_number(value) {
        NumberInput::Number(n) => n,
        NumberInput::Empty | NumberInput::Invalid => 0.0,
    }
}

/// Convert a float back into a JSON value.
pub fn number_value(n: f64) -> Value {
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

/// Serde adapter: optional number with lenient input.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde::Deserialize;

    let value = Value::deserialize(deserializer)?;
    match read_number(&value) {
        NumberInput::Empty => Ok(None),
        NumberInput::Number(n) => Ok(Some(n)),
        NumberInput::Invalid => Err(D::Error::custom(format!("expected a number, got {}", value))),
    }
}

/// Serde adapter: number with lenient input where blank means zero.
pub fn lenient_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient(deserializer).map(|n| n.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_number() {
        assert_eq!(read_number(&json!(12.5)), NumberInput::Number(12.5));
        assert_eq!(read_number(&json!(" 1200 ")), NumberInput::Number(1200.0));
        assert_eq!(read_number(&json!("")), NumberInput::Empty);
        assert_eq!(read_number(&json!(null)), NumberInput::Empty);
        assert_eq!(read_number(&json!("twelve")), NumberInput::Invalid);
        assert_eq!(read_number(&json!("NaN")), NumberInput::Invalid);
        assert_eq!(read_number(&json!([1])), NumberInput::Invalid);
    }

    #[test]
    fn test_coerce_number_falls_back_to_zero() {
        assert_eq!(coerce_number(&json!("abc")), 0.0);
        assert_eq!(coerce_number(&json!("42")), 42.0);
        assert_eq!(coerce_number(&json!(null)), 0.0);
    }
}
