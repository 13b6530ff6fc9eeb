//! Tolerant serde helpers for percent fields.
//!
//! Stored documents and import rows hold percents as whatever the writer
//! produced: negative numbers, floats, text such as `"40%"`. These read any
//! of them and land within [0, 100].

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use crate::resourcing::parse_percent;

/// Read a percent from any JSON value. Non-numeric values read as 0.
pub(crate) fn from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => from_number(n),
        Value::String(s) => parse_percent(s),
        _ => 0,
    }
}

fn from_number(n: &Number) -> u32 {
    if let Some(i) = n.as_i64() {
        i.clamp(0, 100) as u32
    } else if n.is_u64() {
        100
    } else {
        n.as_f64().map_or(0, |f| f.trunc().clamp(0.0, 100.0) as u32)
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| from_value(&v))
}

/// Keep a percent column as text, accepting numbers as well as strings.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_clamped() {
        assert_eq!(from_value(&json!(40)), 40);
        assert_eq!(from_value(&json!(-5)), 0);
        assert_eq!(from_value(&json!(250)), 100);
        assert_eq!(from_value(&json!(u64::MAX)), 100);
        assert_eq!(from_value(&json!(37.9)), 37);
    }

    #[test]
    fn text_uses_leading_digits() {
        assert_eq!(from_value(&json!("40%")), 40);
        assert_eq!(from_value(&json!("abc")), 0);
    }

    #[test]
    fn anything_else_is_zero() {
        assert_eq!(from_value(&json!(null)), 0);
        assert_eq!(from_value(&json!([50])), 0);
        assert_eq!(from_value(&json!({ "percent": 50 })), 0);
    }
}
