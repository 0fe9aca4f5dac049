//! Numeric coercion helpers
//!
//! Backend payloads occasionally carry decimals as strings, `null`, or values
//! that overflowed to infinity on the way through. Everything numeric is
//! funnelled through here so that no `NaN`/`Infinity` ever reaches a card.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Replace non-finite values with zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Interpret a loosely typed JSON value as a finite number
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Deserialize a required numeric field, falling back to 0
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).unwrap_or(0.0))
}

/// Deserialize an optional numeric field
///
/// `null` and absent fields stay `None`; garbage becomes `None` as well so
/// the caller derives the value instead of trusting it.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

/// Deserialize an integer that may arrive as a number or a string
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "lenient_f64")]
        required: f64,
        #[serde(default, deserialize_with = "lenient_opt_f64")]
        optional: Option<f64>,
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(12.5), 12.5);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_lenient_accepts_numeric_strings() {
        let s: Sample = serde_json::from_str(r#"{"required": "1540.25", "optional": "3"}"#).unwrap();
        assert_eq!(s.required, 1540.25);
        assert_eq!(s.optional, Some(3.0));
    }

    #[test]
    fn test_lenient_coerces_garbage_to_zero() {
        let s: Sample = serde_json::from_str(r#"{"required": "n/a", "optional": null}"#).unwrap();
        assert_eq!(s.required, 0.0);
        assert_eq!(s.optional, None);

        let s: Sample = serde_json::from_str(r#"{"required": null}"#).unwrap();
        assert_eq!(s.required, 0.0);
        assert_eq!(s.optional, None);
    }

    #[test]
    fn test_value_to_f64_rejects_non_finite_strings() {
        assert_eq!(value_to_f64(&Value::String("inf".to_string())), None);
        assert_eq!(value_to_f64(&Value::String("NaN".to_string())), None);
        assert_eq!(value_to_f64(&Value::Array(vec![])), None);
    }
}
