//! Internal helpers for lenient field conversion.
//!
//! Trip and tariff records come from forms and spreadsheet imports, so any
//! field may be missing, `null`, a number, or a string holding a number.
//! These helpers centralize the coercion rules so every record degrades the
//! same way: a value that cannot be read as a finite number becomes the field
//! default, never an error and never `NaN`.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Read a JSON value as a finite number.
///
/// Numbers and numeric strings (surrounding whitespace allowed) are accepted;
/// everything else yields `None`.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Replace a non-finite value with `fallback`.
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Parse a decorated distance (`"12.4 km"`) into kilometers.
///
/// Every character other than an ASCII digit or `.` is dropped, then the
/// longest leading decimal number is read. `"1.2.3"` reads as `1.2`; an
/// empty remainder reads as `0`.
pub(crate) fn parse_distance_km(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in cleaned.char_indices() {
        if ch == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = idx + ch.len_utf8();
    }

    cleaned[..end].parse::<f64>().map_or(0.0, |km| finite_or(km, 0.0))
}

pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number).unwrap_or(0.0))
}

pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

/// Only the literal `true` counts; `"true"`, `1` and `null` are all `false`.
pub(crate) fn strict_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Strings pass through, numbers are rendered, anything else is empty.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A non-array value is an empty list; entries that fail to deserialize are
/// dropped.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn distance_strips_decoration() {
        assert_eq!(parse_distance_km("12.4 km"), 12.4);
        assert_eq!(parse_distance_km("  30km"), 30.0);
        assert_eq!(parse_distance_km("km 7"), 7.0);
        assert_eq!(parse_distance_km("1.2.3"), 1.2);
    }

    #[test]
    fn distance_without_digits_is_zero() {
        assert_eq!(parse_distance_km(""), 0.0);
        assert_eq!(parse_distance_km("abc"), 0.0);
        assert_eq!(parse_distance_km("."), 0.0);
    }

    #[test]
    fn distance_drops_sign() {
        assert_eq!(parse_distance_km("-5 km"), 5.0);
    }

    #[test]
    fn coerce_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_number(&json!(150)), Some(150.0));
        assert_eq!(coerce_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("12 km")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
    }
}
