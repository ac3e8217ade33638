//! Lenient field deserializers for values that arrive as multipart text.
//!
//! Use with `#[serde(default, deserialize_with = "...")]` on `Option` fields.
//! Empty strings always read as `None`.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn raw<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::Null) | None => None,
        other => other,
    })
}

/// Trimmed text.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match raw(d)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected text, found {}", other))),
    }
}

/// `true`/`false`, `"true"`/`"false"`, `"1"`/`"0"`, `"on"`/`"off"`.
pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match raw(d)? {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_i64().unwrap_or(0) != 0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(Some(true)),
            "false" | "0" | "off" | "no" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("'{}' is not a boolean", other))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a boolean, found {}", other))),
    }
}

/// A number or numeric text.
pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    match raw(d)? {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{} is not a whole number", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{}' is not a whole number", s.trim()))),
        Some(other) => Err(D::Error::custom(format!("expected a number, found {}", other))),
    }
}

/// A JSON array, a JSON array encoded as text, or comma-separated text.
pub fn opt_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    let items = match raw(d)? {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => items,
            _ => s.split(',').map(|part| Value::String(part.to_string())).collect(),
        },
        Some(other) => return Err(D::Error::custom(format!("expected a list, found {}", other))),
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
    ))
}

/// An object, or an object encoded as JSON text. Text that does not parse is
/// treated as absent.
pub fn opt_json<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match raw(d)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(serde_json::from_str::<T>(&s).ok()),
        Some(value) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
    }
}

/// Text parsed with `FromStr`, e.g. the lowercase names of a status enum.
pub fn opt_parsed<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match opt_string(d)? {
        None => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(D::Error::custom),
    }
}

/// `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match raw(d)? {
        None => Ok(None),
        Some(Value::String(s)) => parse_date(s.trim())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("'{}' is not a valid date", s.trim()))),
        Some(other) => Err(D::Error::custom(format!("expected a date, found {}", other))),
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Sample {
        #[serde(deserialize_with = "opt_string")]
        name: Option<String>,
        #[serde(deserialize_with = "opt_bool")]
        is_active: Option<bool>,
        #[serde(deserialize_with = "opt_i32")]
        order: Option<i32>,
        #[serde(deserialize_with = "opt_string_list")]
        tags: Option<Vec<String>>,
        #[serde(deserialize_with = "opt_json")]
        coordinates: Option<crate::database::models::Coordinates>,
        #[serde(deserialize_with = "opt_date")]
        date: Option<NaiveDate>,
    }

    #[test]
    fn multipart_text_values_are_coerced() {
        let sample: Sample = serde_json::from_value(json!({
            "name": "  Ann ",
            "isActive": "false",
            "order": "3",
            "tags": "security, guards,,",
            "coordinates": "{\"lat\": 9.05, \"lng\": 7.49}",
            "date": "2030-05-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(sample.name.as_deref(), Some("Ann"));
        assert_eq!(sample.is_active, Some(false));
        assert_eq!(sample.order, Some(3));
        assert_eq!(sample.tags, Some(vec!["security".to_string(), "guards".to_string()]));
        assert_eq!(sample.coordinates.and_then(|c| c.lat), Some(9.05));
        assert_eq!(sample.date, NaiveDate::from_ymd_opt(2030, 5, 1));
    }

    #[test]
    fn json_values_pass_through_and_blanks_are_none() {
        let sample: Sample = serde_json::from_value(json!({
            "name": "",
            "isActive": true,
            "order": 2,
            "tags": "[\"a\", \"b\"]",
            "coordinates": "not json",
            "date": ""
        }))
        .unwrap();
        assert!(sample.name.is_none());
        assert_eq!(sample.is_active, Some(true));
        assert_eq!(sample.order, Some(2));
        assert_eq!(sample.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(sample.coordinates.is_none());
        assert!(sample.date.is_none());
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(serde_json::from_value::<Sample>(json!({ "order": "first" })).is_err());
        assert!(serde_json::from_value::<Sample>(json!({ "date": "tomorrow" })).is_err());
    }
}
