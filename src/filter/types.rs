use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A typed column value. Nullable variants carry an `Option` so that a NULL
/// still binds with the column's Postgres type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Float(Option<f64>),
    Text(Option<String>),
    TextArray(Vec<String>),
    Uuid(Option<Uuid>),
    Date(Option<NaiveDate>),
    Timestamp(Option<DateTime<Utc>>),
    Json(serde_json::Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            FieldValue::Float(None)
                | FieldValue::Text(None)
                | FieldValue::Uuid(None)
                | FieldValue::Date(None)
                | FieldValue::Timestamp(None)
                | FieldValue::Json(serde_json::Value::Null)
        )
    }

    /// Ordering used by in-memory sorting. NULLs sort first; values of
    /// different kinds compare equal.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (BigInt(a), BigInt(b)) => a.cmp(b),
            (Int(a), BigInt(b)) => i64::from(*a).cmp(b),
            (BigInt(a), Int(b)) => a.cmp(&i64::from(*b)),
            (Float(a), Float(b)) => match (a, b) {
                (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
                _ => a.is_some().cmp(&b.is_some()),
            },
            (Text(a), Text(b)) => a.cmp(b),
            (TextArray(a), TextArray(b)) => a.cmp(b),
            (Uuid(a), Uuid(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { FieldValue::Bool(v) }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self { FieldValue::Int(v) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::BigInt(v) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(Some(v.to_string())) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { FieldValue::Text(Some(v)) }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self { FieldValue::Text(v) }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self { FieldValue::TextArray(v) }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self { FieldValue::Uuid(Some(v)) }
}

impl From<Option<Uuid>> for FieldValue {
    fn from(v: Option<Uuid>) -> Self { FieldValue::Uuid(v) }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self { FieldValue::Date(Some(v)) }
}

impl From<Option<NaiveDate>> for FieldValue {
    fn from(v: Option<NaiveDate>) -> Self { FieldValue::Date(v) }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self { FieldValue::Timestamp(Some(v)) }
}

impl From<Option<DateTime<Utc>>> for FieldValue {
    fn from(v: Option<DateTime<Utc>>) -> Self { FieldValue::Timestamp(v) }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self { FieldValue::Json(v) }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub data: FieldValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FieldValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_sort_before_values() {
        let none = FieldValue::Timestamp(None);
        let some = FieldValue::Timestamp(Some(Utc::now()));
        assert_eq!(none.compare(&some), Ordering::Less);
        assert!(none.is_null());
        assert!(!some.is_null());
    }

    #[test]
    fn mixed_integer_widths_compare_numerically() {
        assert_eq!(FieldValue::Int(3).compare(&FieldValue::BigInt(10)), Ordering::Less);
        assert_eq!(FieldValue::BigInt(7).compare(&FieldValue::Int(7)), Ordering::Equal);
    }
}
