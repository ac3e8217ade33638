use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow};
use uuid::Uuid;

use crate::filter::FieldValue;

/// A row type stored in its own table.
///
/// `to_fields` returns every column, including `id` and the timestamps, in
/// table order. The Postgres repository uses it to build INSERT and UPDATE
/// statements and the memory repository uses it to evaluate filters.
pub trait Document:
    for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;

    /// Columns that must be unique across the table.
    const UNIQUE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;

    fn to_fields(&self) -> Vec<(&'static str, FieldValue)>;

    /// Stamps `updated_at`.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Helper for JSONB columns.
pub fn json_field<T: Serialize>(value: &T) -> FieldValue {
    FieldValue::Json(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
}
