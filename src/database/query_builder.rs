use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};

use crate::filter::{FieldValue, SqlResult};

/// Builds `INSERT ... RETURNING *` for a full set of column values.
pub fn insert_sql(table: &str, fields: Vec<(&'static str, FieldValue)>) -> SqlResult {
    let columns: Vec<String> = fields.iter().map(|(c, _)| format!("\"{}\"", c)).collect();
    let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("${}", i)).collect();
    let query = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    SqlResult { query, params: fields.into_iter().map(|(_, v)| v).collect() }
}

/// Builds `UPDATE ... WHERE id = $n RETURNING *`. `id` and `created_at` are
/// never rewritten.
pub fn update_sql(table: &str, fields: Vec<(&'static str, FieldValue)>) -> SqlResult {
    let mut id = FieldValue::Uuid(None);
    let mut sets = Vec::new();
    let mut params = Vec::new();
    for (column, value) in fields {
        match column {
            "id" => id = value,
            "created_at" => {}
            _ => {
                params.push(value);
                sets.push(format!("\"{}\" = ${}", column, params.len()));
            }
        }
    }
    params.push(id);
    let query = format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = ${} RETURNING *",
        table,
        sets.join(", "),
        params.len()
    );
    SqlResult { query, params }
}

pub fn delete_sql(table: &str) -> String {
    format!("DELETE FROM \"{}\" WHERE \"id\" = $1", table)
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: FieldValue,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        FieldValue::Bool(b) => q.bind(b),
        FieldValue::Int(i) => q.bind(i),
        FieldValue::BigInt(i) => q.bind(i),
        FieldValue::Float(f) => q.bind(f),
        FieldValue::Text(s) => q.bind(s),
        FieldValue::TextArray(a) => q.bind(a),
        FieldValue::Uuid(u) => q.bind(u),
        FieldValue::Date(d) => q.bind(d),
        FieldValue::Timestamp(t) => q.bind(t),
        FieldValue::Json(j) => q.bind(j),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: FieldValue,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        FieldValue::Bool(b) => q.bind(b),
        FieldValue::Int(i) => q.bind(i),
        FieldValue::BigInt(i) => q.bind(i),
        FieldValue::Float(f) => q.bind(f),
        FieldValue::Text(s) => q.bind(s),
        FieldValue::TextArray(a) => q.bind(a),
        FieldValue::Uuid(u) => q.bind(u),
        FieldValue::Date(d) => q.bind(d),
        FieldValue::Timestamp(t) => q.bind(t),
        FieldValue::Json(j) => q.bind(j),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_skips_identity_columns() {
        let sql = update_sql(
            "sites",
            vec![
                ("id", FieldValue::from(uuid::Uuid::nil())),
                ("name", FieldValue::from("HQ")),
                ("created_at", FieldValue::Timestamp(None)),
                ("is_active", FieldValue::Bool(true)),
            ],
        );
        assert_eq!(
            sql.query,
            "UPDATE \"sites\" SET \"name\" = $1, \"is_active\" = $2 WHERE \"id\" = $3 RETURNING *"
        );
        assert_eq!(sql.params.len(), 3);
    }

    #[test]
    fn insert_lists_every_column() {
        let sql = insert_sql("users", vec![("id", FieldValue::Uuid(None)), ("name", FieldValue::from("A"))]);
        assert_eq!(sql.query, "INSERT INTO \"users\" (\"id\", \"name\") VALUES ($1, $2) RETURNING *");
    }
}
