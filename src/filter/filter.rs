use super::error::FilterError;
use super::filter_order::{lookup, FilterOrder};
use super::types::{FieldValue, FilterOrderInfo, FilterWhereInfo, SqlResult};

/// Conditions, ordering and paging for a single-table query. The same filter
/// renders to parameterized SQL for Postgres and evaluates against rows held
/// in memory.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    order_error: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(FilterWhereInfo {
            column: column.to_string(),
            data: value.into(),
        });
        self
    }

    /// Adds an equality condition only when a value is present.
    pub fn where_opt<V: Into<FieldValue>>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.where_eq(column, v),
            None => self,
        }
    }

    pub fn order(mut self, spec: &str) -> Self {
        match FilterOrder::parse_order_string(spec) {
            Ok(infos) => self.order_data = infos,
            Err(e) => self.order_error = Some(e.to_string()),
        }
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Applies 1-based page numbering on top of `limit`. Pages past the end
    /// saturate the offset and select nothing.
    pub fn page(self, page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        self.limit(per_page).offset((page - 1).saturating_mul(per_page))
    }

    pub fn to_sql(&self, table: &str) -> Result<SqlResult, FilterError> {
        validate_identifier(table).map_err(|_| FilterError::InvalidTableName(table.to_string()))?;
        let (where_clause, params) = self.build_where()?;
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.build_limit_clause()?;

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", table),
            where_clause,
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self, table: &str) -> Result<SqlResult, FilterError> {
        validate_identifier(table).map_err(|_| FilterError::InvalidTableName(table.to_string()))?;
        let (where_clause, params) = self.build_where()?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", table)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" {}", table, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    /// Evaluates the conditions against a row's column values.
    pub fn matches(&self, fields: &[(&'static str, FieldValue)]) -> bool {
        self.conditions.iter().all(|cond| match lookup(fields, &cond.column) {
            Some(v) => v == &cond.data || (v.is_null() && cond.data.is_null()),
            None => cond.data.is_null(),
        })
    }

    /// Filters, sorts and pages rows held in memory.
    pub fn apply<T>(&self, rows: Vec<(T, Vec<(&'static str, FieldValue)>)>) -> Vec<T> {
        let mut rows: Vec<_> = rows.into_iter().filter(|(_, fields)| self.matches(fields)).collect();
        rows.sort_by(|(_, a), (_, b)| FilterOrder::compare(&self.order_data, a, b));
        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let limit = self.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        rows.into_iter().skip(offset).take(limit).map(|(row, _)| row).collect()
    }

    fn build_where(&self) -> Result<(String, Vec<FieldValue>), FilterError> {
        if let Some(ref e) = self.order_error {
            return Err(FilterError::InvalidSort(e.clone()));
        }
        if self.conditions.is_empty() {
            return Ok((String::new(), vec![]));
        }
        let mut params = Vec::new();
        let mut parts = Vec::new();
        for cond in &self.conditions {
            validate_identifier(&cond.column)?;
            if cond.data.is_null() {
                parts.push(format!("\"{}\" IS NULL", cond.column));
            } else {
                params.push(cond.data.clone());
                parts.push(format!("\"{}\" = ${}", cond.column, params.len()));
            }
        }
        Ok((format!("WHERE {}", parts.join(" AND ")), params))
    }

    fn build_limit_clause(&self) -> Result<String, FilterError> {
        if let Some(l) = self.limit {
            if l < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        }
        if let Some(o) = self.offset {
            if o < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); }
        }
        Ok(match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            _ => String::new(),
        })
    }
}

pub(crate) fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
    }
    Ok(())
}
