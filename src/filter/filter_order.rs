use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FieldValue, FilterOrderInfo, SortDirection};
use super::filter::validate_identifier;

pub struct FilterOrder;

impl FilterOrder {
    /// Parses `"display_order asc, created_at desc"` into order entries.
    pub fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                validate_identifier(col)?;
                let sort = match it.next() {
                    None => SortDirection::Asc,
                    Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                    Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                    Some(other) => return Err(FilterError::InvalidSort(format!("{} {}", col, other))),
                };
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    /// Compares two rows the way the generated ORDER BY would.
    pub fn compare(
        infos: &[FilterOrderInfo],
        a: &[(&'static str, FieldValue)],
        b: &[(&'static str, FieldValue)],
    ) -> Ordering {
        for info in infos {
            let left = lookup(a, &info.column);
            let right = lookup(b, &info.column);
            let ord = match (left, right) {
                (Some(l), Some(r)) => l.compare(r),
                _ => Ordering::Equal,
            };
            let ord = match info.sort {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

pub(crate) fn lookup<'a>(fields: &'a [(&'static str, FieldValue)], column: &str) -> Option<&'a FieldValue> {
    fields.iter().find(|(name, _)| *name == column).map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_column_order() {
        let infos = FilterOrder::parse_order_string("display_order asc, created_at DESC").unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1].sort, SortDirection::Desc);
        assert_eq!(
            FilterOrder::generate(&infos),
            "ORDER BY \"display_order\" ASC, \"created_at\" DESC"
        );
    }

    #[test]
    fn rejects_injected_column() {
        assert!(FilterOrder::parse_order_string("name; drop table users").is_err());
        assert!(matches!(
            FilterOrder::parse_order_string("name sideways"),
            Err(FilterError::InvalidSort(_))
        ));
    }

    #[test]
    fn compare_breaks_ties_with_second_column() {
        let infos = FilterOrder::parse_order_string("display_order asc, name desc").unwrap();
        let a = vec![("display_order", FieldValue::Int(1)), ("name", FieldValue::from("alpha"))];
        let b = vec![("display_order", FieldValue::Int(1)), ("name", FieldValue::from("beta"))];
        assert_eq!(FilterOrder::compare(&infos, &a, &b), Ordering::Greater);
    }
}
