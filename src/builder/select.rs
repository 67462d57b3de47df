use std::collections::HashSet;

use crate::error::DbError;
use crate::options::{CountOptions, RetrieveOptions};
use crate::types::DbValue;

use super::where_clause::build_where;
use super::{prefixed_table, push_limit_offset, push_order_by, quote_ident};

/// Assemble a SELECT statement from retrieve options.
///
/// # Errors
/// Returns `DbError::MissingTable` if the table name is empty.
pub fn build_retrieve(
    prefix: &str,
    options: &RetrieveOptions,
) -> Result<(String, Vec<(String, DbValue)>), DbError> {
    let table = prefixed_table(prefix, &options.table)?;
    let fields = match &options.fields {
        None => "*".to_string(),
        Some(columns) => columns
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", "),
    };
    let mut sql = format!("SELECT {fields} FROM {table}");

    let mut binds = Vec::new();
    if !options.conditions.is_empty() {
        let (clause, values) = build_where(&options.conditions, &HashSet::new())?;
        sql.push_str(&clause);
        binds = values;
    }

    push_order_by(&mut sql, options.orderby.as_ref());
    push_limit_offset(&mut sql, options.limit, options.offset);

    Ok((sql, binds))
}

/// Assemble a `SELECT COUNT(*)` statement from count options.
///
/// # Errors
/// Returns `DbError::MissingTable` if the table name is empty.
pub fn build_count(
    prefix: &str,
    options: &CountOptions,
) -> Result<(String, Vec<(String, DbValue)>), DbError> {
    let table = prefixed_table(prefix, &options.table)?;
    let mut sql = format!("SELECT COUNT(*) FROM {table}");

    let mut binds = Vec::new();
    if !options.conditions.is_empty() {
        let (clause, values) = build_where(&options.conditions, &HashSet::new())?;
        sql.push_str(&clause);
        binds = values;
    }

    push_limit_offset(&mut sql, options.limit, options.offset);

    Ok((sql, binds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Condition, OrderBy};

    #[test]
    fn bare_retrieve_selects_all_columns() {
        let (sql, binds) = build_retrieve("app_", &RetrieveOptions::new("items")).unwrap();
        assert_eq!(sql, "SELECT * FROM \"app_items\"");
        assert!(binds.is_empty());
    }

    #[test]
    fn explicit_fields_are_quoted_and_ordered() {
        let options = RetrieveOptions::new("items").fields(["id", "title"]);
        let (sql, _) = build_retrieve("app_", &options).unwrap();
        assert_eq!(sql, "SELECT \"id\", \"title\" FROM \"app_items\"");
    }

    #[test]
    fn full_retrieve_shape() {
        let options = RetrieveOptions::new("items")
            .filter(Condition::eq("status", "published"))
            .order_by(OrderBy::desc("updated"))
            .limit(5)
            .offset(10);
        let (sql, binds) = build_retrieve("app_", &options).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"app_items\" WHERE (\"status\" = :status) \
             ORDER BY \"updated\" DESC LIMIT 5 OFFSET 10"
        );
        assert_eq!(binds, vec![("status".to_string(), DbValue::Text("published".into()))]);
    }

    #[test]
    fn offset_without_limit_uses_no_limit_form() {
        let options = RetrieveOptions::new("items").offset(10);
        let (sql, _) = build_retrieve("app_", &options).unwrap();
        assert_eq!(sql, "SELECT * FROM \"app_items\" LIMIT -1 OFFSET 10");
    }

    #[test]
    fn ascending_order_emits_no_keyword() {
        let options = RetrieveOptions::new("items").order_by(OrderBy::asc("id"));
        let (sql, _) = build_retrieve("app_", &options).unwrap();
        assert_eq!(sql, "SELECT * FROM \"app_items\" ORDER BY \"id\"");
    }

    #[test]
    fn count_shape_matches_retrieve() {
        let options = CountOptions::new("items").filter(Condition::eq("status", "published"));
        let (sql, binds) = build_count("app_", &options).unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM \"app_items\" WHERE (\"status\" = :status)"
        );
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn missing_table_fails_before_assembly() {
        assert!(matches!(
            build_retrieve("app_", &RetrieveOptions::default()),
            Err(DbError::MissingTable)
        ));
        assert!(matches!(
            build_count("app_", &CountOptions::default()),
            Err(DbError::MissingTable)
        ));
    }
}
