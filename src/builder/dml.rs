use std::collections::HashSet;

use crate::error::DbError;
use crate::options::{DeleteOptions, InsertOptions, UpdateOptions};
use crate::record::Record;
use crate::types::DbValue;

use super::where_clause::build_where;
use super::{prefixed_table, push_order_by, quote_ident};

/// Assemble an INSERT statement from a flat payload.
///
/// The payload's keys become named binds in their iteration order. The
/// primary key name is validated here but not embedded in the SQL; it exists
/// for error mapping and future key retrieval.
///
/// # Errors
/// `MissingTable` if the table name is empty, `MissingPrimaryKey` if the
/// primary key name is empty, `InvalidDataType` if the payload has no
/// columns.
pub fn build_insert(
    prefix: &str,
    options: &InsertOptions,
    record: &Record,
) -> Result<(String, Vec<(String, DbValue)>), DbError> {
    let table = prefixed_table(prefix, &options.table)?;
    if options.primary.is_empty() {
        return Err(DbError::MissingPrimaryKey);
    }
    if record.is_empty() {
        return Err(DbError::InvalidDataType(
            "insert payload has no columns".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    let mut binds = Vec::with_capacity(record.len());
    for (column, value) in record.iter() {
        columns.push(quote_ident(column));
        placeholders.push(format!(":{column}"));
        binds.push((column.to_string(), value.clone()));
    }

    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok((sql, binds))
}

/// Assemble an UPDATE statement from a flat payload plus mandatory WHERE.
///
/// WHERE binds are disambiguated against the payload's key set so a filtered
/// column can also appear in the assignment list without the two values
/// sharing a bind name.
///
/// # Errors
/// `MissingTable`, `MissingWhere` for an empty condition list,
/// `InvalidDataType` for an empty payload.
pub fn build_update(
    prefix: &str,
    options: &UpdateOptions,
    record: &Record,
) -> Result<(String, Vec<(String, DbValue)>), DbError> {
    let table = prefixed_table(prefix, &options.table)?;
    if options.conditions.is_empty() {
        return Err(DbError::MissingWhere);
    }
    if record.is_empty() {
        return Err(DbError::InvalidDataType(
            "update payload has no columns".to_string(),
        ));
    }

    let mut assignments = Vec::with_capacity(record.len());
    let mut binds = Vec::with_capacity(record.len() + options.conditions.len());
    for (column, value) in record.iter() {
        assignments.push(format!("{} = :{column}", quote_ident(column)));
        binds.push((column.to_string(), value.clone()));
    }
    let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));

    let existing_keys: HashSet<String> = record.keys().map(str::to_string).collect();
    let (clause, where_binds) = build_where(&options.conditions, &existing_keys)?;
    sql.push_str(&clause);
    binds.extend(where_binds);

    push_order_by(&mut sql, options.orderby.as_ref());
    if let Some(limit) = options.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Ok((sql, binds))
}

/// Assemble a DELETE statement. WHERE is mandatory; an unconditional delete
/// is rejected before any SQL exists.
///
/// # Errors
/// `MissingTable`, `MissingWhere` for an empty condition list.
pub fn build_delete(
    prefix: &str,
    options: &DeleteOptions,
) -> Result<(String, Vec<(String, DbValue)>), DbError> {
    let table = prefixed_table(prefix, &options.table)?;
    if options.conditions.is_empty() {
        return Err(DbError::MissingWhere);
    }

    let mut sql = format!("DELETE FROM {table}");
    let (clause, binds) = build_where(&options.conditions, &HashSet::new())?;
    sql.push_str(&clause);

    push_order_by(&mut sql, options.orderby.as_ref());
    if let Some(limit) = options.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Ok((sql, binds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Condition, OrderBy};

    fn payload() -> Record {
        Record::new()
            .with("id", 1i64)
            .with("title", "first")
            .with("status", "draft")
    }

    #[test]
    fn insert_binds_follow_payload_order() {
        let options = InsertOptions::new("items", "id");
        let (sql, binds) = build_insert("app_", &options, &payload()).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"app_items\" (\"id\", \"title\", \"status\") \
             VALUES (:id, :title, :status)"
        );
        let names: Vec<&str> = binds.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["id", "title", "status"]);
    }

    #[test]
    fn insert_requires_primary_key() {
        let options = InsertOptions::new("items", "");
        assert!(matches!(
            build_insert("app_", &options, &payload()),
            Err(DbError::MissingPrimaryKey)
        ));
    }

    #[test]
    fn insert_rejects_empty_payload() {
        let options = InsertOptions::new("items", "id");
        assert!(matches!(
            build_insert("app_", &options, &Record::new()),
            Err(DbError::InvalidDataType(_))
        ));
    }

    #[test]
    fn update_disambiguates_colliding_bind_names() {
        let options = UpdateOptions::new("items").filter(Condition::eq("status", "draft"));
        let record = Record::new().with("status", "published");
        let (sql, binds) = build_update("app_", &options, &record).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"app_items\" SET \"status\" = :status \
             WHERE (\"status\" = :__noconflict_status)"
        );
        // Two different values must never share a bind name.
        assert_eq!(binds.len(), 2);
        assert_ne!(binds[0].0, binds[1].0);
        assert_eq!(binds[0].1, DbValue::Text("published".into()));
        assert_eq!(binds[1].1, DbValue::Text("draft".into()));
    }

    #[test]
    fn update_supports_order_and_limit() {
        let options = UpdateOptions::new("items")
            .filter(Condition::eq("status", "draft"))
            .order_by(OrderBy::desc("updated"))
            .limit(1);
        let record = Record::new().with("title", "renamed");
        let (sql, _) = build_update("app_", &options, &record).unwrap();
        assert!(sql.ends_with(" ORDER BY \"updated\" DESC LIMIT 1"));
    }

    #[test]
    fn update_requires_where() {
        let record = Record::new().with("title", "renamed");
        assert!(matches!(
            build_update("app_", &UpdateOptions::new("items"), &record),
            Err(DbError::MissingWhere)
        ));
    }

    #[test]
    fn delete_requires_where() {
        assert!(matches!(
            build_delete("app_", &DeleteOptions::new("items")),
            Err(DbError::MissingWhere)
        ));
    }

    #[test]
    fn delete_shape() {
        let options = DeleteOptions::new("items")
            .filter(Condition::ne("status", "published"))
            .limit(10);
        let (sql, binds) = build_delete("app_", &options).unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"app_items\" WHERE (\"status\" != :status) LIMIT 10"
        );
        assert_eq!(binds.len(), 1);
    }
}
