use std::collections::HashSet;

use crate::error::DbError;
use crate::options::Condition;
use crate::types::DbValue;

use super::quote_ident;

/// Marker prepended to a bind name when the condition's column collides with
/// a key already reserved by the caller's payload.
pub const NOCONFLICT_PREFIX: &str = "__noconflict_";

/// Translate an AND-combined condition list into a WHERE clause plus binds.
///
/// The clause has the shape ` WHERE ("c1" = :c1 AND "c2" != :c2)`. Each
/// condition contributes exactly one bind; the bind name is the column name
/// unless that name is taken by `existing_keys` (the update payload's
/// columns) or an earlier condition, in which case it is disambiguated.
///
/// # Errors
/// Returns `DbError::InvalidWhereClause` if the condition list is empty;
/// silently omitting a requested filter is never acceptable.
pub fn build_where(
    conditions: &[Condition],
    existing_keys: &HashSet<String>,
) -> Result<(String, Vec<(String, DbValue)>), DbError> {
    if conditions.is_empty() {
        return Err(DbError::InvalidWhereClause(
            "condition list is empty".to_string(),
        ));
    }

    let mut clause = String::from(" WHERE (");
    let mut binds: Vec<(String, DbValue)> = Vec::with_capacity(conditions.len());
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            clause.push_str(" AND ");
        }
        let bind_name = unique_bind_name(&condition.column, existing_keys, &binds);
        clause.push_str(&quote_ident(&condition.column));
        clause.push(' ');
        clause.push_str(condition.op.as_sql());
        clause.push_str(" :");
        clause.push_str(&bind_name);
        binds.push((bind_name, condition.value.clone()));
    }
    clause.push(')');

    Ok((clause, binds))
}

/// Pick a bind name that collides with neither the payload's keys nor a
/// previously chosen bind.
fn unique_bind_name(
    column: &str,
    existing_keys: &HashSet<String>,
    binds: &[(String, DbValue)],
) -> String {
    let taken =
        |name: &str| existing_keys.contains(name) || binds.iter().any(|(bound, _)| bound == name);

    if !taken(column) {
        return column.to_string();
    }
    let marked = format!("{NOCONFLICT_PREFIX}{column}");
    if !taken(&marked) {
        return marked;
    }
    // Repeated conditions on one column: number the survivors.
    let mut n = 2usize;
    loop {
        let candidate = format!("{marked}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
