//! Pure SQL assembly: the condition builder and one assembly function per
//! operation kind.
//!
//! Builders return `(sql_text, binds)` pairs and never touch a connection.
//! Table and column identifiers are always quoted; values are only ever
//! emitted as named bind parameters, never interpolated into the SQL text.

mod dml;
mod select;
mod where_clause;

pub use dml::{build_delete, build_insert, build_update};
pub use select::{build_count, build_retrieve};
pub use where_clause::{NOCONFLICT_PREFIX, build_where};

use crate::error::DbError;
use crate::options::{Direction, OrderBy};

/// Double-quote an identifier, doubling any embedded quotes.
///
/// Identifiers come from trusted config, not user input; quoting is still
/// applied to every table and column name.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Apply the table prefix (exactly once, at assembly entry) and quote the
/// result as a single identifier.
pub(crate) fn prefixed_table(prefix: &str, table: &str) -> Result<String, DbError> {
    if table.is_empty() {
        return Err(DbError::MissingTable);
    }
    Ok(quote_ident(&format!("{prefix}{table}")))
}

pub(crate) fn push_order_by(sql: &mut String, orderby: Option<&OrderBy>) {
    if let Some(orderby) = orderby {
        if orderby.key.is_empty() {
            return;
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&quote_ident(&orderby.key));
        if orderby.direction == Direction::Desc {
            sql.push_str(" DESC");
        }
    }
}

/// Pagination for retrieve/count.
///
/// An offset without a limit uses `LIMIT -1`, SQLite's "no limit" form, so
/// the engine still accepts the OFFSET clause and every row from the offset
/// onward is returned.
pub(crate) fn push_limit_offset(sql: &mut String, limit: Option<u64>, offset: u64) {
    match (limit, offset) {
        (Some(limit), 0) => sql.push_str(&format!(" LIMIT {limit}")),
        (Some(limit), offset) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (None, 0) => {}
        (None, offset) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_ident("plain"), "\"plain\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            prefixed_table("app_", ""),
            Err(DbError::MissingTable)
        ));
    }

    #[test]
    fn prefix_is_applied_once() {
        assert_eq!(prefixed_table("app_", "items").unwrap(), "\"app_items\"");
        assert_eq!(prefixed_table("", "items").unwrap(), "\"items\"");
    }
}
