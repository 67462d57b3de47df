use crate::error::DbError;
use crate::types::DbValue;

/// Comparison operator for a WHERE condition.
///
/// Conditions are AND-combined; OR and grouping are intentionally not
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
}

impl CompareOp {
    /// Normalize a source operator symbol.
    ///
    /// `=`, `==` and `===` all mean equality; `!=` and `!==` mean inequality.
    ///
    /// # Errors
    /// Returns `DbError::InvalidWhereClause` for any other symbol.
    pub fn parse(symbol: &str) -> Result<Self, DbError> {
        match symbol {
            "=" | "==" | "===" => Ok(CompareOp::Eq),
            "!=" | "!==" => Ok(CompareOp::Ne),
            other => Err(DbError::InvalidWhereClause(format!(
                "unsupported operator `{other}`"
            ))),
        }
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
        }
    }
}

/// One (column, operator, value) filter triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub value: DbValue,
}

impl Condition {
    /// Build a condition from a raw triple, normalizing the operator symbol.
    ///
    /// # Errors
    /// Returns `DbError::InvalidWhereClause` if the operator symbol is not
    /// recognized.
    pub fn new(
        column: impl Into<String>,
        op_symbol: &str,
        value: impl Into<DbValue>,
    ) -> Result<Self, DbError> {
        Ok(Self {
            column: column.into(),
            op: CompareOp::parse(op_symbol)?,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<DbValue>) -> Self {
        Self {
            column: column.into(),
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn ne(column: impl Into<String>, value: impl Into<DbValue>) -> Self {
        Self {
            column: column.into(),
            op: CompareOp::Ne,
            value: value.into(),
        }
    }
}

/// Sort direction; ascending emits no keyword, descending emits `DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// ORDER BY clause: a key column and a direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub key: String,
    pub direction: Direction,
}

impl OrderBy {
    #[must_use]
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: Direction::Desc,
        }
    }
}

/// Options for `retrieve`.
///
/// `conditions` is the ordered WHERE list; `reindex` re-keys the result by
/// that column's value instead of a positional index.
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    pub table: String,
    /// `None` means all columns (`*`).
    pub fields: Option<Vec<String>>,
    pub conditions: Vec<Condition>,
    pub orderby: Option<OrderBy>,
    pub limit: Option<u64>,
    pub offset: u64,
    pub reindex: Option<String>,
}

impl RetrieveOptions {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Append one WHERE condition (AND-combined with its peers).
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, orderby: OrderBy) -> Self {
        self.orderby = Some(orderby);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn reindex(mut self, column: impl Into<String>) -> Self {
        self.reindex = Some(column.into());
        self
    }
}

/// Options for `count`.
#[derive(Debug, Clone, Default)]
pub struct CountOptions {
    pub table: String,
    pub conditions: Vec<Condition>,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl CountOptions {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

/// Options for `insert`.
///
/// The primary key name is required for error mapping and future key
/// retrieval; it is not embedded in the generated SQL.
#[derive(Debug, Clone, Default)]
pub struct InsertOptions {
    pub table: String,
    pub primary: String,
}

impl InsertOptions {
    #[must_use]
    pub fn new(table: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary: primary.into(),
        }
    }
}

/// Options for `update`. A WHERE condition is mandatory.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub table: String,
    pub conditions: Vec<Condition>,
    pub orderby: Option<OrderBy>,
    /// Single-table update limit; no offset.
    pub limit: Option<u64>,
}

impl UpdateOptions {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, orderby: OrderBy) -> Self {
        self.orderby = Some(orderby);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for `delete`. A WHERE condition is mandatory; unconditional
/// deletes are rejected.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub table: String,
    pub conditions: Vec<Condition>,
    pub orderby: Option<OrderBy>,
    pub limit: Option<u64>,
}

impl DeleteOptions {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, orderby: OrderBy) -> Self {
        self.orderby = Some(orderby);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_symbols_normalize() {
        for symbol in ["=", "==", "==="] {
            assert_eq!(CompareOp::parse(symbol).unwrap(), CompareOp::Eq);
        }
        for symbol in ["!=", "!=="] {
            assert_eq!(CompareOp::parse(symbol).unwrap(), CompareOp::Ne);
        }
    }

    #[test]
    fn unknown_operator_is_rejected() {
        for symbol in ["<", ">", "LIKE", ""] {
            assert!(matches!(
                CompareOp::parse(symbol),
                Err(DbError::InvalidWhereClause(_))
            ));
        }
    }
}
