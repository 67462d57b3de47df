use thiserror::Error;

/// Error taxonomy for the adapter layer.
///
/// Validation errors (`MissingTable`, `MissingPrimaryKey`, `MissingWhere`,
/// `InvalidDataType`, `InvalidWhereClause`) are raised before any statement
/// reaches the backend; `DuplicateKey` and `QueryFailed` are raised after an
/// execution attempt. Nothing is retried or swallowed internally.
#[derive(Debug, Error)]
pub enum DbError {
    /// Operation options omitted the table name.
    #[error("table must be specified")]
    MissingTable,

    /// Insert options omitted the primary key field.
    #[error("primary key must be specified for insert")]
    MissingPrimaryKey,

    /// Update or delete was called without a WHERE condition.
    #[error("a WHERE condition must be specified")]
    MissingWhere,

    /// Insert/update payload is not a flat mapping of scalar values.
    #[error("data must be a flat mapping: {0}")]
    InvalidDataType(String),

    /// A WHERE condition is not a well-formed (column, operator, value) triple.
    #[error("invalid WHERE condition: {0}")]
    InvalidWhereClause(String),

    /// The backend reported a uniqueness/integrity violation during insert.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Any other backend-reported execution failure.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Failed to open the connection or the construction config is unusable.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// The registry has no factory under the requested name.
    #[error("unknown adapter: {0}")]
    UnknownAdapter(String),
}
