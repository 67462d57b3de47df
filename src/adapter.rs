use crate::error::DbError;
use crate::options::{CountOptions, DeleteOptions, InsertOptions, RetrieveOptions, UpdateOptions};
use crate::record::Record;
use crate::results::{Fetched, Row};

/// Table prefix used when the construction config does not override it.
pub const DEFAULT_PREFIX: &str = "app_";

/// Recognized construction options for an adapter.
///
/// Which fields matter depends on the backend: a server-based backend uses
/// all of them, the SQLite backend uses `database` as the file path and
/// ignores `host`, `user` and `password`. The prefix is fixed for the
/// adapter's lifetime and applied to every logical table name.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub prefix: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            database: String::new(),
            user: String::new(),
            password: String::new(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl AdapterConfig {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// The backend-agnostic CRUD contract.
///
/// Callers hand over a declarative options structure and never construct SQL
/// or see bind-parameter names. Every call is a single autocommit statement;
/// wrapping several calls in one transaction is not provided by this layer.
/// Failures are terminal for the call; there is no internal retry.
pub trait DatabaseAdapter {
    /// Fetch rows matching the options; keyed by the reindex column when one
    /// is set.
    ///
    /// # Errors
    /// `MissingTable` or `InvalidWhereClause` before any SQL runs,
    /// `QueryFailed` for backend failures.
    fn retrieve(&self, options: &RetrieveOptions) -> Result<Fetched<Row>, DbError>;

    /// Count rows matching the options.
    ///
    /// # Errors
    /// Same classes as [`retrieve`](Self::retrieve).
    fn count(&self, options: &CountOptions) -> Result<u64, DbError>;

    /// Insert one record.
    ///
    /// # Errors
    /// `MissingTable`, `MissingPrimaryKey` or `InvalidDataType` before any
    /// SQL runs; `DuplicateKey` when the backend reports a uniqueness
    /// violation; `QueryFailed` otherwise.
    fn insert(&self, data: Record, options: &InsertOptions) -> Result<(), DbError>;

    /// Update rows matching the mandatory WHERE conditions.
    ///
    /// # Errors
    /// `MissingTable`, `MissingWhere` or `InvalidDataType` before any SQL
    /// runs; `QueryFailed` for backend failures.
    fn update(&self, data: Record, options: &UpdateOptions) -> Result<(), DbError>;

    /// Delete rows matching the mandatory WHERE conditions.
    ///
    /// # Errors
    /// `MissingTable` or `MissingWhere` before any SQL runs; `QueryFailed`
    /// for backend failures.
    fn delete(&self, options: &DeleteOptions) -> Result<(), DbError>;
}
