use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{Connection, ToSql};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::adapter::{AdapterConfig, DatabaseAdapter};
use crate::builder::{build_count, build_delete, build_insert, build_retrieve, build_update};
use crate::error::DbError;
use crate::options::{CountOptions, DeleteOptions, InsertOptions, RetrieveOptions, UpdateOptions};
use crate::record::{IntoRecord, Record};
use crate::results::{Fetched, Row};
use crate::types::DbValue;

/// SQLite implementation of the adapter contract.
///
/// Owns one `rusqlite::Connection` and the configured table prefix for its
/// lifetime. A single instance serves one caller at a time: every operation
/// blocks until SQLite responds, and there is no internal locking, timeout
/// or retry. Hosts that need concurrency should give each worker its own
/// adapter instance rather than sharing one.
pub struct SqliteAdapter {
    conn: Connection,
    prefix: String,
}

impl SqliteAdapter {
    /// Open a database from the construction config.
    ///
    /// `database` is the file path (`:memory:` works); `host`, `user` and
    /// `password` are ignored by this file-based backend.
    ///
    /// # Errors
    /// Returns `DbError::ConnectionError` if the path is empty or the
    /// database cannot be opened.
    pub fn open(config: &AdapterConfig) -> Result<Self, DbError> {
        if config.database.is_empty() {
            return Err(DbError::ConnectionError(
                "database path must be specified".to_string(),
            ));
        }
        let conn = Connection::open(&config.database)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            prefix: config.prefix.clone(),
        })
    }

    /// Open an in-memory database with the given prefix.
    ///
    /// # Errors
    /// Returns `DbError::ConnectionError` if SQLite fails to initialize.
    pub fn open_in_memory(prefix: impl Into<String>) -> Result<Self, DbError> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            prefix: prefix.into(),
        })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run a batch of raw statements (schema setup and the like). No
    /// parameters, no prefixing.
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` on any backend failure.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::QueryFailed(e.to_string()))
    }

    /// Retrieve and materialize rows into a caller shape in one step.
    ///
    /// # Errors
    /// Same classes as [`DatabaseAdapter::retrieve`], plus
    /// `InvalidDataType` if a row does not fit `T`.
    pub fn retrieve_as<T: DeserializeOwned>(
        &self,
        options: &RetrieveOptions,
    ) -> Result<Fetched<T>, DbError> {
        self.retrieve(options)?.materialize()
    }

    /// Insert any payload accepted by the [`IntoRecord`] conversion
    /// contract.
    ///
    /// # Errors
    /// Same classes as [`DatabaseAdapter::insert`].
    pub fn insert_data(
        &self,
        data: impl IntoRecord,
        options: &InsertOptions,
    ) -> Result<(), DbError> {
        self.insert(data.into_record()?, options)
    }

    /// Update with any payload accepted by the [`IntoRecord`] conversion
    /// contract.
    ///
    /// # Errors
    /// Same classes as [`DatabaseAdapter::update`].
    pub fn update_data(
        &self,
        data: impl IntoRecord,
        options: &UpdateOptions,
    ) -> Result<(), DbError> {
        self.update(data.into_record()?, options)
    }

    fn query_rows(&self, sql: &str, binds: &[(String, DbValue)]) -> Result<Vec<Row>, DbError> {
        debug!(sql, binds = binds.len(), "executing select");
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;
        let column_names: Arc<Vec<String>> = Arc::new(
            stmt.column_names()
                .iter()
                .map(ToString::to_string)
                .collect(),
        );

        let params = convert_binds(binds);
        let param_refs: Vec<(&str, &dyn ToSql)> = params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let mut rows = stmt
            .query(&param_refs[..])
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DbError::QueryFailed(e.to_string()))?
        {
            let mut values = Vec::with_capacity(column_names.len());
            for idx in 0..column_names.len() {
                values.push(extract_value(row, idx)?);
            }
            results.push(Row::new(Arc::clone(&column_names), values));
        }
        Ok(results)
    }

    fn execute(
        &self,
        sql: &str,
        binds: &[(String, DbValue)],
        map_duplicate: bool,
    ) -> Result<usize, DbError> {
        debug!(sql, binds = binds.len(), "executing dml");
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let params = convert_binds(binds);
        let param_refs: Vec<(&str, &dyn ToSql)> = params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        stmt.execute(&param_refs[..])
            .map_err(|e| classify_execute_error(&e, map_duplicate))
    }
}

impl DatabaseAdapter for SqliteAdapter {
    fn retrieve(&self, options: &RetrieveOptions) -> Result<Fetched<Row>, DbError> {
        let (sql, binds) = build_retrieve(&self.prefix, options)?;
        let rows = self.query_rows(&sql, &binds)?;

        match &options.reindex {
            None => Ok(Fetched::Rows(rows)),
            Some(column) => {
                let mut keyed = HashMap::with_capacity(rows.len());
                for row in rows {
                    let key = row
                        .get(column)
                        .ok_or_else(|| {
                            DbError::QueryFailed(format!(
                                "reindex column `{column}` is missing from the result"
                            ))
                        })?
                        .to_key_string();
                    // Duplicate keys: the last row wins.
                    keyed.insert(key, row);
                }
                Ok(Fetched::Keyed(keyed))
            }
        }
    }

    fn count(&self, options: &CountOptions) -> Result<u64, DbError> {
        let (sql, binds) = build_count(&self.prefix, options)?;
        let rows = self.query_rows(&sql, &binds)?;
        let scalar = rows
            .first()
            .and_then(|row| row.get_by_index(0))
            .and_then(|value| value.as_int().copied())
            .ok_or_else(|| DbError::QueryFailed("count returned no scalar".to_string()))?;
        u64::try_from(scalar)
            .map_err(|_| DbError::QueryFailed(format!("negative count `{scalar}`")))
    }

    fn insert(&self, data: Record, options: &InsertOptions) -> Result<(), DbError> {
        let (sql, binds) = build_insert(&self.prefix, options, &data)?;
        self.execute(&sql, &binds, true)?;
        Ok(())
    }

    fn update(&self, data: Record, options: &UpdateOptions) -> Result<(), DbError> {
        let (sql, binds) = build_update(&self.prefix, options, &data)?;
        self.execute(&sql, &binds, false)?;
        Ok(())
    }

    fn delete(&self, options: &DeleteOptions) -> Result<(), DbError> {
        let (sql, binds) = build_delete(&self.prefix, options)?;
        self.execute(&sql, &binds, false)?;
        Ok(())
    }
}

/// Bind middleware values to SQLite types, attaching the `:` marker expected
/// by the driver's named-parameter API.
fn convert_binds(binds: &[(String, DbValue)]) -> Vec<(String, SqliteValue)> {
    binds
        .iter()
        .map(|(name, value)| (format!(":{name}"), convert_value(value)))
        .collect()
}

fn convert_value(value: &DbValue) -> SqliteValue {
    match value {
        DbValue::Int(i) => SqliteValue::Integer(*i),
        DbValue::Float(f) => SqliteValue::Real(*f),
        DbValue::Text(s) => SqliteValue::Text(s.clone()),
        DbValue::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        DbValue::Timestamp(dt) => SqliteValue::Text(dt.format("%F %T%.f").to_string()),
        DbValue::Null => SqliteValue::Null,
        DbValue::Blob(bytes) => SqliteValue::Blob(bytes.clone()),
    }
}

fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<DbValue, DbError> {
    match row.get_ref(idx) {
        Err(e) => Err(DbError::QueryFailed(e.to_string())),
        Ok(ValueRef::Null) => Ok(DbValue::Null),
        Ok(ValueRef::Integer(i)) => Ok(DbValue::Int(i)),
        Ok(ValueRef::Real(f)) => Ok(DbValue::Float(f)),
        Ok(ValueRef::Text(bytes)) => Ok(DbValue::Text(String::from_utf8_lossy(bytes).into_owned())),
        Ok(ValueRef::Blob(bytes)) => Ok(DbValue::Blob(bytes.to_vec())),
    }
}

/// Map a driver error to the adapter taxonomy. The constraint-violation
/// class becomes `DuplicateKey` only on the insert path; everything else
/// surfaces as `QueryFailed` with the backend's diagnostic text.
fn classify_execute_error(err: &rusqlite::Error, map_duplicate: bool) -> DbError {
    if map_duplicate {
        if let rusqlite::Error::SqliteFailure(code, message) = err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                return DbError::DuplicateKey(
                    message.clone().unwrap_or_else(|| code.to_string()),
                );
            }
        }
    }
    DbError::QueryFailed(err.to_string())
}
