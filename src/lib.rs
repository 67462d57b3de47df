//! Backend-agnostic CRUD adapter that turns a declarative options structure
//! into parameterized SQL.
//!
//! Callers describe what they want (table, fields, AND-combined filter
//! conditions, ordering, pagination) and the adapter assembles the
//! statement, binds every value as a named parameter, executes it and shapes
//! the result. No caller ever writes SQL or sees a bind name.
//!
//! ```rust
//! use db_adapter::prelude::*;
//!
//! fn main() -> Result<(), DbError> {
//!     let adapter = SqliteAdapter::open_in_memory("app_")?;
//!     adapter.execute_batch(
//!         "CREATE TABLE app_items (id INTEGER PRIMARY KEY, title TEXT, status TEXT);",
//!     )?;
//!
//!     let record = Record::new()
//!         .with("id", 1i64)
//!         .with("title", "hello")
//!         .with("status", "published");
//!     adapter.insert(record, &InsertOptions::new("items", "id"))?;
//!
//!     let fetched = adapter.retrieve(
//!         &RetrieveOptions::new("items").filter(Condition::eq("status", "published")),
//!     )?;
//!     assert_eq!(fetched.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! One adapter instance owns one connection and serves one caller at a time;
//! concurrency belongs to the host (one adapter per worker), not this layer.

pub mod adapter;
pub mod builder;
pub mod error;
pub mod options;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod results;
pub mod sqlite;
pub mod types;

pub use adapter::{AdapterConfig, DatabaseAdapter};
pub use error::DbError;
