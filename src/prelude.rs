//! Convenient imports for common functionality.

pub use crate::adapter::{AdapterConfig, DEFAULT_PREFIX, DatabaseAdapter};
pub use crate::error::DbError;
pub use crate::options::{
    CompareOp, Condition, CountOptions, DeleteOptions, Direction, InsertOptions, OrderBy,
    RetrieveOptions, UpdateOptions,
};
pub use crate::record::{IntoRecord, Record};
pub use crate::registry::AdapterRegistry;
pub use crate::results::{Fetched, Row};
pub use crate::sqlite::SqliteAdapter;
pub use crate::types::DbValue;
