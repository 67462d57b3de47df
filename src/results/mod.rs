//! Result shaping: rows keyed by column name and the sequence-or-keyed
//! retrieve result.

mod result_set;
mod row;

pub use result_set::Fetched;
pub use row::Row;
