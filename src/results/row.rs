use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::types::DbValue;

/// One fetched row: its values plus the result set's column names.
///
/// Column names are behind an `Arc` so every row of a result set shares one
/// allocation, and name lookups go through a prebuilt index map.
#[derive(Debug, Clone)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    values: Vec<DbValue>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

/// Map each column name to its position. A duplicated name resolves to its
/// last position.
fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    let mut cache = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        cache.insert(name.clone(), i);
    }
    cache
}

impl Row {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<DbValue>) -> Self {
        let column_index_cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.column_names
    }

    /// Position of a named column, if the result set has one.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Value of a named column, `None` when the column is absent.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&DbValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }

    /// JSON object view of the row, used for materialization into caller
    /// shapes.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = JsonMap::with_capacity(self.column_names.len());
        for (name, value) in self.column_names.iter().zip(&self.values) {
            map.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(
            Arc::new(vec!["id".to_string(), "title".to_string()]),
            vec![DbValue::Int(1), DbValue::Text("first".into())],
        )
    }

    #[test]
    fn lookup_by_name_and_index_agree() {
        let row = sample();
        assert_eq!(row.get("id"), row.get_by_index(0));
        assert_eq!(row.get("title"), row.get_by_index(1));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_column_index("missing"), None);
    }

    #[test]
    fn name_lookup_covers_every_column() {
        let row = sample();
        for (i, name) in row.columns().to_vec().iter().enumerate() {
            assert_eq!(row.get_column_index(name), Some(i));
        }
    }

    #[test]
    fn json_view_carries_all_columns() {
        let json = sample().to_json();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "first");
    }
}
