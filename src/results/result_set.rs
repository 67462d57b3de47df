use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::DbError;

use super::row::Row;

/// The result of a retrieve: an ordered sequence of rows, or, when a
/// reindex column was requested, a mapping keyed by that column's value.
///
/// If the reindex column is not unique across rows, later rows silently
/// overwrite earlier ones in the keyed form. This mirrors the behavior the
/// layer has always had and is documented rather than corrected.
#[derive(Debug, Clone)]
pub enum Fetched<T = Row> {
    /// Rows in backend order.
    Rows(Vec<T>),
    /// Rows keyed by the reindex column's value (last write wins).
    Keyed(HashMap<String, T>),
}

impl<T> Fetched<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Fetched::Rows(rows) => rows.len(),
            Fetched::Keyed(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the ordered rows, or None for the keyed form.
    #[must_use]
    pub fn rows(&self) -> Option<&[T]> {
        match self {
            Fetched::Rows(rows) => Some(rows),
            Fetched::Keyed(_) => None,
        }
    }

    /// Consume into a plain vector. The keyed form loses its keys and the
    /// ordering is unspecified.
    #[must_use]
    pub fn into_rows(self) -> Vec<T> {
        match self {
            Fetched::Rows(rows) => rows,
            Fetched::Keyed(map) => map.into_values().collect(),
        }
    }

    /// Consume into the keyed mapping, or None for the sequence form.
    #[must_use]
    pub fn into_keyed(self) -> Option<HashMap<String, T>> {
        match self {
            Fetched::Rows(_) => None,
            Fetched::Keyed(map) => Some(map),
        }
    }
}

impl Fetched<Row> {
    /// Materialize each row into a caller-supplied shape.
    ///
    /// The shape descriptor is the target's `Deserialize` impl; every row is
    /// copied field-by-field through a JSON object, so no constructor or
    /// setter magic is involved.
    ///
    /// # Errors
    /// Returns `DbError::InvalidDataType` if a row cannot be deserialized
    /// into `T`.
    pub fn materialize<T: DeserializeOwned>(self) -> Result<Fetched<T>, DbError> {
        match self {
            Fetched::Rows(rows) => rows
                .into_iter()
                .map(|row| from_row(&row))
                .collect::<Result<Vec<T>, DbError>>()
                .map(Fetched::Rows),
            Fetched::Keyed(map) => map
                .into_iter()
                .map(|(key, row)| Ok((key, from_row(&row)?)))
                .collect::<Result<HashMap<String, T>, DbError>>()
                .map(Fetched::Keyed),
        }
    }
}

fn from_row<T: DeserializeOwned>(row: &Row) -> Result<T, DbError> {
    serde_json::from_value(row.to_json())
        .map_err(|e| DbError::InvalidDataType(format!("cannot materialize row: {e}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::Deserialize;

    use super::*;
    use crate::types::DbValue;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        title: String,
    }

    fn row(id: i64, title: &str) -> Row {
        Row::new(
            Arc::new(vec!["id".to_string(), "title".to_string()]),
            vec![DbValue::Int(id), DbValue::Text(title.into())],
        )
    }

    #[test]
    fn materialize_rows() {
        let fetched = Fetched::Rows(vec![row(1, "first"), row(2, "second")]);
        let items = fetched.materialize::<Item>().unwrap().into_rows();
        assert_eq!(
            items,
            vec![
                Item {
                    id: 1,
                    title: "first".into()
                },
                Item {
                    id: 2,
                    title: "second".into()
                },
            ]
        );
    }

    #[test]
    fn materialize_keyed_preserves_keys() {
        let mut map = HashMap::new();
        map.insert("1".to_string(), row(1, "first"));
        let keyed = Fetched::Keyed(map)
            .materialize::<Item>()
            .unwrap()
            .into_keyed()
            .unwrap();
        assert_eq!(keyed["1"].title, "first");
    }

    #[test]
    fn materialize_shape_mismatch_is_invalid_data() {
        #[derive(Debug, Deserialize)]
        struct Wrong {
            #[allow(dead_code)]
            missing: String,
        }
        let fetched = Fetched::Rows(vec![row(1, "first")]);
        assert!(matches!(
            fetched.materialize::<Wrong>(),
            Err(DbError::InvalidDataType(_))
        ));
    }
}
