use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::DbError;
use crate::types::DbValue;

/// A flat column-to-value payload for insert and update.
///
/// Insertion order is preserved and becomes the iteration order of the
/// payload in generated SQL. Values must be scalars (or blobs); nesting is
/// rejected at the conversion boundary so the core only ever sees flat
/// mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, DbValue)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any existing value in place.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<DbValue>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(name, _)| *name == column) {
            slot.1 = value;
        } else {
            self.fields.push((column, value));
        }
        self
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<DbValue>) -> Self {
        self.set(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&DbValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DbValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert any serde-serializable value into a flat record.
    ///
    /// This is the single normalization step for "data may be an object or a
    /// mapping": structs, maps, and anything else that serializes to a flat
    /// JSON object are accepted.
    ///
    /// # Errors
    /// Returns `DbError::InvalidDataType` if the value does not serialize to
    /// an object, or if any field is a nested object/array.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Record, DbError> {
        let json =
            serde_json::to_value(value).map_err(|e| DbError::InvalidDataType(e.to_string()))?;
        let JsonValue::Object(map) = json else {
            return Err(DbError::InvalidDataType(
                "data must serialize to a mapping".to_string(),
            ));
        };
        let mut record = Record::new();
        for (column, value) in &map {
            record.set(column.clone(), DbValue::from_json(value)?);
        }
        Ok(record)
    }
}

impl FromIterator<(String, DbValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, DbValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, DbValue);
    type IntoIter = std::vec::IntoIter<(String, DbValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Explicit conversion contract for insert/update payloads.
pub trait IntoRecord {
    /// Convert into a flat record.
    ///
    /// # Errors
    /// Returns `DbError::InvalidDataType` if the payload is not a flat
    /// mapping.
    fn into_record(self) -> Result<Record, DbError>;
}

impl IntoRecord for Record {
    fn into_record(self) -> Result<Record, DbError> {
        Ok(self)
    }
}

impl IntoRecord for &Record {
    fn into_record(self) -> Result<Record, DbError> {
        Ok(self.clone())
    }
}

impl IntoRecord for Vec<(String, DbValue)> {
    fn into_record(self) -> Result<Record, DbError> {
        Ok(self.into_iter().collect())
    }
}

// Map payloads are normalized to sorted key order so the generated SQL is
// deterministic.
impl IntoRecord for HashMap<String, DbValue> {
    fn into_record(self) -> Result<Record, DbError> {
        let mut entries: Vec<(String, DbValue)> = self.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(entries.into_iter().collect())
    }
}

impl IntoRecord for BTreeMap<String, DbValue> {
    fn into_record(self) -> Result<Record, DbError> {
        Ok(self.into_iter().collect())
    }
}
