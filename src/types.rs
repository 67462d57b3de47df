use chrono::NaiveDateTime;
use serde_json::{Number, Value as JsonValue};

use crate::error::DbError;

/// A scalar as the adapter sees it: condition values, payload fields and
/// result cells all carry this type, so nothing outside `sqlite.rs` touches
/// a driver type.
///
/// ```rust
/// use db_adapter::types::DbValue;
///
/// let status = DbValue::from("published");
/// assert_eq!(status.as_text(), Some("published"));
/// assert!(DbValue::from(None::<i64>).is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Null,
    Blob(Vec<u8>),
}

/// Text layouts accepted when reading a timestamp out of a text cell.
const TIMESTAMP_LAYOUTS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S.%3f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

impl DbValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        match self {
            DbValue::Int(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DbValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// SQLite stores booleans as integers, so `Int(0)` and `Int(1)` count.
    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        match self {
            DbValue::Bool(value) => Some(value),
            DbValue::Int(0) => Some(&false),
            DbValue::Int(1) => Some(&true),
            _ => None,
        }
    }

    /// Timestamps come back from the backend as text; any of the layouts the
    /// adapter writes (or ISO-8601 with a `T`) parse here.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            DbValue::Timestamp(value) => Some(*value),
            DbValue::Text(s) => TIMESTAMP_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DbValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            DbValue::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// JSON representation used when materializing rows into caller shapes.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            DbValue::Int(i) => JsonValue::Number((*i).into()),
            DbValue::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            DbValue::Text(s) => JsonValue::String(s.clone()),
            DbValue::Bool(b) => JsonValue::Bool(*b),
            DbValue::Timestamp(dt) => {
                JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            DbValue::Null => JsonValue::Null,
            DbValue::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::Number((*b).into())).collect())
            }
        }
    }

    /// Convert a JSON scalar into a `DbValue`.
    ///
    /// Arrays of bytes become blobs; anything nested is rejected because
    /// payloads must be flat mappings.
    ///
    /// # Errors
    /// Returns `DbError::InvalidDataType` for objects and non-byte arrays.
    pub fn from_json(value: &JsonValue) -> Result<DbValue, DbError> {
        match value {
            JsonValue::Null => Ok(DbValue::Null),
            JsonValue::Bool(b) => Ok(DbValue::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(DbValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(DbValue::Float(f))
                } else {
                    Err(DbError::InvalidDataType(format!(
                        "unrepresentable number `{n}`"
                    )))
                }
            }
            JsonValue::String(s) => Ok(DbValue::Text(s.clone())),
            JsonValue::Array(items) => {
                let mut bytes = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_u64() {
                        Some(b) if b <= u64::from(u8::MAX) => bytes.push(b as u8),
                        _ => {
                            return Err(DbError::InvalidDataType(
                                "nested values are not supported".to_string(),
                            ));
                        }
                    }
                }
                Ok(DbValue::Blob(bytes))
            }
            JsonValue::Object(_) => Err(DbError::InvalidDataType(
                "nested values are not supported".to_string(),
            )),
        }
    }

    /// Text rendering used when re-keying a result set by a column's value.
    pub(crate) fn to_key_string(&self) -> String {
        match self {
            DbValue::Int(i) => i.to_string(),
            DbValue::Float(f) => f.to_string(),
            DbValue::Text(s) => s.clone(),
            DbValue::Bool(b) => i64::from(*b).to_string(),
            DbValue::Timestamp(dt) => dt.format("%F %T%.f").to_string(),
            DbValue::Null => String::new(),
            DbValue::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl From<i64> for DbValue {
    fn from(value: i64) -> Self {
        DbValue::Int(value)
    }
}

impl From<i32> for DbValue {
    fn from(value: i32) -> Self {
        DbValue::Int(i64::from(value))
    }
}

impl From<f64> for DbValue {
    fn from(value: f64) -> Self {
        DbValue::Float(value)
    }
}

impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        DbValue::Text(value.to_string())
    }
}

impl From<String> for DbValue {
    fn from(value: String) -> Self {
        DbValue::Text(value)
    }
}

impl From<bool> for DbValue {
    fn from(value: bool) -> Self {
        DbValue::Bool(value)
    }
}

impl From<NaiveDateTime> for DbValue {
    fn from(value: NaiveDateTime) -> Self {
        DbValue::Timestamp(value)
    }
}

impl From<Vec<u8>> for DbValue {
    fn from(value: Vec<u8>) -> Self {
        DbValue::Blob(value)
    }
}

impl<T> From<Option<T>> for DbValue
where
    T: Into<DbValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(DbValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_match_only_their_own_variant() {
        assert_eq!(DbValue::Int(7).as_int(), Some(&7));
        assert_eq!(DbValue::Text("7".into()).as_int(), None);
        assert_eq!(DbValue::Text("draft".into()).as_text(), Some("draft"));
        assert_eq!(DbValue::Int(0).as_text(), None);
        assert_eq!(DbValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(DbValue::Int(1).as_float(), None);
        assert_eq!(DbValue::Blob(vec![0xde, 0xad]).as_blob(), Some(&[0xde, 0xad][..]));
        assert_eq!(DbValue::Text("dead".into()).as_blob(), None);
        assert!(DbValue::Null.is_null());
        assert!(!DbValue::Int(0).is_null());
    }

    #[test]
    fn bool_accessor_accepts_integer_encoding() {
        assert_eq!(DbValue::Int(1).as_bool(), Some(&true));
        assert_eq!(DbValue::Int(0).as_bool(), Some(&false));
        assert_eq!(DbValue::Int(2).as_bool(), None);
    }

    #[test]
    fn from_json_rejects_nested_values() {
        assert!(matches!(
            DbValue::from_json(&json!({"inner": 1})),
            Err(DbError::InvalidDataType(_))
        ));
        assert!(matches!(
            DbValue::from_json(&json!(["a", "b"])),
            Err(DbError::InvalidDataType(_))
        ));
    }

    #[test]
    fn from_json_byte_array_becomes_blob() {
        let value = DbValue::from_json(&json!([1, 2, 255])).unwrap();
        assert_eq!(value, DbValue::Blob(vec![1, 2, 255]));
    }

    #[test]
    fn timestamp_accessor_parses_text_fallbacks() {
        let expected =
            NaiveDateTime::parse_from_str("2024-01-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            DbValue::Text("2024-01-01 08:00:00".into()).as_timestamp(),
            Some(expected)
        );
        assert_eq!(
            DbValue::Text("2024-01-01T08:00:00".into()).as_timestamp(),
            Some(expected)
        );
    }
}
