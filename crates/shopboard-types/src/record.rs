//! Generic tabular records as returned by the analytics backend
//!
//! Every analytics endpoint answers with rows of scalar columns. A
//! [`TabularRecord`] keeps those columns in the order the backend sent them,
//! which is the order used for CSV headers.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Errors raised while building or decoding a record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("column '{column}' holds a nested value, expected a scalar")]
    NestedValue { column: String },

    #[error("expected a JSON object or array of objects, found {found}")]
    NotARecord { found: &'static str },

    #[error("record does not match expected shape: {message}")]
    Shape { message: String },
}

/// A single scalar cell
///
/// Integers that fit in `i64` stay integers so they print without a
/// fractional part; everything else numeric becomes `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Convert a JSON value, rejecting arrays and objects
    pub fn from_json(column: &str, value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Null => Ok(CellValue::Null),
            Value::Bool(b) => Ok(CellValue::Bool(b)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => Ok(CellValue::Text(s)),
            Value::Array(_) | Value::Object(_) => Err(RecordError::NestedValue {
                column: column.to_string(),
            }),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell; numeric text is parsed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Null | CellValue::Bool(_) => None,
        }
    }
}

/// Literal textual form: `null` prints as an empty string.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered column-name to scalar mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularRecord {
    columns: Vec<(String, CellValue)>,
}

impl TabularRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(column, value)` pairs, keeping their order
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.insert(key, value);
        }
        record
    }

    /// Build from a JSON object (key order preserved)
    pub fn from_json_object(map: Map<String, Value>) -> Result<Self, RecordError> {
        let mut columns = Vec::with_capacity(map.len());
        for (key, value) in map {
            let cell = CellValue::from_json(&key, value)?;
            columns.push((key, cell));
        }
        Ok(Self { columns })
    }

    /// Parse a response body into records.
    ///
    /// An array must contain objects only; a bare object becomes a
    /// single-record payload.
    pub fn from_json_body(body: Value) -> Result<Vec<Self>, RecordError> {
        match body {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Self::from_json_object(map),
                    other => Err(RecordError::NotARecord {
                        found: json_kind(&other),
                    }),
                })
                .collect(),
            Value::Object(map) => Ok(vec![Self::from_json_object(map)?]),
            other => Err(RecordError::NotARecord {
                found: json_kind(&other),
            }),
        }
    }

    /// Insert or replace a column. New columns go last.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        if let Some(slot) = self.columns.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.columns.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.columns.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .columns
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Decode into a typed row (`CohortRecord`, `RfmRecord`, ...)
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        serde_json::from_value(self.to_json()).map_err(|e| RecordError::Shape {
            message: e.to_string(),
        })
    }
}

impl Serialize for TabularRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, value) in &self.columns {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TabularRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_json_object(map).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
