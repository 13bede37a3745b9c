//! Records displayed in list views.
//!
//! A [`Record`] is an opaque field map as returned by the API. List state
//! never mutates records; it only filters, orders and selects them.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates an identifier from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// One row of domain data (a shipping mark, a tracking entry, an order...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing field map.
    #[must_use]
    pub const fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Converts a JSON value into a record. Only objects qualify.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Sets a field, builder style.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Looks up a field. Dotted paths descend into nested objects
    /// (`owner.username`); an exact key match wins over path traversal.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(path) {
            return Some(value);
        }
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Returns the string representation of a field used for searching and
    /// equality filters.
    ///
    /// Strings are returned verbatim, numbers and booleans as their JSON
    /// text. Absent, null, array and object values are the empty string.
    #[must_use]
    pub fn text(&self, path: &str) -> Cow<'_, str> {
        match self.get(path) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(true)) => Cow::Borrowed("true"),
            Some(Value::Bool(false)) => Cow::Borrowed("false"),
            _ => Cow::Borrowed(""),
        }
    }

    /// Returns a field as a number. Numeric strings are parsed; anything
    /// else yields `None`.
    #[must_use]
    pub fn number(&self, path: &str) -> Option<f64> {
        match self.get(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Returns true if the field is absent, null or an empty string.
    #[must_use]
    pub fn is_blank(&self, path: &str) -> bool {
        match self.get(path) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Resolves the record identifier.
    ///
    /// Tries `id_field` first, then `id`, then `_id`, since the backend
    /// serializes either depending on the endpoint.
    #[must_use]
    pub fn id(&self, id_field: &str) -> Option<RecordId> {
        [id_field, "id", "_id"]
            .iter()
            .find_map(|field| match self.fields.get(*field)? {
                Value::String(s) if !s.is_empty() => Some(RecordId(s.clone())),
                Value::Number(n) => Some(RecordId(n.to_string())),
                _ => None,
            })
    }

    /// Returns the underlying field map.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record, returning its field map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
