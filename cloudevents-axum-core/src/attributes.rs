//! CloudEvent attribute names and the raw attribute map.
//!
//! Both transport encodings are normalized into an [`AttributeMap`] before
//! the event is built, so the builder never knows which encoding was used.

use serde_json::{Map, Value};

pub const ID: &str = "id";
pub const SOURCE: &str = "source";
pub const SPECVERSION: &str = "specversion";
pub const TYPE: &str = "type";
pub const DATACONTENTTYPE: &str = "datacontenttype";
pub const DATASCHEMA: &str = "dataschema";
pub const SUBJECT: &str = "subject";
pub const TIME: &str = "time";
pub const DATA: &str = "data";

/// Unprefixed attribute name to value, created per request.
///
/// Values are JSON: binary-mode headers land here as strings, structured-mode
/// envelopes keep whatever JSON type they carried, and `data` holds the
/// parsed body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap(Map<String, Value>);

impl AttributeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Insert an attribute unless it already holds a non-null value.
    ///
    /// An explicit `null` counts as absent, the same way the event builder
    /// reads optional attributes. Returns `true` if the value was inserted.
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<Value>) -> bool {
        if self.0.get(name).is_some_and(|existing| !existing.is_null()) {
            return false;
        }
        self.0.insert(name.to_owned(), value.into());
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Remove an attribute and hand back its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for AttributeMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Human-readable JSON type name, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
