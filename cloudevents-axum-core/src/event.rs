//! The canonical CloudEvent value.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::attributes::{
    AttributeMap, DATA, DATACONTENTTYPE, DATASCHEMA, ID, SOURCE, SPECVERSION, SUBJECT, TIME, TYPE,
    value_kind,
};
use crate::error::EventError;
use crate::projection::Projection;

/// An immutable CloudEvent with a typed payload.
///
/// The four required attributes (`id`, `source`, `specversion`, `type`) are
/// always present and non-empty. Whether the event arrived in binary or
/// structured mode is not observable from this value.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEvent<T> {
    id: String,
    source: String,
    specversion: String,
    ty: String,
    datacontenttype: Option<String>,
    dataschema: Option<String>,
    subject: Option<String>,
    time: Option<DateTime<FixedOffset>>,
    extensions: BTreeMap<String, Value>,
    data: T,
}

impl<T> CloudEvent<T> {
    /// Strictly build an event from a raw attribute map.
    ///
    /// Required attributes must be non-empty strings. Optional context
    /// attributes must be strings when present (`null` counts as absent) and
    /// `time` must be RFC 3339. `data` (JSON `null` when missing) is handed to
    /// `projection`. Every other key becomes an extension attribute.
    pub fn from_attributes<P>(mut attributes: AttributeMap, projection: &P) -> Result<Self, EventError>
    where
        P: Projection<T> + ?Sized,
    {
        let id = required(&mut attributes, ID)?;
        let source = required(&mut attributes, SOURCE)?;
        let specversion = required(&mut attributes, SPECVERSION)?;
        let ty = required(&mut attributes, TYPE)?;

        let datacontenttype = optional(&mut attributes, DATACONTENTTYPE)?;
        let dataschema = optional(&mut attributes, DATASCHEMA)?;
        let subject = optional(&mut attributes, SUBJECT)?;
        let time = optional(&mut attributes, TIME)?
            .map(|raw| DateTime::parse_from_rfc3339(&raw))
            .transpose()
            .map_err(EventError::InvalidTime)?;

        let raw_data = attributes.take(DATA).unwrap_or(Value::Null);
        let data = projection
            .project(raw_data)
            .map_err(EventError::Projection)?;

        Ok(Self {
            id,
            source,
            specversion,
            ty,
            datacontenttype,
            dataschema,
            subject,
            time,
            extensions: attributes.into_inner().into_iter().collect(),
            data,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// URI-reference identifying the context in which the event happened.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn specversion(&self) -> &str {
        &self.specversion
    }

    /// The `type` attribute.
    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn datacontenttype(&self) -> Option<&str> {
        self.datacontenttype.as_deref()
    }

    pub fn dataschema(&self) -> Option<&str> {
        self.dataschema.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn time(&self) -> Option<&DateTime<FixedOffset>> {
        self.time.as_ref()
    }

    /// Extension attributes, keyed by name.
    pub fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }

    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// Replace the payload, keeping every attribute.
    pub fn map_data<U, F>(self, f: F) -> CloudEvent<U>
    where
        F: FnOnce(T) -> U,
    {
        CloudEvent {
            id: self.id,
            source: self.source,
            specversion: self.specversion,
            ty: self.ty,
            datacontenttype: self.datacontenttype,
            dataschema: self.dataschema,
            subject: self.subject,
            time: self.time,
            extensions: self.extensions,
            data: f(self.data),
        }
    }
}

fn required(attributes: &mut AttributeMap, name: &'static str) -> Result<String, EventError> {
    match attributes.take(name) {
        None | Some(Value::Null) => Err(EventError::MissingAttribute(name)),
        Some(Value::String(value)) if value.is_empty() => Err(EventError::EmptyAttribute(name)),
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(EventError::InvalidAttributeType {
            name: name.to_owned(),
            found: value_kind(&other),
        }),
    }
}

fn optional(attributes: &mut AttributeMap, name: &'static str) -> Result<Option<String>, EventError> {
    match attributes.take(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(EventError::InvalidAttributeType {
            name: name.to_owned(),
            found: value_kind(&other),
        }),
    }
}
