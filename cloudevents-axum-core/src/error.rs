//! CloudEvent construction errors.
//!
//! - [`EventError`]: why an attribute map could not become a [`CloudEvent`]
//! - [`BoxError`]: the type-erased cause used by projections
//!
//! [`CloudEvent`]: crate::CloudEvent

/// Type-erased error, as returned by payload projections.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building a [`CloudEvent`](crate::CloudEvent) from a
/// raw attribute map.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A required attribute is absent (or explicitly `null`).
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),

    /// A required attribute is present but the empty string.
    #[error("required attribute `{0}` must not be empty")]
    EmptyAttribute(&'static str),

    /// A context attribute is not a JSON string.
    #[error("attribute `{name}` must be a string, got {found}")]
    InvalidAttributeType { name: String, found: &'static str },

    /// The `time` attribute is not an RFC 3339 timestamp.
    #[error("attribute `time` is not an RFC 3339 timestamp: {0}")]
    InvalidTime(#[source] chrono::ParseError),

    /// The caller's projection rejected the `data` value.
    #[error("could not project event data: {0}")]
    Projection(#[source] BoxError),
}
