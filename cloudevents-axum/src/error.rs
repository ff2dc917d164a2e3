//! Decode failures and their HTTP rendering.
//!
//! Every way a request can fail to decode ends up as a [`DecodeError`]:
//! status 400, a mode-qualified message, and the underlying cause kept for
//! diagnostics only. The cause is reachable through
//! [`std::error::Error::source`] and is logged by the decoder, never rendered
//! to the client.

use std::fmt;
use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::mode::EncodingMode;

// Re-export core types
pub use cloudevents_axum_core::{BoxError, EventError};

/// Broad classification of a decode failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Content-Type is missing or not JSON. Raised before the body is read.
    UnsupportedMediaType,
    /// Body could not be read, is not JSON, or (structured mode) is not a
    /// JSON object.
    MalformedBody,
    /// Required attributes are missing or malformed, or the payload
    /// projection failed.
    InvalidCloudEvent,
}

impl DecodeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeErrorKind::UnsupportedMediaType => "unsupported_media_type",
            DecodeErrorKind::MalformedBody => "malformed_body",
            DecodeErrorKind::InvalidCloudEvent => "invalid_cloud_event",
        }
    }
}

/// The single externally visible error shape of the decoder.
#[derive(Debug)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    mode: EncodingMode,
    message: String,
    cause: Option<BoxError>,
    location: &'static Location<'static>,
}

impl DecodeError {
    /// Content-Type rejected. The message is shown to the caller as is.
    #[track_caller]
    pub fn unsupported_media_type<S: Into<String>>(mode: EncodingMode, message: S) -> Self {
        Self {
            kind: DecodeErrorKind::UnsupportedMediaType,
            mode,
            message: message.into(),
            cause: None,
            location: Location::caller(),
        }
    }

    /// Body unreadable or not the expected JSON shape.
    #[track_caller]
    pub fn malformed_body<E: Into<BoxError>>(mode: EncodingMode, cause: E) -> Self {
        Self::wrap(DecodeErrorKind::MalformedBody, mode, cause.into())
    }

    /// Attribute map rejected by the event builder.
    #[track_caller]
    pub fn invalid_event(mode: EncodingMode, cause: EventError) -> Self {
        Self::wrap(DecodeErrorKind::InvalidCloudEvent, mode, Box::new(cause))
    }

    #[track_caller]
    fn wrap(kind: DecodeErrorKind, mode: EncodingMode, cause: BoxError) -> Self {
        Self {
            kind,
            mode,
            message: mode.failure_message(),
            cause: Some(cause),
            location: Location::caller(),
        }
    }

    /// HTTP status for this failure. Always `400 Bad Request`.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// The encoding mode that was being decoded when the failure happened.
    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    /// The caller-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location where the failure was raised.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The wrapped cause, for diagnostics.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// JSON body structure for decode failure responses.
#[derive(Serialize)]
struct ErrorResponseBody<'a> {
    error: &'a str,
}

impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponseBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}
