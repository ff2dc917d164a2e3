//! Content-Type validation.
//!
//! Only JSON payloads are decoded: `application/json` or any `+json`
//! structured-syntax suffix (such as `application/cloudevents+json`).
//! Validation runs before the body is read, in both encoding modes.

use std::fmt;

use axum::http::HeaderValue;

use crate::error::DecodeError;
use crate::mode::EncodingMode;

const APPLICATION_JSON: &str = "application/json";
const JSON_SUFFIX: &str = "+json";

/// A parsed Content-Type header value.
///
/// [`Display`](fmt::Display) yields the header value as received (trimmed),
/// which is what ends up in the event's `datacontenttype`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    raw: String,
    essence: String,
}

impl MediaType {
    /// Parse a Content-Type value. Parameters are kept in the raw form but
    /// ignored by [`essence`](Self::essence).
    pub fn parse(value: &str) -> Self {
        let raw = value.trim();
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self {
            raw: raw.to_owned(),
            essence,
        }
    }

    /// `type/subtype`, lowercased, without parameters.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is `application/json` or a `+json` subtype.
    pub fn is_json(&self) -> bool {
        if self.essence == APPLICATION_JSON {
            return true;
        }
        match self.essence.split_once('/') {
            Some((ty, subtype)) => {
                !ty.is_empty() && subtype.len() > JSON_SUFFIX.len() && subtype.ends_with(JSON_SUFFIX)
            }
            None => false,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Validate the request's Content-Type for the given mode.
///
/// Fails with [`DecodeErrorKind::UnsupportedMediaType`] when the header is
/// missing, unreadable, or not JSON.
///
/// [`DecodeErrorKind::UnsupportedMediaType`]: crate::error::DecodeErrorKind::UnsupportedMediaType
pub fn validate_media_type(
    content_type: Option<&HeaderValue>,
    mode: EncodingMode,
) -> Result<MediaType, DecodeError> {
    let Some(value) = content_type else {
        return Err(DecodeError::unsupported_media_type(
            mode,
            "Content-Type header is required.",
        ));
    };

    let Ok(value) = value.to_str() else {
        return Err(DecodeError::unsupported_media_type(
            mode,
            "Content-Type header is not a valid media type.",
        ));
    };

    let media_type = MediaType::parse(value);
    if !media_type.is_json() {
        return Err(DecodeError::unsupported_media_type(
            mode,
            format!(
                "Unsupported encoding \"{}\". Only \"{APPLICATION_JSON}\" is supported.",
                media_type.essence()
            ),
        ));
    }
    Ok(media_type)
}
