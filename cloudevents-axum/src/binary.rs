//! Binary-mode decoding.
//!
//! Attributes come from `ce-*` headers (prefix stripped), `datacontenttype`
//! from the request's Content-Type, and `data` from the JSON body.

use axum::http::{HeaderMap, header};
use cloudevents_axum_core::attributes::{DATA, DATACONTENTTYPE};
use cloudevents_axum_core::{AttributeMap, CloudEvent, Projection};

use crate::builder::build_event;
use crate::error::DecodeError;
use crate::media_type::{MediaType, validate_media_type};
use crate::mode::{CE_HEADER_PREFIX, EncodingMode};
use crate::pipeline::{BodyError, parse_json};

/// Decode a buffered binary-mode request.
///
/// The caller is expected to have chosen binary mode with
/// [`select_mode`](crate::select_mode); this function does not re-check
/// that the required headers are present (the builder will reject a
/// missing attribute anyway).
pub fn decode_binary<T, P>(
    headers: &HeaderMap,
    body: &[u8],
    projection: &P,
) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    let media_type = validate_media_type(headers.get(header::CONTENT_TYPE), EncodingMode::Binary)?;
    decode_validated(headers, &media_type, body, projection)
}

/// Decode once the Content-Type has been validated.
pub(crate) fn decode_validated<T, P>(
    headers: &HeaderMap,
    media_type: &MediaType,
    body: &[u8],
    projection: &P,
) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    let attributes = binary_attributes(headers, media_type, body)
        .map_err(|err| DecodeError::malformed_body(EncodingMode::Binary, err))?;
    build_event(attributes, EncodingMode::Binary, projection)
}

/// Collect the raw attribute map of a binary-mode request.
///
/// Header values are read as UTF-8, not just visible ASCII. The request's
/// Content-Type always wins over a `ce-datacontenttype` header. Repeated
/// headers keep the last value.
pub fn binary_attributes(
    headers: &HeaderMap,
    media_type: &MediaType,
    body: &[u8],
) -> Result<AttributeMap, BodyError> {
    let mut attributes = AttributeMap::new();
    for (name, value) in headers {
        let Some(attribute) = name.as_str().strip_prefix(CE_HEADER_PREFIX) else {
            continue;
        };
        let value = std::str::from_utf8(value.as_bytes())
            .map_err(|_| BodyError::InvalidHeader(name.as_str().to_owned()))?;
        attributes.insert(attribute, value);
    }

    attributes.insert(DATACONTENTTYPE, media_type.to_string());
    attributes.insert(DATA, parse_json(body)?);
    Ok(attributes)
}
