//! Body reading and JSON parsing shared by both decoders.
//!
//! Flow: read_body (bounded by [`BodyLimits`]) → parse_json.
//! Errors here are [`BodyError`]s; the decoders wrap them into a
//! mode-qualified [`DecodeError`](crate::DecodeError).

use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::{Map, Value};

use cloudevents_axum_core::BoxError;
use cloudevents_axum_core::attributes::value_kind;

use crate::limits::{BodyLimits, BodyTooLarge};

/// Why a request body could not be turned into JSON.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error(transparent)]
    TooLarge(#[from] BodyTooLarge),

    #[error("failed to read request body: {0}")]
    Read(#[source] BoxError),

    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("header `{0}` does not contain a valid string value")]
    InvalidHeader(String),
}

/// Read the whole body, enforcing the size limit while streaming.
pub async fn read_body(body: Body, limits: &BodyLimits) -> Result<Bytes, BodyError> {
    let collected = match limits.max_body_size() {
        Some(limit) => Limited::new(body, limit).collect().await.map_err(|err| {
            if err.is::<LengthLimitError>() {
                BodyError::TooLarge(BodyTooLarge { limit })
            } else {
                BodyError::Read(err)
            }
        })?,
        None => body
            .collect()
            .await
            .map_err(|err| BodyError::Read(err.into()))?,
    };
    Ok(collected.to_bytes())
}

/// Parse a body as JSON. An empty body is JSON `null`.
pub fn parse_json(body: &[u8]) -> Result<Value, BodyError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Parse a body as a JSON object.
pub fn parse_json_object(body: &[u8]) -> Result<Map<String, Value>, BodyError> {
    match parse_json(body)? {
        Value::Object(map) => Ok(map),
        other => Err(BodyError::NotAnObject(value_kind(&other))),
    }
}
