//! Structured-mode decoding.
//!
//! The body is the whole event envelope as a JSON object. When the envelope
//! has no `datacontenttype` (or has it as `null`), the request's Content-Type
//! fills it in. A non-null value is never overwritten.

use axum::http::{HeaderMap, header};
use cloudevents_axum_core::attributes::DATACONTENTTYPE;
use cloudevents_axum_core::{AttributeMap, CloudEvent, Projection};

use crate::builder::build_event;
use crate::error::DecodeError;
use crate::media_type::{MediaType, validate_media_type};
use crate::mode::EncodingMode;
use crate::pipeline::{BodyError, parse_json_object};

/// Decode a buffered structured-mode request.
pub fn decode_structured<T, P>(
    headers: &HeaderMap,
    body: &[u8],
    projection: &P,
) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    let media_type =
        validate_media_type(headers.get(header::CONTENT_TYPE), EncodingMode::Structured)?;
    decode_validated(&media_type, body, projection)
}

pub(crate) fn decode_validated<T, P>(
    media_type: &MediaType,
    body: &[u8],
    projection: &P,
) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    let attributes = envelope_attributes(media_type, body)
        .map_err(|err| DecodeError::malformed_body(EncodingMode::Structured, err))?;
    build_event(attributes, EncodingMode::Structured, projection)
}

/// Parse the envelope into a raw attribute map.
pub fn envelope_attributes(media_type: &MediaType, body: &[u8]) -> Result<AttributeMap, BodyError> {
    let mut attributes = AttributeMap::from(parse_json_object(body)?);
    attributes.insert_if_absent(DATACONTENTTYPE, media_type.to_string());
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use axum::http::HeaderValue;
    use cloudevents_axum_core::JsonProjection;
    use serde_json::{Value, json};

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    fn envelope(extra: Value) -> Vec<u8> {
        let mut envelope = json!({
            "specversion": "1.0",
            "type": "google.cloud.pubsub.topic.v1.messagePublished",
            "source": "//pubsub.googleapis.com/projects/p/topics/t",
            "id": "aaaaaa-1111-bbbb-2222-cccccccccccc",
            "data": {"message": {"data": "aGVsbG8="}}
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut envelope, extra) {
            base.extend(extra);
        }
        serde_json::to_vec(&envelope).unwrap()
    }

    #[test]
    fn test_decode_structured() {
        let event: CloudEvent<Value> = decode_structured(
            &headers("application/json"),
            &envelope(json!({})),
            &JsonProjection::new(),
        )
        .unwrap();
        assert_eq!(event.id(), "aaaaaa-1111-bbbb-2222-cccccccccccc");
        assert_eq!(event.ty(), "google.cloud.pubsub.topic.v1.messagePublished");
        assert_eq!(event.datacontenttype(), Some("application/json"));
        assert_eq!(event.data()["message"]["data"], "aGVsbG8=");
    }

    #[test]
    fn test_explicit_datacontenttype_is_preserved() {
        let event: CloudEvent<Value> = decode_structured(
            &headers("application/json"),
            &envelope(json!({"datacontenttype": "text/plain"})),
            &JsonProjection::new(),
        )
        .unwrap();
        assert_eq!(event.datacontenttype(), Some("text/plain"));
    }

    #[test]
    fn test_cloudevents_json_content_type() {
        let event: CloudEvent<Value> = decode_structured(
            &headers("application/cloudevents+json; charset=UTF-8"),
            &envelope(json!({})),
            &JsonProjection::new(),
        )
        .unwrap();
        assert_eq!(
            event.datacontenttype(),
            Some("application/cloudevents+json; charset=UTF-8")
        );
    }

    #[test]
    fn test_array_body_is_rejected() {
        let err = decode_structured::<Value, _>(
            &headers("application/json"),
            b"[1, 2, 3]",
            &JsonProjection::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedBody);
        assert_eq!(
            err.message(),
            "Could not decode the request as a structured-mode message."
        );
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut body: Value = serde_json::from_slice(&envelope(json!({}))).unwrap();
        body.as_object_mut().unwrap().remove("id");
        let err = decode_structured::<Value, _>(
            &headers("application/json"),
            &serde_json::to_vec(&body).unwrap(),
            &JsonProjection::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidCloudEvent);
        assert_eq!(
            err.message(),
            "Could not decode the request as a structured-mode message."
        );
    }

    #[test]
    fn test_text_plain_is_rejected() {
        let err = decode_structured::<Value, _>(
            &headers("text/plain"),
            &envelope(json!({})),
            &JsonProjection::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnsupportedMediaType);
        assert_eq!(err.mode(), EncodingMode::Structured);
    }

    #[test]
    fn test_envelope_attributes_fills_datacontenttype() {
        let media_type = MediaType::parse("application/json");
        let attributes = envelope_attributes(&media_type, br#"{"id":"1"}"#).unwrap();
        assert_eq!(attributes.get(DATACONTENTTYPE), Some(&json!("application/json")));

        let attributes =
            envelope_attributes(&media_type, br#"{"id":"1","datacontenttype":null}"#).unwrap();
        assert_eq!(attributes.get(DATACONTENTTYPE), Some(&json!("application/json")));
    }

    #[test]
    fn test_null_datacontenttype_is_filled_in() {
        let event: CloudEvent<Value> = decode_structured(
            &headers("application/json"),
            &envelope(json!({"datacontenttype": null})),
            &JsonProjection::new(),
        )
        .unwrap();
        assert_eq!(event.datacontenttype(), Some("application/json"));
    }
}
