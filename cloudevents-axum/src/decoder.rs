//! Request decoding entry point.
//!
//! [`CloudEventDecoder`] selects the encoding mode from the request headers,
//! validates the Content-Type before touching the body, reads the body under
//! its [`BodyLimits`] and hands the bytes to the matching decoder.

use axum::extract::Request;
use axum::http::{HeaderMap, header};
use cloudevents_axum_core::{CloudEvent, Projection};

use crate::error::DecodeError;
use crate::limits::BodyLimits;
use crate::media_type::{MediaType, validate_media_type};
use crate::mode::{EncodingMode, select_mode};
use crate::pipeline::{BodyError, read_body};
use crate::{binary, structured};

/// Decodes HTTP requests into [`CloudEvent`]s.
///
/// Holds only immutable configuration; clone it freely and share it across
/// requests.
///
/// # Example
///
/// ```ignore
/// use cloudevents_axum::{BodyLimits, CloudEventDecoder, JsonProjection};
///
/// let decoder = CloudEventDecoder::new().with_limits(BodyLimits::new(64 * 1024));
/// let event: CloudEvent<MyPayload> = decoder.decode(req, &JsonProjection::new()).await?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudEventDecoder {
    limits: BodyLimits,
}

impl CloudEventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body size limits.
    pub fn with_limits(mut self, limits: BodyLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> BodyLimits {
        self.limits
    }

    /// Decode a request, reading its body.
    pub async fn decode<T, P>(
        &self,
        req: Request,
        projection: &P,
    ) -> Result<CloudEvent<T>, DecodeError>
    where
        P: Projection<T> + ?Sized,
    {
        let (parts, body) = req.into_parts();
        let mode = select_mode(&parts.headers);

        let result = async {
            let media_type = validate_media_type(parts.headers.get(header::CONTENT_TYPE), mode)?;
            let body = read_body(body, &self.limits)
                .await
                .map_err(|err| DecodeError::malformed_body(mode, err))?;
            decode_validated(mode, &parts.headers, &media_type, &body, projection)
        }
        .await;

        log_outcome(mode, result)
    }

    /// Decode from headers and an already buffered body.
    pub fn decode_parts<T, P>(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        projection: &P,
    ) -> Result<CloudEvent<T>, DecodeError>
    where
        P: Projection<T> + ?Sized,
    {
        let mode = select_mode(headers);

        let result = validate_media_type(headers.get(header::CONTENT_TYPE), mode).and_then(
            |media_type| {
                self.limits
                    .check_size(body.len())
                    .map_err(|err| DecodeError::malformed_body(mode, BodyError::from(err)))?;
                decode_validated(mode, headers, &media_type, body, projection)
            },
        );

        log_outcome(mode, result)
    }
}

/// Decode a request with the default [`CloudEventDecoder`].
pub async fn decode_request<T, P>(req: Request, projection: &P) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    CloudEventDecoder::new().decode(req, projection).await
}

fn decode_validated<T, P>(
    mode: EncodingMode,
    headers: &HeaderMap,
    media_type: &MediaType,
    body: &[u8],
    projection: &P,
) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    match mode {
        EncodingMode::Binary => binary::decode_validated(headers, media_type, body, projection),
        EncodingMode::Structured => structured::decode_validated(media_type, body, projection),
    }
}

fn log_outcome<T>(
    mode: EncodingMode,
    result: Result<CloudEvent<T>, DecodeError>,
) -> Result<CloudEvent<T>, DecodeError> {
    match &result {
        Ok(event) => tracing::trace!(
            %mode,
            id = event.id(),
            ty = event.ty(),
            "decoded CloudEvent"
        ),
        Err(err) => match err.cause() {
            Some(cause) => tracing::debug!(
                %mode,
                kind = err.kind().as_str(),
                error = %cause,
                origin = %err.location(),
                "failed to decode CloudEvent"
            ),
            None => tracing::debug!(
                %mode,
                kind = err.kind().as_str(),
                message = err.message(),
                origin = %err.location(),
                "failed to decode CloudEvent"
            ),
        },
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use axum::body::Body;
    use axum::http::{HeaderValue, Method};
    use cloudevents_axum_core::{EventError, JsonProjection};
    use serde::Deserialize;
    use serde_json::{Value, json};
    use std::error::Error as _;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Greeting {
        name: String,
    }

    fn binary_request(body: &'static str, content_type: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("ce-type", "com.example.greeting")
            .header("ce-specversion", "1.0")
            .header("ce-source", "https://example.com/greeter")
            .header("ce-id", "A234-1234-1234")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    fn structured_request(body: Value, content_type: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_binary_round_trip() {
        let req = binary_request(r#"{"name":"Ada"}"#, "application/json");
        let event: CloudEvent<Greeting> = decode_request(req, &JsonProjection::new())
            .await
            .unwrap();

        assert_eq!(event.ty(), "com.example.greeting");
        assert_eq!(event.specversion(), "1.0");
        assert_eq!(event.source(), "https://example.com/greeter");
        assert_eq!(event.id(), "A234-1234-1234");
        assert_eq!(event.data(), &Greeting { name: "Ada".into() });
    }

    #[tokio::test]
    async fn test_structured_round_trip() {
        let req = structured_request(
            json!({
                "specversion": "1.0",
                "type": "com.example.greeting",
                "source": "https://example.com/greeter",
                "id": "A234-1234-1234",
                "time": "2024-01-02T03:04:05Z",
                "data": {"name": "Ada"}
            }),
            "application/cloudevents+json",
        );
        let event: CloudEvent<Greeting> = decode_request(req, &JsonProjection::new())
            .await
            .unwrap();
        assert_eq!(event.data(), &Greeting { name: "Ada".into() });
        assert_eq!(event.datacontenttype(), Some("application/cloudevents+json"));
        assert!(event.time().is_some());
    }

    #[test]
    fn test_both_modes_are_indistinguishable() {
        let decoder = CloudEventDecoder::new();

        let mut binary = HeaderMap::new();
        binary.insert("ce-type", HeaderValue::from_static("com.example.greeting"));
        binary.insert("ce-specversion", HeaderValue::from_static("1.0"));
        binary.insert("ce-source", HeaderValue::from_static("/greeter"));
        binary.insert("ce-id", HeaderValue::from_static("1"));
        binary.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let from_binary: CloudEvent<Greeting> = decoder
            .decode_parts(&binary, br#"{"name":"Ada"}"#, &JsonProjection::new())
            .unwrap();

        let mut structured = HeaderMap::new();
        structured.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = json!({
            "specversion": "1.0",
            "type": "com.example.greeting",
            "source": "/greeter",
            "id": "1",
            "data": {"name": "Ada"}
        });
        let from_structured: CloudEvent<Greeting> = decoder
            .decode_parts(
                &structured,
                &serde_json::to_vec(&body).unwrap(),
                &JsonProjection::new(),
            )
            .unwrap();

        assert_eq!(from_binary, from_structured);
    }

    #[test]
    fn test_decoding_twice_is_idempotent() {
        let mut headers = HeaderMap::new();
        headers.insert("ce-type", HeaderValue::from_static("t"));
        headers.insert("ce-specversion", HeaderValue::from_static("1.0"));
        headers.insert("ce-source", HeaderValue::from_static("/s"));
        headers.insert("ce-id", HeaderValue::from_static("1"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = br#"{"name":"Ada"}"#;

        let decoder = CloudEventDecoder::new();
        let first: CloudEvent<Greeting> = decoder
            .decode_parts(&headers, body, &JsonProjection::new())
            .unwrap();
        let second: CloudEvent<Greeting> = decoder
            .decode_parts(&headers, body, &JsonProjection::new())
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_text_plain_rejected_in_both_modes() {
        let req = binary_request("{}", "text/plain");
        let err = decode_request::<Value, _>(req, &JsonProjection::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnsupportedMediaType);
        assert_eq!(err.mode(), EncodingMode::Binary);

        let req = structured_request(json!({}), "text/plain");
        let err = decode_request::<Value, _>(req, &JsonProjection::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnsupportedMediaType);
        assert_eq!(err.mode(), EncodingMode::Structured);
    }

    #[tokio::test]
    async fn test_missing_ce_id_falls_back_to_structured() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("ce-type", "com.example.greeting")
            .header("ce-specversion", "1.0")
            .header("ce-source", "/greeter")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"type":"com.example.greeting","specversion":"1.0","source":"/greeter"}"#,
            ))
            .unwrap();
        let err = decode_request::<Value, _>(req, &JsonProjection::new())
            .await
            .unwrap_err();
        assert_eq!(err.mode(), EncodingMode::Structured);
        assert_eq!(err.kind(), DecodeErrorKind::InvalidCloudEvent);
        assert_eq!(
            err.to_string(),
            "Could not decode the request as a structured-mode message."
        );

        let cause = err
            .source()
            .and_then(|cause| cause.downcast_ref::<EventError>())
            .unwrap();
        assert!(matches!(cause, EventError::MissingAttribute("id")));
    }

    #[tokio::test]
    async fn test_structured_array_body() {
        let req = structured_request(json!([1, 2, 3]), "application/json");
        let err = decode_request::<Value, _>(req, &JsonProjection::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedBody);
        assert_eq!(
            err.message(),
            "Could not decode the request as a structured-mode message."
        );
    }

    #[tokio::test]
    async fn test_body_over_limit() {
        let decoder = CloudEventDecoder::new().with_limits(BodyLimits::new(4));
        let req = binary_request(r#"{"name":"Ada"}"#, "application/json");
        let err = decoder
            .decode::<Value, _>(req, &JsonProjection::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedBody);
        assert_eq!(err.mode(), EncodingMode::Binary);

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let err = decoder
            .decode_parts::<Value, _>(&headers, br#"{"name":"Ada"}"#, &JsonProjection::new())
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedBody);
        assert_eq!(err.mode(), EncodingMode::Structured);
    }

    #[tokio::test]
    async fn test_projection_failure_is_wrapped() {
        let req = binary_request(r#"{"name":42}"#, "application/json");
        let err = decode_request::<Greeting, _>(req, &JsonProjection::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidCloudEvent);
        assert_eq!(
            err.message(),
            "Could not decode the request as a binary-mode message."
        );
    }

    #[tokio::test]
    async fn test_custom_projection() {
        let req = binary_request(r#"{"name":"Ada"}"#, "application/json");
        let name_len = |raw: Value| -> Result<usize, String> {
            raw["name"]
                .as_str()
                .map(str::len)
                .ok_or_else(|| "name missing".to_string())
        };
        let event = decode_request::<usize, _>(req, &name_len).await.unwrap();
        assert_eq!(*event.data(), 3);
    }
}
