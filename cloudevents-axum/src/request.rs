//! Extractor for CloudEvent requests.

use std::ops::{Deref, DerefMut};

use axum::extract::{FromRequest, Request};
use cloudevents_axum_core::{CloudEvent, JsonProjection};
use serde::de::DeserializeOwned;

use crate::decoder::CloudEventDecoder;
use crate::error::DecodeError;
use crate::limits::BodyLimits;

/// Extracts a [`CloudEvent`] from a binary-mode or structured-mode request,
/// deserializing `data` into `T` with serde.
///
/// Body limits are taken from a [`BodyLimits`] request extension when one is
/// present, otherwise the default limit applies. On failure the request is
/// rejected with the [`DecodeError`] (HTTP 400).
///
/// # Example
///
/// ```ignore
/// async fn on_event(CloudEventRequest(event): CloudEventRequest<StorageObject>) -> StatusCode {
///     tracing::info!(id = event.id(), "received {}", event.ty());
///     StatusCode::NO_CONTENT
/// }
///
/// let app = Router::new()
///     .route("/", post(on_event))
///     .layer(Extension(BodyLimits::new(1024 * 1024)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEventRequest<T>(pub CloudEvent<T>);

impl<T> CloudEventRequest<T> {
    pub fn into_inner(self) -> CloudEvent<T> {
        self.0
    }
}

impl<T> Deref for CloudEventRequest<T> {
    type Target = CloudEvent<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for CloudEventRequest<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S, T> FromRequest<S> for CloudEventRequest<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = DecodeError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let limits = req
            .extensions()
            .get::<BodyLimits>()
            .copied()
            .unwrap_or_default();

        CloudEventDecoder::new()
            .with_limits(limits)
            .decode(req, &JsonProjection::new())
            .await
            .map(CloudEventRequest)
    }
}
