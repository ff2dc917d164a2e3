//! # CloudEvents for Axum
//!
//! Decode inbound HTTP requests into [`CloudEvent`] values, supporting both
//! CloudEvents HTTP transport encodings:
//!
//! - **Binary mode**: attributes in `ce-*` headers, payload as the raw body.
//! - **Structured mode**: the whole event as a single JSON document.
//!
//! The encoding is chosen from the request headers alone (see [`select_mode`]),
//! the Content-Type must be JSON, and every failure is reported as one
//! [`DecodeError`] shape: HTTP 400 with a mode-qualified message.
//!
//! ## Getting Started
//!
//! ```ignore
//! use cloudevents_axum::prelude::*;
//!
//! async fn handler(CloudEventRequest(event): CloudEventRequest<serde_json::Value>) {
//!     tracing::info!(id = event.id(), ty = event.ty(), "received event");
//! }
//! ```
//!
//! For a custom payload conversion, pass any `Fn(Value) -> Result<T, E>` to
//! [`decode_request`] or [`CloudEventDecoder::decode`].

pub mod binary;
mod builder;
pub mod decoder;
pub mod error;
pub mod limits;
pub mod media_type;
pub mod mode;
pub mod pipeline;
pub mod request;
pub mod structured;

pub use binary::decode_binary;
pub use decoder::{CloudEventDecoder, decode_request};
pub use error::{DecodeError, DecodeErrorKind};
pub use limits::BodyLimits;
pub use media_type::{MediaType, validate_media_type};
pub use mode::{EncodingMode, select_mode};
pub use request::CloudEventRequest;
pub use structured::decode_structured;

// Re-export the core crate types
pub use cloudevents_axum_core::{
    AttributeMap, BoxError, CloudEvent, EventError, JsonProjection, Projection,
};

pub mod prelude {
    //! A prelude for `cloudevents-axum` providing the most common types.
    pub use crate::decoder::{CloudEventDecoder, decode_request};
    pub use crate::error::{DecodeError, DecodeErrorKind};
    pub use crate::limits::BodyLimits;
    pub use crate::request::CloudEventRequest;
    pub use cloudevents_axum_core::{CloudEvent, JsonProjection, Projection};
}
