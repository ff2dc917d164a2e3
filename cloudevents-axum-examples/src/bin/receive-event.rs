//! Example: receive CloudEvents with the `CloudEventRequest` extractor.
//!
//! Accepts binary-mode and structured-mode events on `POST /` and logs them.
//! Malformed requests are rejected with HTTP 400.
//!
//! Run with: cargo run --bin receive-event
//! Test with:
//!   # Binary mode
//!   curl -X POST http://localhost:8080/ \
//!     -H 'Content-Type: application/json' \
//!     -H 'ce-id: 1' -H 'ce-source: /curl' -H 'ce-specversion: 1.0' \
//!     -H 'ce-type: com.example.ping' \
//!     -d '{"message": "hello"}'
//!
//!   # Structured mode
//!   curl -X POST http://localhost:8080/ \
//!     -H 'Content-Type: application/cloudevents+json' \
//!     -d '{"id":"2","source":"/curl","specversion":"1.0","type":"com.example.ping","data":{"message":"hi"}}'

use axum::{Extension, Router, http::StatusCode, routing::post};
use cloudevents_axum::prelude::*;
use cloudevents_axum_examples::{ReceiverConfig, init_tracing};
use serde_json::Value;

async fn on_event(CloudEventRequest(event): CloudEventRequest<Value>) -> StatusCode {
    tracing::info!(
        id = event.id(),
        source = event.source(),
        ty = event.ty(),
        subject = event.subject(),
        datacontenttype = event.datacontenttype(),
        extensions = ?event.extensions(),
        data = %event.data(),
        "received CloudEvent"
    );
    StatusCode::NO_CONTENT
}

fn app(limits: BodyLimits) -> Router {
    Router::new()
        .route("/", post(on_event))
        .layer(Extension(limits))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ReceiverConfig::from_env()?;
    init_tracing(&config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, max_body_bytes = config.max_body_bytes, "listening for CloudEvents");

    axum::serve(listener, app(config.body_limits())).await?;
    Ok(())
}
