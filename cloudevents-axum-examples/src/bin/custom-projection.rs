//! Example: decode with a custom payload projection.
//!
//! Pub/Sub push deliveries wrap the payload in `{"message": {"data": ...}}`.
//! Instead of deserializing the whole envelope, the projection below pulls
//! out just the message data and attributes, and the handler calls
//! `CloudEventDecoder` itself so it controls the rejection.
//!
//! Run with: cargo run --bin custom-projection
//! Test with:
//!   curl -X POST http://localhost:8080/ \
//!     -H 'Content-Type: application/json' \
//!     -H 'ce-id: 1' -H 'ce-source: //pubsub.googleapis.com/projects/p/topics/t' \
//!     -H 'ce-specversion: 1.0' -H 'ce-type: google.cloud.pubsub.topic.v1.messagePublished' \
//!     -d '{"message": {"data": "aGVsbG8=", "attributes": {"k": "v"}}}'

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use cloudevents_axum::BoxError;
use cloudevents_axum::prelude::*;
use cloudevents_axum_examples::{ReceiverConfig, init_tracing};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct PubsubMessage {
    data: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

fn pubsub_message(raw: Value) -> Result<PubsubMessage, BoxError> {
    let message = raw
        .get("message")
        .cloned()
        .ok_or("data has no `message` field")?;
    Ok(serde_json::from_value(message)?)
}

async fn on_event(State(decoder): State<CloudEventDecoder>, req: Request) -> Response {
    match decoder.decode::<PubsubMessage, _>(req, &pubsub_message).await {
        Ok(event) => {
            tracing::info!(
                id = event.id(),
                ty = event.ty(),
                data = event.data().data.as_str(),
                attributes = ?event.data().attributes,
                "received Pub/Sub message"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ReceiverConfig::from_env()?;
    init_tracing(&config);

    let decoder = CloudEventDecoder::new().with_limits(config.body_limits());
    let app = Router::new()
        .route("/", post(on_event))
        .with_state(decoder);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening for Pub/Sub CloudEvents");

    axum::serve(listener, app).await?;
    Ok(())
}
