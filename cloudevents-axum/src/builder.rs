//! Canonical event construction.
//!
//! Bridges the raw attribute map to [`CloudEvent::from_attributes`] and
//! normalizes every construction failure into a [`DecodeError`], so callers
//! cannot tell attribute problems from payload projection problems.

use cloudevents_axum_core::{AttributeMap, CloudEvent, Projection};

use crate::error::DecodeError;
use crate::mode::EncodingMode;

/// Build the event for a decoded attribute map.
#[track_caller]
pub(crate) fn build_event<T, P>(
    attributes: AttributeMap,
    mode: EncodingMode,
    projection: &P,
) -> Result<CloudEvent<T>, DecodeError>
where
    P: Projection<T> + ?Sized,
{
    match CloudEvent::from_attributes(attributes, projection) {
        Ok(event) => Ok(event),
        Err(err) => Err(DecodeError::invalid_event(mode, err)),
    }
}
