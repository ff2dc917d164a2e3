//! Payload projection.
//!
//! A projection turns the raw JSON `data` value of an event into the payload
//! type the caller wants. Any `Fn(Value) -> Result<T, E>` is a projection;
//! [`JsonProjection`] covers the common serde case.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BoxError;

/// Strategy for converting the raw `data` value into a typed payload.
pub trait Projection<T> {
    fn project(&self, raw: Value) -> Result<T, BoxError>;
}

impl<T, E, F> Projection<T> for F
where
    F: Fn(Value) -> Result<T, E>,
    E: Into<BoxError>,
{
    fn project(&self, raw: Value) -> Result<T, BoxError> {
        self(raw).map_err(Into::into)
    }
}

/// Deserializes `data` into `T` with serde.
///
/// ```
/// use cloudevents_axum_core::{JsonProjection, Projection};
///
/// let n: u32 = JsonProjection::new().project(serde_json::json!(7)).unwrap();
/// assert_eq!(n, 7);
/// ```
pub struct JsonProjection<T>(PhantomData<fn() -> T>);

impl<T> JsonProjection<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonProjection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonProjection<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JsonProjection<T> {}

impl<T> fmt::Debug for JsonProjection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JsonProjection")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Projection<T> for JsonProjection<T> {
    fn project(&self, raw: Value) -> Result<T, BoxError> {
        serde_json::from_value(raw).map_err(Into::into)
    }
}
