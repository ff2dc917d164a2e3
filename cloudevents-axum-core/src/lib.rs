//! Core CloudEvent types.
//!
//! This crate holds the transport-independent half of `cloudevents-axum`:
//! the canonical event value and the strict construction that turns a raw
//! attribute map into one.
//!
//! ## Modules
//!
//! - [`attributes`]: Attribute names and the raw [`AttributeMap`]
//! - [`event`]: The immutable [`CloudEvent`] value
//! - [`projection`]: Payload projection strategies
//! - [`error`]: Construction errors

pub mod attributes;
mod error;
mod event;
mod projection;

pub use attributes::AttributeMap;
pub use error::*;
pub use event::*;
pub use projection::*;
