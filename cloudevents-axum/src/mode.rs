//! Transport encoding detection.
//!
//! The decision is a pure function of which header names are present:
//! a request carrying every header in [`REQUIRED_BINARY_HEADERS`] is
//! binary-mode, anything else is structured-mode. Content-Type plays no
//! part in it.
//!
//! Header names are matched exactly as [`http::HeaderName`] exposes them,
//! which is always lowercase, so `Ce-Id` on the wire matches `ce-id` here.
//!
//! A request with some but not all of the binary headers is decoded as
//! structured-mode, and its body then usually fails to parse as an envelope.
//!
//! [`http::HeaderName`]: axum::http::HeaderName

use std::fmt;

use axum::http::HeaderMap;

/// Prefix of headers carrying CloudEvent attributes in binary mode.
pub const CE_HEADER_PREFIX: &str = "ce-";

/// Headers that must all be present for a request to be binary-mode.
pub const REQUIRED_BINARY_HEADERS: [&str; 4] = ["ce-type", "ce-specversion", "ce-source", "ce-id"];

/// CloudEvents HTTP transport encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingMode {
    /// Attributes in `ce-*` headers, payload as the raw body.
    Binary,
    /// The whole event as one JSON document in the body.
    Structured,
}

impl EncodingMode {
    /// Short name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingMode::Binary => "binary",
            EncodingMode::Structured => "structured",
        }
    }

    /// Label used in caller-facing failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            EncodingMode::Binary => "binary-mode message",
            EncodingMode::Structured => "structured-mode message",
        }
    }

    /// `Could not decode the request as a <label>.`
    pub fn failure_message(&self) -> String {
        format!("Could not decode the request as a {}.", self.label())
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide the encoding mode of a request from its header names.
pub fn select_mode(headers: &HeaderMap) -> EncodingMode {
    let missing: Vec<&str> = REQUIRED_BINARY_HEADERS
        .iter()
        .copied()
        .filter(|name| !headers.contains_key(*name))
        .collect();

    if missing.is_empty() {
        tracing::trace!(mode = "binary", "selected CloudEvent encoding");
        return EncodingMode::Binary;
    }

    if missing.len() < REQUIRED_BINARY_HEADERS.len() {
        tracing::debug!(
            ?missing,
            "request has some binary-mode CloudEvent headers but not all, decoding as structured-mode"
        );
    } else {
        tracing::trace!(mode = "structured", "selected CloudEvent encoding");
    }
    EncodingMode::Structured
}
