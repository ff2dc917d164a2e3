//! How many body bytes the decoder will buffer.
//!
//! Both encodings need the whole body before JSON parsing can start. The
//! cap is enforced while the body streams in, so reading stops as soon as
//! an oversized event crosses it.

/// Default cap on a CloudEvent body: 4 MB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 4 * 1024 * 1024;

/// Body size cap for one decode.
///
/// [`CloudEventDecoder`](crate::CloudEventDecoder) carries one directly.
/// The [`CloudEventRequest`](crate::CloudEventRequest) extractor reads it
/// from request extensions, so a router configures it with
/// `.layer(Extension(BodyLimits::new(64 * 1024)))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyLimits {
    /// `None` means unlimited.
    max_body_size: Option<usize>,
}

impl Default for BodyLimits {
    fn default() -> Self {
        Self {
            max_body_size: Some(DEFAULT_MAX_BODY_SIZE),
        }
    }
}

impl BodyLimits {
    /// Cap bodies at `max_body_size` bytes.
    pub fn new(max_body_size: usize) -> Self {
        Self {
            max_body_size: Some(max_body_size),
        }
    }

    /// Buffer bodies of any size. Meant for senders you control.
    pub fn unlimited() -> Self {
        Self {
            max_body_size: None,
        }
    }

    /// `None` when unlimited.
    pub fn max_body_size(&self) -> Option<usize> {
        self.max_body_size
    }

    /// Check an already-buffered body, as passed to
    /// [`CloudEventDecoder::decode_parts`](crate::CloudEventDecoder::decode_parts).
    pub fn check_size(&self, size: usize) -> Result<(), BodyTooLarge> {
        match self.max_body_size {
            Some(limit) if size > limit => Err(BodyTooLarge { limit }),
            _ => Ok(()),
        }
    }
}

/// The body is longer than the configured cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("request body exceeds maximum allowed size of {limit} bytes")]
pub struct BodyTooLarge {
    pub limit: usize,
}
