//! Error types for batch dispatch.
//!
//! # Design
//! Every failure mode callers match on gets its own `ClientError` variant;
//! failures originating outside the double (the provider, a callback) are
//! wrapped with their original error attached as `source` rather than
//! flattened into a string. The first error of any kind aborts the entire
//! batch; no partial results are returned.

use thiserror::Error;

use crate::body::BodyError;

/// Failure type a [`ResponseProvider`] may return. Boxed so test authors
/// can inject whatever error their scenario calls for.
///
/// [`ResponseProvider`]: crate::ResponseProvider
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Failure returned by a callback's fallible delivery steps.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CallbackError {
    message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a dispatch batch was aborted.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A handle was passed to `perform_requests` more than once.
    #[error("handles cannot be used more than once")]
    HandleReuse,

    /// The request has a body but no `Content-Length` header; only requests
    /// with a known length are supported.
    #[error("request has a body but no Content-Length header")]
    MissingContentLength,

    /// `Content-Length` was present but not a non-negative decimal integer.
    #[error("unexpected Content-Length value: {0:?}")]
    MalformedContentLength(String),

    /// The bounded body read failed outright.
    #[error("body read failed")]
    BodyRead(#[source] BodyError),

    /// The bounded body read returned fewer bytes than `Content-Length`
    /// declared. The double does not loop to accumulate more; an exact
    /// one-call read is part of the contract under test.
    #[error("body read returned {actual} bytes, expected {expected}")]
    ShortRead { expected: usize, actual: usize },

    /// The exhaustion probe found the body source still willing to produce
    /// data (or failing in an unexpected way) past its declared length.
    #[error("body source not exhausted after Content-Length bytes: {0}")]
    Overrun(String),

    /// The response provider failed for this request.
    #[error("response provider failed")]
    Provider(#[source] ProviderError),

    /// A fallible callback step rejected the response.
    #[error("callback {stage} failed")]
    Callback {
        stage: &'static str,
        #[source]
        source: CallbackError,
    },
}
