//! Error types for the call factory.
//!
//! # Design
//! Every failure is surfaced to the caller as a `CallError`; nothing is
//! retried or swallowed inside the crate. Transport failures keep the
//! underlying error as their `source()` so callers can tell DNS, refused
//! connection and TLS failures apart and decide whether to reissue the call.

/// Boxed transport error, kept free of any particular HTTP client type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned while building, encoding, sending or classifying a call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The URL could not be parsed, or is not an http(s) URL.
    #[error("malformed URL `{url}`: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// A body was supplied but no `Content-Type` header was set.
    #[error("cannot encode a body without a Content-Type header")]
    MissingContentType,

    /// The `Content-Type` header names a media type the encoder does not handle.
    #[error("content type not supported for request bodies: {0}")]
    ContentTypeNotSupported(String),

    /// A body claimed to be JSON but is not a valid JSON object.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The payload cannot be serialized for the declared content type.
    #[error("payload not serializable: {0}")]
    NotSerializable(String),

    /// The descriptor already carries an encoded body.
    #[error("request body already set")]
    BodyAlreadySet,

    /// The connect or read timeout elapsed.
    #[error("timed out: {0}")]
    Timeout(#[source] BoxError),

    /// Any other transport-level failure.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// Reading the response stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
