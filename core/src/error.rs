//! Error types for the SMS client core.
//!
//! # Design
//! `ProtocolError` covers everything that can go wrong while turning bytes
//! into messages: codec failures and framing failures. It carries no I/O
//! source so codec tests can compare variants with `assert_eq!`.
//! `SmsError` is what callers of the client see; transport failures pass
//! through untouched as `Transport` and are never retried here.
//!
//! A response body that is not JSON is not an error at all: the client
//! reports it as a `None` parsed body.

use thiserror::Error;

/// Structural failures while decoding or framing a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Request or status line with the wrong token count, a version token
    /// without `/`, or a non-numeric status code.
    #[error("malformed status line: {line:?}")]
    MalformedStatusLine { line: String },

    /// Authorization header that is not `Basic <base64(user:pass)>`.
    #[error("invalid Authorization header: {reason}")]
    InvalidAuthorization { reason: String },

    #[error("message is not valid UTF-8")]
    InvalidUtf8,

    #[error("Content-Length header is missing")]
    MissingContentLength,

    #[error("invalid Content-Length value: {value:?}")]
    InvalidContentLength { value: String },

    /// The body holds fewer bytes than `Content-Length` declares.
    #[error("body truncated: declared {declared} bytes, got {actual}")]
    TruncatedBody { declared: usize, actual: usize },

    #[error("message head exceeds {max} bytes")]
    HeadTooLarge { max: usize },

    #[error("message body of {size} bytes exceeds maximum of {max}")]
    BodyTooLarge { size: usize, max: usize },

    /// The peer closed the stream before sending any byte of a message.
    #[error("connection closed by peer")]
    ConnectionClosed,
}

/// Errors returned by `SmsClient` and configuration loading.
#[derive(Error, Debug)]
pub enum SmsError {
    /// `send_sms` or `exchange` was called before `connect`.
    #[error("not connected: call connect() first")]
    NotConnected,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Connection refused, reset, or closed mid-read.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {message}")]
    Config { message: String },
}
