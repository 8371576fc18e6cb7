//! Transport-level failures.
//!
//! A transport is anything that turns a [`Request`](crate::Request) into a
//! [`Response`](crate::Response). It reports failures as [`TransportError`];
//! the request engine folds these into the `client` and `network` error kinds.

use std::time::Duration;

use derive_more::{Display, Error};

/// Failure raised by a transport before a response was received.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// The call exceeded its deadline.
    #[display("request timed out after {}ms", _0.as_millis())]
    Timeout(#[error(not(source))] Duration),

    /// Connection could not be established or was dropped.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns `true` if the failure happened before anything was sent
    /// because the request itself was unusable.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}
