//! Error taxonomy for the arts API client.
//!
//! Every failed call resolves to exactly one [`ErrorKind`]:
//!
//! | Kind | Detected | Meaning |
//! |------|----------|---------|
//! | `client` | before any I/O | the caller violated a precondition (e.g. missing token) |
//! | `network` | during transport | connection failure, TLS failure or timeout |
//! | `http` | on a non-2xx status | may still carry the server envelope |
//! | `parse` | on a 2xx body | the body is not a valid `{code, msg, data}` envelope |
//! | `business` | on a 2xx envelope | `code != 0`; `msg` is suitable for display |
//!
//! The engine never builds an [`Error`] directly. It describes the failure as a
//! [`Failure`] and hands it to the client's [`ErrorFormatter`], so the caller-visible
//! message and code can be remapped (e.g. localized) per client instance.

use derive_more::{Display, Error};
use serde_json::Value;

use crate::Method;

// ============================================================================
// Error Kind & Context
// ============================================================================

/// The five failure classes of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Caller precondition violated before any network attempt.
    #[display("client")]
    Client,
    /// Transport failure or timeout.
    #[display("network")]
    Network,
    /// Non-2xx HTTP status.
    #[display("http")]
    Http,
    /// Response body is not a valid envelope.
    #[display("parse")]
    Parse,
    /// Valid envelope with a non-zero `code`.
    #[display("business")]
    Business,
}

/// The request that produced an error.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{method} {url}")]
pub struct ErrorContext {
    /// HTTP method of the request.
    pub method: Method,
    /// Fully built request URL.
    pub url: String,
}

impl ErrorContext {
    /// Create a new context.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }
}

// ============================================================================
// Failure & Formatter
// ============================================================================

/// Structured description of a failed call, handed to an [`ErrorFormatter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Failure class.
    pub kind: ErrorKind,
    /// Envelope or status code, when one exists.
    pub code: Option<i64>,
    /// Human-readable description.
    pub message: String,
    /// HTTP status, for `http` failures.
    pub status: Option<u16>,
    /// Echoed payload: envelope `data`, or the raw body text.
    pub data: Option<Value>,
    /// Set when a `network` failure was caused by the client deadline.
    pub timed_out: bool,
    /// Request that failed.
    pub context: ErrorContext,
}

impl Failure {
    fn new(kind: ErrorKind, context: ErrorContext, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            status: None,
            data: None,
            timed_out: false,
            context,
        }
    }

    /// A precondition failure detected before any I/O.
    #[must_use]
    pub fn client(context: ErrorContext, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Client, context, message)
    }

    /// A transport failure.
    #[must_use]
    pub fn network(context: ErrorContext, message: impl Into<String>, timed_out: bool) -> Self {
        Self {
            timed_out,
            ..Self::new(ErrorKind::Network, context, message)
        }
    }

    /// A non-2xx response.
    #[must_use]
    pub fn http(
        context: ErrorContext,
        status: u16,
        code: i64,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            code: Some(code),
            status: Some(status),
            data,
            ..Self::new(ErrorKind::Http, context, message)
        }
    }

    /// A body that is not a valid envelope; `raw` is the body text.
    #[must_use]
    pub fn parse(context: ErrorContext, message: impl Into<String>, raw: Option<String>) -> Self {
        Self {
            data: raw.map(Value::String),
            ..Self::new(ErrorKind::Parse, context, message)
        }
    }

    /// A valid envelope rejected by the server.
    #[must_use]
    pub fn business(
        context: ErrorContext,
        code: i64,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            code: Some(code),
            data: Some(data),
            ..Self::new(ErrorKind::Business, context, message)
        }
    }
}

/// Converts a [`Failure`] into the caller-visible [`Error`].
///
/// The formatter is chosen per client instance. It can rewrite the message,
/// code or kind of a failure, but always returns this crate's [`Error`]; callers
/// wanting their own error type convert from [`Error`] at the call site.
///
/// Any `Fn(Failure) -> Error` closure is a formatter:
///
/// ```
/// use arts_api_core::{Error, ErrorFormatter, ErrorKind, Failure};
///
/// let localized = |mut failure: Failure| {
///     if failure.kind == ErrorKind::Network {
///         failure.message = "网络连接失败".to_string();
///     }
///     Error::from(failure)
/// };
/// let _: &dyn ErrorFormatter = &localized;
/// ```
pub trait ErrorFormatter: Send + Sync + 'static {
    /// Build the error returned to the caller.
    fn format(&self, failure: Failure) -> Error;
}

impl<F> ErrorFormatter for F
where
    F: Fn(Failure) -> Error + Send + Sync + 'static,
{
    fn format(&self, failure: Failure) -> Error {
        self(failure)
    }
}

/// Formatter that maps each [`Failure`] field onto the matching [`Error`] variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorFormatter;

impl ErrorFormatter for DefaultErrorFormatter {
    fn format(&self, failure: Failure) -> Error {
        Error::from(failure)
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Caller-visible error of every client call.
#[derive(Debug, Clone, Display, Error)]
pub enum Error {
    /// A precondition the caller violated; nothing was sent.
    #[display("client error: {message} ({context})")]
    Client {
        /// Error message.
        message: String,
        /// Request that failed.
        context: ErrorContext,
    },

    /// The transport call failed or exceeded the client timeout.
    #[display("network error: {message} ({context})")]
    Network {
        /// Underlying transport failure description.
        message: String,
        /// Whether the client deadline expired.
        timed_out: bool,
        /// Request that failed.
        context: ErrorContext,
    },

    /// The server answered with a non-2xx status.
    #[display("HTTP error {status} (code {code}): {message} ({context})")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Envelope code, or the HTTP status when the body was not an envelope.
        code: i64,
        /// Envelope `msg`, or the status text.
        message: String,
        /// Envelope `data`, or the raw body text.
        data: Option<Value>,
        /// Request that failed.
        context: ErrorContext,
    },

    /// The body could not be read as the expected envelope.
    #[display("parse error: {message} ({context})")]
    Parse {
        /// Error message.
        message: String,
        /// Raw body text, when available.
        data: Option<Value>,
        /// Request that failed.
        context: ErrorContext,
    },

    /// The server rejected the call with a non-zero envelope code.
    #[display("{message} (code {code})")]
    Business {
        /// Envelope code.
        code: i64,
        /// Server-authored message.
        message: String,
        /// Envelope `data`.
        data: Value,
        /// Request that failed.
        context: ErrorContext,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        let Failure {
            kind,
            code,
            message,
            status,
            data,
            timed_out,
            context,
        } = failure;

        match kind {
            ErrorKind::Client => Self::Client { message, context },
            ErrorKind::Network => Self::Network {
                message,
                timed_out,
                context,
            },
            ErrorKind::Http => {
                let status = status.unwrap_or_default();
                Self::Http {
                    status,
                    code: code.unwrap_or_else(|| i64::from(status)),
                    message,
                    data,
                    context,
                }
            }
            ErrorKind::Parse => Self::Parse {
                message,
                data,
                context,
            },
            ErrorKind::Business => Self::Business {
                code: code.unwrap_or_default(),
                message,
                data: data.unwrap_or(Value::Null),
                context,
            },
        }
    }
}

impl Error {
    /// The failure class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Client { .. } => ErrorKind::Client,
            Self::Network { .. } => ErrorKind::Network,
            Self::Http { .. } => ErrorKind::Http,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Business { .. } => ErrorKind::Business,
        }
    }

    /// Envelope (or status) code for `http` and `business` errors.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Http { code, .. } | Self::Business { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Error message without the request context.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Client { message, .. }
            | Self::Network { message, .. }
            | Self::Http { message, .. }
            | Self::Parse { message, .. }
            | Self::Business { message, .. } => message,
        }
    }

    /// HTTP status for `http` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Echoed payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Http { data, .. } | Self::Parse { data, .. } => data.as_ref(),
            Self::Business { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Request that produced this error.
    #[must_use]
    pub const fn context(&self) -> &ErrorContext {
        match self {
            Self::Client { context, .. }
            | Self::Network { context, .. }
            | Self::Http { context, .. }
            | Self::Parse { context, .. }
            | Self::Business { context, .. } => context,
        }
    }

    /// URL of the failed request.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.context().url
    }

    /// Method of the failed request.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.context().method
    }

    /// Returns `true` for caller precondition errors.
    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// Returns `true` for transport errors.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns `true` for non-2xx responses.
    #[must_use]
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Returns `true` for malformed bodies.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns `true` for server-side business rejections.
    #[must_use]
    pub const fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// Returns `true` if the client deadline expired.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                timed_out: true,
                ..
            }
        )
    }

    /// Try to decode the echoed payload as `T`.
    ///
    /// Returns `None` when the error carries no payload.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct Shortfall { required: String }
    ///
    /// if let Err(err) = client.node().purchase(&order).await {
    ///     if let Some(Ok(shortfall)) = err.decode_data::<Shortfall>() {
    ///         println!("need {}", shortfall.required);
    ///     }
    /// }
    /// ```
    pub fn decode_data<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<std::result::Result<T, crate::DecodeError>> {
        self.data().map(|data| crate::from_value(data.clone()))
    }
}
