//! Core types for the arts platform API client.
//!
//! This crate holds everything that does not perform I/O:
//! - [`build_url`] and [`Query`] - the query/URL builder
//! - [`parse_envelope`] and [`Envelope`] - the `{code, msg, data}` codec
//! - [`Error`], [`Failure`] and [`ErrorFormatter`] - the error taxonomy
//! - [`RequestOptions`], [`AuthMode`] and [`Payload`] - per-call options
//! - [`Endpoint`] - static route descriptors used by generated modules
//! - [`Request`], [`Response`], [`Form`] - wire-level values exchanged with a transport
//! - [`TransportError`] - what a transport reports when no response arrived

mod body;
mod endpoint;
mod envelope;
mod error;
mod method;
mod multipart;
mod options;
pub mod prelude;
mod query;
mod request;
mod response;
mod transport;

pub use body::{ContentType, DecodeError, from_json, from_value, to_json};
pub use endpoint::{Endpoint, ResponseMode};
pub use envelope::{Envelope, EnvelopeError, RawEnvelope, SUCCESS_CODE, parse_envelope};
pub use error::{
    DefaultErrorFormatter, Error, ErrorContext, ErrorFormatter, ErrorKind, Failure, Result,
};
pub use method::Method;
pub use multipart::{Form, Part};
pub use options::{AuthMode, Payload, RequestOptions};
pub use query::{API_ROOT, Query, QueryError, QueryValue, build_url, build_url_with_root};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::TransportError;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
