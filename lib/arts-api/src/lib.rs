//! Typed async client for the arts media and token platform API.
//!
//! One [`Client`] holds the shared configuration (base address, token,
//! language, timeout) and exposes every domain as a module of typed calls:
//!
//! ```ignore
//! use arts_api::prelude::*;
//!
//! let client = Client::builder()
//!     .base_url("https://api.example.com")
//!     .with_logging()
//!     .build();
//!
//! let works = client.work().list(&WorkQuery::default()).await?;
//!
//! match client.node().purchase(&order).await {
//!     Ok(receipt) => println!("bought {}", receipt.order_id),
//!     Err(err) if err.is_business() => println!("{}", err.message()),
//!     Err(err) => return Err(err),
//! }
//! ```
//!
//! Every failure is an [`Error`] of one of five kinds (`client`, `network`,
//! `http`, `parse`, `business`); see [`ErrorKind`]. Only `business` errors are
//! expected in normal flows.
//!
//! Calls no module covers go through the [`Engine`] directly:
//!
//! ```ignore
//! let envelope: Envelope<serde_json::Value> = client
//!     .engine()
//!     .request_json(Method::Get, "/arts/user/tasks", RequestOptions::new().required())
//!     .await?;
//! ```

// Generated module code refers to `::arts_api`
extern crate self as arts_api;

mod client;
mod config;
mod connector;
mod engine;
pub mod middleware;
pub mod modules;
pub mod prelude;
mod transport;

pub use client::{BASE_URL_ENV_VARS, Client, ClientBuilder};
pub use config::{
    ClientConfig, DEFAULT_AUTH_HEADER, DEFAULT_AUTH_SCHEME, DEFAULT_USER_AGENT, TransportConfig,
    TransportConfigBuilder,
};
pub use connector::https_connector;
pub use engine::{Engine, TOKEN_MISSING};
pub use transport::{BoxedTransport, HyperTransport, TransportFuture};

// Re-export core types
pub use arts_api_core::{
    API_ROOT, AuthMode, ContentType, DecodeError, DefaultErrorFormatter, Endpoint, Envelope,
    EnvelopeError, Error, ErrorContext, ErrorFormatter, ErrorKind, Failure, Form, Method, Part,
    Payload, Query, QueryError, QueryValue, RawEnvelope, Request, RequestBuilder, RequestOptions,
    Response, ResponseMode, Result, SUCCESS_CODE, TransportError, build_url, build_url_with_root,
    from_json, parse_envelope, to_json,
};

// Re-export http types for status codes and headers
pub use arts_api_core::{StatusCode, header};

// Re-export crates for middleware composition and generated code
pub use serde_json;
pub use tower;

pub use arts_api_macro::api_module;
