//! Prelude module for convenient imports.
//!
//! ```ignore
//! use arts_api_core::prelude::*;
//! ```

pub use crate::{
    AuthMode, Endpoint, Envelope, Error, ErrorFormatter, ErrorKind, Failure, Form, Method, Part,
    Payload, Query, RequestOptions, ResponseMode, Result, build_url,
};
