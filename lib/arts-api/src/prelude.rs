//! Prelude module for convenient imports.
//!
//! Brings the client, the error types and every module trait into scope, so
//! module calls like `client.user().profile()` resolve:
//!
//! ```ignore
//! use arts_api::prelude::*;
//! ```

pub use crate::modules::*;
pub use crate::{
    AuthMode, Client, ClientBuilder, Envelope, Error, ErrorFormatter, ErrorKind, Failure, Form,
    Method, Part, RequestOptions, Response, Result,
};
pub use serde::{Deserialize, Serialize};
