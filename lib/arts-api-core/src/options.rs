//! Per-call request options.
//!
//! [`RequestOptions`] is built by the caller, consumed once by the engine and
//! then dropped. A JSON body and a multipart form are mutually exclusive; the
//! [`Payload`] enum makes that explicit. Supplying both, or a body or query that
//! fails to serialize, does not panic: the builder records the problem and the
//! engine reports it as a `client` error before anything is sent.
//!
//! # Example
//!
//! ```
//! use arts_api_core::{AuthMode, RequestOptions};
//! use serde_json::json;
//!
//! let options = RequestOptions::new()
//!     .required()
//!     .query(&json!({"page": 1, "size": 20}))
//!     .header("X-Device", "ios")
//!     .language("zh-CN");
//!
//! assert_eq!(options.auth_mode(), AuthMode::Required);
//! assert_eq!(options.query_ref().to_query_string(), "page=1&size=20");
//! assert!(options.rejection().is_none());
//! ```

use derive_more::Display;
use serde_json::Value;

use crate::{Form, Query};

/// Whether a call needs the configured token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum AuthMode {
    /// Fail with a `client` error if no token is configured.
    #[display("required")]
    Required,
    /// Attach the token when one is configured.
    #[default]
    #[display("optional")]
    Optional,
    /// Never attach the token.
    #[display("none")]
    None,
}

/// The request body.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// A JSON document.
    Json(Value),
    /// A multipart form, sent as-is.
    Multipart(Form),
}

impl Payload {
    /// Returns `true` if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Options for a single call.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RequestOptions {
    auth: Option<AuthMode>,
    query: Query,
    payload: Payload,
    headers: Vec<(String, String)>,
    language: Option<String>,
    rejection: Option<String>,
}

impl RequestOptions {
    /// Empty options: optional auth, no query, no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auth mode.
    pub const fn auth(mut self, mode: AuthMode) -> Self {
        self.auth = Some(mode);
        self
    }

    /// Require a token.
    pub const fn required(self) -> Self {
        self.auth(AuthMode::Required)
    }

    /// Attach the token if present.
    pub const fn optional(self) -> Self {
        self.auth(AuthMode::Optional)
    }

    /// Never attach the token.
    pub const fn no_auth(self) -> Self {
        self.auth(AuthMode::None)
    }

    /// Merge the fields of a struct or map into the query.
    ///
    /// Non-object values are rejected; use [`query_param`](Self::query_param)
    /// for a single key.
    pub fn query<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Self {
        if let Err(e) = self.query.extend(value) {
            self.reject(e.to_string());
        }
        self
    }

    /// Add a single query parameter.
    pub fn query_param<T: serde::Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        if let Err(e) = self.query.param(key, value) {
            self.reject(e.to_string());
        }
        self
    }

    /// Set a JSON body.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => self.set_payload(Payload::Json(value)),
            Err(e) => self.reject(format!("body serialization error: {e}")),
        }
        self
    }

    /// Set a multipart body.
    pub fn multipart(mut self, form: Form) -> Self {
        self.set_payload(Payload::Multipart(form));
        self
    }

    /// Add a header. Computed headers (auth, language, content type) take precedence.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the client language for this call.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Effective auth mode.
    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.auth.unwrap_or_default()
    }

    /// Explicitly chosen auth mode, if any.
    #[must_use]
    pub const fn explicit_auth(&self) -> Option<AuthMode> {
        self.auth
    }

    /// The query built so far.
    #[must_use]
    pub const fn query_ref(&self) -> &Query {
        &self.query
    }

    /// The body.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Caller headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Per-call language override.
    #[must_use]
    pub fn language_override(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// The first problem recorded while building, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    /// Consume into (query, payload, headers, language).
    #[must_use]
    pub fn into_parts(self) -> (Query, Payload, Vec<(String, String)>, Option<String>) {
        (self.query, self.payload, self.headers, self.language)
    }

    fn set_payload(&mut self, payload: Payload) {
        if !self.payload.is_empty() {
            self.reject("a JSON body and multipart form data cannot be sent in the same call");
        }
        self.payload = payload;
    }

    fn reject(&mut self, message: impl Into<String>) {
        if self.rejection.is_none() {
            self.rejection = Some(message.into());
        }
    }
}
