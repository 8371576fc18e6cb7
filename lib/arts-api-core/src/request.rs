//! Outgoing request representation.
//!
//! The URL is kept as the exact string produced by [`build_url`](crate::build_url):
//! with an empty base address it is root-relative and only a transport decides
//! whether it can be sent. Header names are stored lower-cased so a caller header
//! and a computed one with different casing never both reach the wire.
//!
//! # Example
//!
//! ```
//! use arts_api_core::{Request, Method};
//! use bytes::Bytes;
//!
//! let request = Request::<Bytes>::builder(Method::Get, "https://api.example.com/arts/health")
//!     .header("Accept", "application/json")
//!     .build();
//!
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: impl Into<String>) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers, keyed by lower-case name.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, String, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any previous value under the same name.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl RequestBuilder<Bytes> {
    /// Set a JSON body and its content type.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("content-type", crate::ContentType::Json.as_str())
            .body(body))
    }

    /// Set a multipart body and its content type, boundary included.
    #[must_use]
    pub fn multipart(self, form: crate::Form) -> Self {
        let content_type = form.content_type();
        self.header("content-type", content_type).body(form.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_basic() {
        let request = Request::<Bytes>::builder(Method::Get, "https://api.example.com/arts/work/list")
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url(), "https://api.example.com/arts/work/list");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn later_header_replaces_earlier_regardless_of_case() {
        let request = Request::<Bytes>::builder(Method::Get, "/arts/health")
            .header("accept-language", "en")
            .header("Accept-Language", "zh-CN")
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("ACCEPT-LANGUAGE"), Some("zh-CN"));
    }

    #[test]
    fn request_builder_headers_iter() {
        let request = Request::<Bytes>::builder(Method::Get, "/arts/health")
            .headers([("X-Trace", "1"), ("X-Device", "ios")])
            .build();

        assert_eq!(request.header("x-trace"), Some("1"));
        assert_eq!(request.header("x-device"), Some("ios"));
    }

    #[test]
    fn request_builder_json() {
        #[derive(serde::Serialize)]
        struct Login {
            address: String,
        }

        let request = Request::builder(Method::Post, "/arts/user/login")
            .json(&Login {
                address: "0xabc".to_string(),
            })
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body().map(Bytes::as_ref),
            Some(br#"{"address":"0xabc"}"#.as_slice())
        );
    }

    #[test]
    fn request_builder_multipart() {
        let form = crate::Form::new().text("title", "cover");
        let boundary = form.boundary().to_string();

        let request = Request::builder(Method::Post, "/arts/file/upload")
            .multipart(form)
            .build();

        let content_type = request.header("content-type").expect("content type");
        assert_eq!(content_type, format!("multipart/form-data; boundary={boundary}"));
        assert!(request.body().is_some());
    }
}
