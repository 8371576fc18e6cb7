//! Static endpoint descriptors.
//!
//! Every module method is described by a `const` [`Endpoint`]: verb, path
//! template, auth mode and how the response is consumed. The module macro emits
//! one per method and the engine's `invoke_*` functions execute it.
//!
//! ```
//! use arts_api_core::{AuthMode, Endpoint, Method};
//!
//! const LIKE: Endpoint = Endpoint::new("work", "like", Method::Post, "/arts/work/{id}/like")
//!     .auth(AuthMode::Required);
//!
//! assert_eq!(
//!     LIKE.render_path(&[("id", "a/b c".to_string())]),
//!     "/arts/work/a%2Fb%20c/like"
//! );
//! ```

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{AuthMode, Method};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// How a successful response is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseMode {
    /// Decode the `{code, msg, data}` envelope.
    #[default]
    Json,
    /// Return the body bytes unmodified.
    Binary,
    /// Return the whole response.
    Raw,
}

/// A single API route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Module the endpoint belongs to (e.g. `user`).
    pub module: &'static str,
    /// Method name within the module.
    pub name: &'static str,
    /// HTTP verb.
    pub method: Method,
    /// Path template with `{name}` placeholders.
    pub path: &'static str,
    /// Auth requirement.
    pub auth: AuthMode,
    /// Response handling.
    pub response: ResponseMode,
}

impl Endpoint {
    /// Describe an endpoint with optional auth and a JSON response.
    #[must_use]
    pub const fn new(
        module: &'static str,
        name: &'static str,
        method: Method,
        path: &'static str,
    ) -> Self {
        Self {
            module,
            name,
            method,
            path,
            auth: AuthMode::Optional,
            response: ResponseMode::Json,
        }
    }

    /// Set the auth mode.
    #[must_use]
    pub const fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Set the response mode.
    #[must_use]
    pub const fn response(mut self, response: ResponseMode) -> Self {
        self.response = response;
        self
    }

    /// Substitute `{name}` placeholders, percent-encoding each value on its own.
    ///
    /// Placeholders without a value are left as-is.
    #[must_use]
    pub fn render_path(&self, params: &[(&str, String)]) -> String {
        params
            .iter()
            .fold(self.path.to_string(), |path, (name, value)| {
                let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
                path.replace(&format!("{{{name}}}"), &encoded)
            })
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} ({} {})", self.module, self.name, self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: Endpoint = Endpoint::new("work", "detail", Method::Get, "/arts/work/{id}");

    #[test]
    fn defaults() {
        assert_eq!(DETAIL.auth, AuthMode::Optional);
        assert_eq!(DETAIL.response, ResponseMode::Json);

        let download = DETAIL
            .auth(AuthMode::None)
            .response(ResponseMode::Binary);
        assert_eq!(download.auth, AuthMode::None);
        assert_eq!(download.response, ResponseMode::Binary);
    }

    #[test]
    fn each_segment_is_encoded_separately() {
        let endpoint = Endpoint::new(
            "admin",
            "review",
            Method::Post,
            "/arts/admin/{kind}/{id}/review",
        );
        let path = endpoint.render_path(&[
            ("kind", "work".to_string()),
            ("id", "a/b?c#d%".to_string()),
        ]);

        assert_eq!(path, "/arts/admin/work/a%2Fb%3Fc%23d%25/review");
    }

    #[test]
    fn non_ascii_is_utf8_encoded() {
        assert_eq!(
            DETAIL.render_path(&[("id", "夜".to_string())]),
            "/arts/work/%E5%A4%9C"
        );
    }

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(
            DETAIL.render_path(&[("id", "w-1_2.3~x".to_string())]),
            "/arts/work/w-1_2.3~x"
        );
    }

    #[test]
    fn display() {
        assert_eq!(DETAIL.to_string(), "work.detail (GET /arts/work/{id})");
    }
}
