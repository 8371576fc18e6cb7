//! Client configuration types.
//!
//! [`ClientConfig`] is the mutable state shared by every module of a client
//! (base address, token, language, timeout). [`TransportConfig`] tunes the HTTP
//! transport and is fixed once the client is built.

use std::fmt;
use std::time::Duration;

/// Default header carrying the token.
pub const DEFAULT_AUTH_HEADER: &str = "Authorization";

/// Default scheme prefixed to the token.
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("arts-api/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Client Config
// ============================================================================

/// Shared, mutable client configuration.
///
/// The base address is stored without trailing slashes, whatever the caller
/// passes in.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
    auth_header: String,
    auth_scheme: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            language: None,
            timeout: None,
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            auth_scheme: Some(DEFAULT_AUTH_SCHEME.to_string()),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("auth_header", &self.auth_header)
            .field("auth_scheme", &self.auth_scheme)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with the given base address.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set_base_url(base_url);
        config
    }

    /// Base address, without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Preferred language.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Per-call deadline.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Header carrying the token.
    #[must_use]
    pub fn auth_header(&self) -> &str {
        &self.auth_header
    }

    /// Scheme prefixed to the token, if any.
    #[must_use]
    pub fn auth_scheme(&self) -> Option<&str> {
        self.auth_scheme.as_deref()
    }

    /// Value of the auth header for the current token.
    #[must_use]
    pub fn auth_value(&self) -> Option<String> {
        let token = self.token.as_deref()?;
        Some(match self.auth_scheme.as_deref() {
            Some(scheme) => format!("{scheme} {token}"),
            None => token.to_string(),
        })
    }

    /// Replace the base address.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
    }

    /// Replace the token. An empty token clears it.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|token| !token.is_empty());
    }

    /// Replace the preferred language. An empty value clears it.
    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language.filter(|language| !language.is_empty());
    }

    /// Replace the per-call deadline.
    pub const fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Replace the auth header name.
    pub fn set_auth_header(&mut self, header: impl Into<String>) {
        self.auth_header = header.into();
    }

    /// Replace the auth scheme; `None` sends the bare token.
    pub fn set_auth_scheme(&mut self, scheme: Option<String>) {
        self.auth_scheme = scheme;
    }
}

// ============================================================================
// Transport Config
// ============================================================================

/// Configuration for the hyper transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TransportConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for [`TransportConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TransportConfigBuilder {
    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed_on_every_write() {
        let mut config = ClientConfig::new("https://api.example.com/arts///");
        assert_eq!(config.base_url(), "https://api.example.com/arts");

        config.set_base_url("https://staging.example.com/");
        assert_eq!(config.base_url(), "https://staging.example.com");
    }

    #[test]
    fn auth_value_uses_scheme() {
        let mut config = ClientConfig::default();
        assert_eq!(config.auth_value(), None);

        config.set_token(Some("t0k3n".to_string()));
        assert_eq!(config.auth_value().as_deref(), Some("Bearer t0k3n"));

        config.set_auth_scheme(None);
        assert_eq!(config.auth_value().as_deref(), Some("t0k3n"));
    }

    #[test]
    fn empty_token_and_language_clear() {
        let mut config = ClientConfig::default();
        config.set_token(Some(String::new()));
        config.set_language(Some(String::new()));

        assert!(config.token().is_none());
        assert!(config.language().is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let mut config = ClientConfig::default();
        config.set_token(Some("secret-token".to_string()));

        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"), "{debug}");
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn default_transport_config() {
        let config = TransportConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_idle_per_host, 32);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert!(config.user_agent.starts_with("arts-api/"));
    }

    #[test]
    fn transport_builder_overrides() {
        let config = TransportConfig::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_per_host(4)
            .user_agent("arts-web/2.1")
            .build();

        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.pool_idle_per_host, 4);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert_eq!(config.user_agent, "arts-web/2.1");
    }
}
