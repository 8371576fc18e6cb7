//! The client facade.
//!
//! [`Client`] owns the shared configuration and one instance of every domain
//! module. All modules share the same [`Engine`], so a token set through
//! [`Client::set_token`] is seen by the next call of any module.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::config::{ClientConfig, TransportConfig};
use crate::engine::Engine;
use crate::middleware::LoggingLayer;
use crate::modules::{
    AdminModule, ChannelModule, ConsignmentModule, DepositModule, FileModule, HealthModule,
    NodeModule, StaticModule, TicketModule, UserModule, WorkModule,
};
use crate::transport::{BoxedTransport, HyperTransport};
use crate::{DefaultErrorFormatter, ErrorFormatter, Request, Response, TransportError};

/// Environment variables read, in order, when no base address is given.
pub const BASE_URL_ENV_VARS: [&str; 3] = [
    "ARTS_API_BASE_URL",
    "NEXT_PUBLIC_API_BASE_URL",
    "EXPO_PUBLIC_API_BASE_URL",
];

// ============================================================================
// Client
// ============================================================================

/// Typed client for the arts platform API.
///
/// # Example
///
/// ```ignore
/// use arts_api::prelude::*;
///
/// let client = Client::builder()
///     .base_url("https://api.example.com")
///     .language("zh-CN")
///     .build();
///
/// let nonce = client.user().nonce("0xabc").await?;
/// let login = client.user().login(&LoginRequest::new("0xabc", "0xsig", nonce.nonce)).await?;
/// client.set_token(login.token);
///
/// let profile = client.user().profile().await?;
/// ```
#[derive(Clone)]
pub struct Client {
    engine: Engine,
    user: UserModule,
    work: WorkModule,
    file: FileModule,
    statics: StaticModule,
    node: NodeModule,
    deposit: DepositModule,
    ticket: TicketModule,
    consignment: ConsignmentModule,
    channel: ChannelModule,
    health: HealthModule,
    admin: AdminModule,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client with default settings.
    ///
    /// The base address comes from the environment, see [`BASE_URL_ENV_VARS`].
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client for the given base address.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn from_engine(engine: Engine) -> Self {
        Self {
            user: UserModule::new(engine.clone()),
            work: WorkModule::new(engine.clone()),
            file: FileModule::new(engine.clone()),
            statics: StaticModule::new(engine.clone()),
            node: NodeModule::new(engine.clone()),
            deposit: DepositModule::new(engine.clone()),
            ticket: TicketModule::new(engine.clone()),
            consignment: ConsignmentModule::new(engine.clone()),
            channel: ChannelModule::new(engine.clone()),
            health: HealthModule::new(engine.clone()),
            admin: AdminModule::new(engine.clone()),
            engine,
        }
    }

    // ========================================================================
    // Shared configuration
    // ========================================================================

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        self.engine.config()
    }

    /// Current base address.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.engine.config().base_url().to_string()
    }

    /// Current token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.engine.config().token().map(str::to_string)
    }

    /// Current preferred language.
    #[must_use]
    pub fn language(&self) -> Option<String> {
        self.engine.config().language().map(str::to_string)
    }

    /// Current per-call deadline.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.engine.config().timeout()
    }

    /// Replace the base address. Trailing slashes are dropped.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.engine
            .update_config(|config| config.set_base_url(base_url));
    }

    /// Set the token attached to authenticated calls.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.engine
            .update_config(|config| config.set_token(Some(token)));
    }

    /// Forget the token, e.g. on logout.
    pub fn clear_token(&self) {
        self.engine.update_config(|config| config.set_token(None));
    }

    /// Set the preferred language sent as `Accept-Language`.
    pub fn set_language(&self, language: impl Into<String>) {
        let language = language.into();
        self.engine
            .update_config(|config| config.set_language(Some(language)));
    }

    /// Stop sending a default language.
    pub fn clear_language(&self) {
        self.engine
            .update_config(|config| config.set_language(None));
    }

    /// Set or remove the per-call deadline.
    pub fn set_timeout(&self, timeout: Option<Duration>) {
        self.engine
            .update_config(|config| config.set_timeout(timeout));
    }

    // ========================================================================
    // Modules
    // ========================================================================

    /// Account, login and invitation calls.
    #[must_use]
    pub const fn user(&self) -> &UserModule {
        &self.user
    }

    /// Works catalog.
    #[must_use]
    pub const fn work(&self) -> &WorkModule {
        &self.work
    }

    /// Uploads and downloads.
    #[must_use]
    pub const fn file(&self) -> &FileModule {
        &self.file
    }

    /// Static assets and app configuration.
    #[must_use]
    pub const fn statics(&self) -> &StaticModule {
        &self.statics
    }

    /// Mining nodes.
    #[must_use]
    pub const fn node(&self) -> &NodeModule {
        &self.node
    }

    /// Deposits and withdrawals.
    #[must_use]
    pub const fn deposit(&self) -> &DepositModule {
        &self.deposit
    }

    /// Tickets.
    #[must_use]
    pub const fn ticket(&self) -> &TicketModule {
        &self.ticket
    }

    /// Secondary market.
    #[must_use]
    pub const fn consignment(&self) -> &ConsignmentModule {
        &self.consignment
    }

    /// Distribution channels.
    #[must_use]
    pub const fn channel(&self) -> &ChannelModule {
        &self.channel
    }

    /// Liveness and version.
    #[must_use]
    pub const fn health(&self) -> &HealthModule {
        &self.health
    }

    /// Back-office calls.
    #[must_use]
    pub const fn admin(&self) -> &AdminModule {
        &self.admin
    }

    /// The shared engine, for calls no module covers.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }
}

// ============================================================================
// Builder
// ============================================================================

type LayerFn = Arc<dyn Fn(BoxedTransport) -> BoxedTransport + Send + Sync>;

/// Builder for [`Client`].
///
/// # Example
///
/// ```ignore
/// use arts_api::Client;
/// use std::time::Duration;
///
/// let client = Client::builder()
///     .base_url("https://api.example.com/")
///     .token("t0k3n")
///     .timeout(Duration::from_secs(15))
///     .with_logging()
///     .build();
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
    auth_header: Option<String>,
    auth_scheme: Option<Option<String>>,
    formatter: Option<Arc<dyn ErrorFormatter>>,
    transport_config: TransportConfig,
    transport: Option<BoxedTransport>,
    layers: Vec<LayerFn>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("transport_config", &self.transport_config)
            .field("custom_transport", &self.transport.is_some())
            .field("layers_count", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Set the base address. Without one, the environment is consulted.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the initial token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the initial preferred language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the per-call deadline. No deadline by default.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the header carrying the token (default `Authorization`).
    #[must_use]
    pub fn auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = Some(header.into());
        self
    }

    /// Set the token scheme (default `Bearer`); `None` sends the bare token.
    #[must_use]
    pub fn auth_scheme(mut self, scheme: Option<&str>) -> Self {
        self.auth_scheme = Some(scheme.map(str::to_string));
        self
    }

    /// Set the error formatter.
    #[must_use]
    pub fn error_formatter(mut self, formatter: impl ErrorFormatter) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Configure the default hyper transport.
    #[must_use]
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Replace the hyper transport with any tower service.
    #[must_use]
    pub fn transport<S>(mut self, service: S) -> Self
    where
        S: Service<Request<Bytes>, Response = Response<Bytes>, Error = TransportError>
            + Clone
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        self.transport = Some(BoxCloneService::new(service));
        self
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Add a tower layer around the transport.
    ///
    /// Layers see the request after auth and language headers are attached.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedTransport> + Send + Sync + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = TransportError>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send + 'static,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add info-level transport logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level transport logging (header names and body sizes).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client {
        let base_url = resolve_base_url(self.base_url, |name| std::env::var(name).ok());

        let mut config = ClientConfig::new(base_url);
        config.set_token(self.token);
        config.set_language(self.language);
        config.set_timeout(self.timeout);
        if let Some(header) = self.auth_header {
            config.set_auth_header(header);
        }
        if let Some(scheme) = self.auth_scheme {
            config.set_auth_scheme(scheme);
        }

        let mut transport = self.transport.unwrap_or_else(|| {
            BoxCloneService::new(HyperTransport::new(&self.transport_config))
        });

        // Each layer wraps the ones added before it
        for layer_fn in self.layers {
            transport = layer_fn(transport);
        }

        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(DefaultErrorFormatter));

        Client::from_engine(Engine::new(
            config,
            formatter,
            transport,
            self.transport_config.user_agent,
        ))
    }
}

/// First non-empty of the explicit base address and [`BASE_URL_ENV_VARS`].
///
/// Nothing found yields an empty base, i.e. root-relative URLs.
fn resolve_base_url(explicit: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> String {
    explicit
        .into_iter()
        .chain(BASE_URL_ENV_VARS.iter().filter_map(|name| lookup(name)))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}
