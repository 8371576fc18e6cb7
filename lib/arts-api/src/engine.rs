//! The request engine.
//!
//! Every call goes through the same lifecycle:
//!
//! 1. **Building**: snapshot the shared [`ClientConfig`], build the URL and
//!    surface any problem recorded by [`RequestOptions`] as a `client` error.
//! 2. **Authorizing**: resolve the auth mode, attach the token, language and
//!    body. A required token that is missing fails here, before any I/O.
//! 3. **Transporting**: run the transport, under the configured deadline.
//! 4. **Classifying**: turn the response into a value or exactly one error kind.
//!
//! Mutating the shared configuration affects every call that has not yet
//! taken its snapshot in step 1; calls already past it keep what they captured.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, Level, debug, span, warn};

use crate::config::ClientConfig;
use crate::transport::{BoxedTransport, SyncTransport};
use crate::{
    AuthMode, ContentType, Endpoint, Envelope, Error, ErrorContext, ErrorFormatter, Failure,
    Method, Payload, Request, RequestOptions, Response, Result, TransportError, build_url,
    parse_envelope,
};

/// Message of the `client` error raised when a call needs a token and none is set.
pub const TOKEN_MISSING: &str = "token required but missing";

/// Shared request engine.
///
/// Cloning is cheap; every clone sees the same configuration, formatter and
/// transport. Generated modules hold a clone and call the `invoke_*` methods.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: RwLock<ClientConfig>,
    formatter: Arc<dyn ErrorFormatter>,
    transport: SyncTransport,
    user_agent: String,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &*self.read_config())
            .field("user_agent", &self.inner.user_agent)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub(crate) fn new(
        config: ClientConfig,
        formatter: Arc<dyn ErrorFormatter>,
        transport: BoxedTransport,
        user_agent: String,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config: RwLock::new(config),
                formatter,
                transport: SyncTransport::new(transport),
                user_agent,
            }),
        }
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        self.read_config().clone()
    }

    fn read_config(&self) -> RwLockReadGuard<'_, ClientConfig> {
        self.inner
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the shared configuration.
    pub(crate) fn update_config<R>(&self, update: impl FnOnce(&mut ClientConfig) -> R) -> R {
        let mut config = self
            .inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut config)
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Send a call and decode the `{code, msg, data}` envelope.
    ///
    /// Returns the whole envelope; a non-zero `code` is a `business` error.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Envelope<T>> {
        self.execute(method, path, options, Call::json::<T>).await
    }

    /// Send a call and return the body bytes of a 2xx response unmodified.
    pub async fn request_bytes(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Bytes> {
        self.execute(method, path, options, Call::bytes).await
    }

    /// Send a call and return the whole 2xx response.
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response<Bytes>> {
        self.execute(method, path, options, Call::raw).await
    }

    /// Call an endpoint and return the envelope's `data`.
    ///
    /// The endpoint's auth mode applies unless `options` set one explicitly.
    /// `path` is the endpoint path with its placeholders already rendered.
    pub async fn invoke_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        path: String,
        options: RequestOptions,
    ) -> Result<T> {
        let options = with_endpoint_auth(endpoint, options);
        self.request_json(endpoint.method, &path, options)
            .instrument(endpoint_span(endpoint))
            .await
            .map(Envelope::into_data)
    }

    /// Call a binary endpoint.
    pub async fn invoke_bytes(
        &self,
        endpoint: &Endpoint,
        path: String,
        options: RequestOptions,
    ) -> Result<Bytes> {
        let options = with_endpoint_auth(endpoint, options);
        self.request_bytes(endpoint.method, &path, options)
            .instrument(endpoint_span(endpoint))
            .await
    }

    /// Call an endpoint returning the raw response.
    pub async fn invoke_raw(
        &self,
        endpoint: &Endpoint,
        path: String,
        options: RequestOptions,
    ) -> Result<Response<Bytes>> {
        let options = with_endpoint_auth(endpoint, options);
        self.request_raw(endpoint.method, &path, options)
            .instrument(endpoint_span(endpoint))
            .await
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        classify: impl FnOnce(&Call, Response<Bytes>) -> Result<T>,
    ) -> Result<T> {
        let span = span!(Level::INFO, "api_request", %method, path);

        async move {
            let result = match self.dispatch(method, path, options).await {
                Ok((call, response)) => classify(&call, response),
                Err(err) => Err(err),
            };

            match &result {
                Ok(_) => debug!("request succeeded"),
                Err(err) => warn!(kind = %err.kind(), code = ?err.code(), error = %err, "request failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Building, authorizing and transporting.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<(Call, Response<Bytes>)> {
        let config = self.config();
        let auth = options.auth_mode();
        let rejection = options.rejection().map(str::to_string);
        let (query, payload, headers, language) = options.into_parts();

        let url = build_url(config.base_url(), path, Some(&query));
        let call = Call {
            context: ErrorContext::new(method, url.clone()),
            formatter: Arc::clone(&self.inner.formatter),
        };
        debug!(phase = "building", %url);

        if let Some(reason) = rejection {
            return Err(call.client(reason));
        }

        let mut builder = Request::builder(method, url)
            .headers(headers)
            .header("accept", ContentType::Json.as_str())
            .header("user-agent", self.inner.user_agent.as_str());

        let token = match auth {
            AuthMode::None => None,
            AuthMode::Optional => config.auth_value(),
            AuthMode::Required => Some(config.auth_value().ok_or_else(|| call.client(TOKEN_MISSING))?),
        };
        let token_attached = token.is_some();
        if let Some(value) = token {
            builder = builder.header(config.auth_header(), value);
        }

        let language = language.or_else(|| config.language().map(str::to_string));
        if let Some(language) = &language {
            builder = builder.header("accept-language", language.as_str());
        }

        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder
                .json(&value)
                .map_err(|e| call.client(format!("body serialization error: {e}")))?,
            Payload::Multipart(form) => builder.multipart(form),
        };
        debug!(phase = "authorizing", %auth, token_attached, language = language.as_deref());

        let request = builder.build();
        let timeout = config.timeout();
        debug!(phase = "transporting", ?timeout);

        let response = match timeout {
            Some(timeout) => with_deadline(timeout, self.inner.transport.call(request)).await,
            None => self.inner.transport.call(request).await,
        }
        .map_err(|err| call.transport(&err))?;

        debug!(status = response.status(), "response received");
        Ok((call, response))
    }
}

async fn with_deadline(
    timeout: std::time::Duration,
    future: impl Future<Output = std::result::Result<Response<Bytes>, TransportError>>,
) -> std::result::Result<Response<Bytes>, TransportError> {
    tokio::time::timeout(timeout, future)
        .await
        .unwrap_or_else(|_| Err(TransportError::Timeout(timeout)))
}

fn with_endpoint_auth(endpoint: &Endpoint, options: RequestOptions) -> RequestOptions {
    if options.explicit_auth().is_some() {
        options
    } else {
        options.auth(endpoint.auth)
    }
}

fn endpoint_span(endpoint: &Endpoint) -> tracing::Span {
    span!(
        Level::DEBUG,
        "endpoint",
        module = endpoint.module,
        name = endpoint.name
    )
}

// ============================================================================
// Classification
// ============================================================================

/// One call in flight: where it went and how to report its failures.
struct Call {
    context: ErrorContext,
    formatter: Arc<dyn ErrorFormatter>,
}

impl Call {
    fn fail(&self, failure: Failure) -> Error {
        self.formatter.format(failure)
    }

    fn client(&self, message: impl Into<String>) -> Error {
        self.fail(Failure::client(self.context.clone(), message))
    }

    fn transport(&self, err: &TransportError) -> Error {
        let failure = if err.is_invalid_request() {
            Failure::client(self.context.clone(), err.to_string())
        } else {
            Failure::network(self.context.clone(), err.to_string(), err.is_timeout())
        };
        self.fail(failure)
    }

    /// Non-2xx responses are `http` errors, with the envelope when there is one.
    fn check_status(&self, response: &Response<Bytes>) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }

        let status = response.status();
        let failure = match parse_envelope(response.body()) {
            Ok(envelope) => Failure::http(
                self.context.clone(),
                status,
                envelope.code,
                envelope.msg,
                Some(envelope.data),
            ),
            Err(_) => {
                let message = match response.status_text() {
                    "" => format!("HTTP {status}"),
                    text => text.to_string(),
                };
                Failure::http(
                    self.context.clone(),
                    status,
                    i64::from(status),
                    message,
                    Some(Value::String(response.text_lossy())),
                )
            }
        };
        Err(self.fail(failure))
    }

    fn json<T: DeserializeOwned>(&self, response: Response<Bytes>) -> Result<Envelope<T>> {
        self.check_status(&response)?;

        let envelope = parse_envelope(response.body()).map_err(|err| {
            let message = err.to_string();
            self.fail(Failure::parse(
                self.context.clone(),
                message,
                Some(err.into_raw()),
            ))
        })?;

        if !envelope.is_success() {
            return Err(self.fail(Failure::business(
                self.context.clone(),
                envelope.code,
                envelope.msg,
                envelope.data,
            )));
        }

        envelope.decode().map_err(|err| {
            self.fail(Failure::parse(
                self.context.clone(),
                err.to_string(),
                Some(response.text_lossy()),
            ))
        })
    }

    fn bytes(&self, response: Response<Bytes>) -> Result<Bytes> {
        self.check_status(&response)?;
        Ok(response.into_body())
    }

    fn raw(&self, response: Response<Bytes>) -> Result<Response<Bytes>> {
        self.check_status(&response)?;
        Ok(response)
    }
}
