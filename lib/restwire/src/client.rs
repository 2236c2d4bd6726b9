//! Pooled hyper transport with optional tower layers.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{self, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tower::Layer;
use tower::util::{BoxCloneSyncService, ServiceExt};
use tower_service::Service;
use tracing::trace;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::connector::https_connector;
use crate::middleware::LoggingLayer;
use crate::{Error, Response, Result};

/// Transport service after layers are applied.
pub type BoxedService = BoxCloneSyncService<http::Request<Bytes>, Response, Error>;

/// Future returned by the transport's [`Service`] implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

type WrapFn = Box<dyn FnOnce(BoxedService) -> BoxedService + Send + Sync>;

/// Innermost service: one exchange on the hyper connection pool.
#[derive(Clone)]
struct Exchange {
    pool: legacy::Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl Exchange {
    fn new(config: &ClientConfig) -> Self {
        let pool = legacy::Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config));
        Self {
            pool,
            timeout: config.timeout,
        }
    }

    async fn run(self, request: http::Request<Bytes>) -> Result<Response> {
        let pending = self.pool.request(request.map(Full::new));
        let head = tokio::time::timeout(self.timeout, pending)
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(classify)?;

        let (parts, incoming) = head.into_parts();
        let collected = tokio::time::timeout(self.timeout, incoming.collect())
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|e| Error::connection(format!("reading response body: {e}")))?;
        let body = collected.to_bytes();
        trace!(status = parts.status.as_u16(), body_len = body.len(), "response received");

        Ok(Response::new(parts.status, parts.headers, body))
    }
}

impl Service<http::Request<Bytes>> for Exchange {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        Box::pin(self.clone().run(request))
    }
}

/// TLS failures surface as a `rustls::Error` somewhere in the source chain,
/// usually boxed inside an `io::Error`.
#[allow(clippy::needless_pass_by_value)]
fn classify(err: legacy::Error) -> Error {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(current) = source {
        let wrapped = current
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::get_ref)
            .is_some_and(|inner| inner.is::<rustls::Error>());
        if wrapped || current.is::<rustls::Error>() {
            return Error::tls(err.to_string());
        }
        source = current.source();
    }
    Error::connection(err.to_string())
}

/// Hyper-based [`HttpClient`](restwire_core::HttpClient) with connection
/// pooling, rustls and tower middleware.
///
/// ```ignore
/// use std::time::Duration;
/// use restwire::HyperClient;
///
/// let transport = HyperClient::builder()
///     .timeout(Duration::from_secs(5))
///     .with_debug_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: BoxedService,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Transport with [`ClientConfig::default`] and no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Transport with the given settings and no layers.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Start configuring a transport.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Settings this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl restwire_core::HttpClient for HyperClient {
    async fn execute(&self, request: http::Request<Bytes>) -> Result<Response> {
        self.service.clone().oneshot(request).await
    }
}

impl Service<http::Request<Bytes>> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperClient`].
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfigBuilder,
    wrappers: Vec<WrapFn>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.wrappers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Replace every setting at once.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config.into();
        self
    }

    /// See [`ClientConfigBuilder::timeout`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// See [`ClientConfigBuilder::connect_timeout`].
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// See [`ClientConfigBuilder::pool_idle_per_host`].
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// See [`ClientConfigBuilder::pool_idle_timeout`].
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Wrap the transport in a tower layer. The first layer added sits
    /// closest to the network.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<http::Request<Bytes>, Response = Response, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<http::Request<Bytes>>>::Future: Send + 'static,
    {
        self.wrappers
            .push(Box::new(move |inner| BoxCloneSyncService::new(layer.layer(inner))));
        self
    }

    /// Log each exchange at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log each exchange with headers and body sizes.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Create the connection pool and stack the layers on it.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let config = self.config.build();
        let service = self
            .wrappers
            .into_iter()
            .fold(BoxCloneSyncService::new(Exchange::new(&config)), |inner, wrap| {
                wrap(inner)
            });
        HyperClient { service, config }
    }
}
