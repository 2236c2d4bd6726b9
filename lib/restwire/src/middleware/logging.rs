//! Tracing of transport exchanges.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Response, Result};

/// How much of each exchange [`Logging`] records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Also record outgoing headers and body size, at debug level.
    Debug,
    /// Start and outcome only.
    #[default]
    Info,
}

/// Tower layer producing [`Logging`] services.
///
/// ```ignore
/// use restwire::HyperClient;
/// use restwire::middleware::LoggingLayer;
///
/// let transport = HyperClient::builder().layer(LoggingLayer::debug()).build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// Layer logging at [`LogLevel::Info`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer logging at [`LogLevel::Debug`].
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Records every exchange inside an `http_request` span.
///
/// Non-2xx statuses and transport errors are reported with `warn!`.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Wrap `inner` at [`LogLevel::Info`].
    pub fn new(inner: S) -> Self {
        LoggingLayer::new().layer(inner)
    }
}

fn announce(level: LogLevel, request: &http::Request<Bytes>) {
    if level == LogLevel::Debug {
        debug!(
            headers = ?request.headers(),
            body_len = request.body().len(),
            "sending request"
        );
    } else {
        info!("sending request");
    }
}

fn report(outcome: &Result<Response>, started: Instant) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(response) if response.is_success() => {
            info!(status = response.status().as_u16(), elapsed_ms, "request completed");
        }
        Ok(response) => {
            warn!(
                status = response.status().as_u16(),
                elapsed_ms,
                "request answered with error status"
            );
        }
        Err(err) => warn!(error = %err, elapsed_ms, "request failed"),
    }
}

impl<S> Service<http::Request<Bytes>> for Logging<S>
where
    S: Service<http::Request<Bytes>, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        let span = info_span!(
            "http_request",
            method = %request.method(),
            url = %request.uri()
        );
        let level = self.level;
        // the clone is not ready yet; drive the ready one and keep the clone
        let ready = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, ready);

        Box::pin(
            async move {
                let started = Instant::now();
                announce(level, &request);
                let outcome = inner.call(request).await;
                report(&outcome, started);
                outcome
            }
            .instrument(span),
        )
    }
}
