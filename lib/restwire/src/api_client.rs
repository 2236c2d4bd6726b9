//! Request dispatcher.
//!
//! [`Client`] resolves requests against a base URL, compiles them off the
//! async runtime and hands the result to an [`HttpClient`] transport.

use http::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use tracing::{Instrument, debug, debug_span};
use url::Url;

use crate::{
    ClientConfig, Error, HttpClient, HyperClient, HyperClientBuilder, Method, Params, Request,
    Response, Result,
};

/// Dispatches [`Request`]s through a transport.
///
/// # Example
///
/// ```ignore
/// use restwire::{Client, Params};
///
/// #[derive(Params)]
/// struct GetRepo {
///     #[param(path = "owner")]
///     owner: String,
///     #[param(path = "repo")]
///     repo: String,
/// }
///
/// let client = Client::builder()
///     .base_url("https://api.github.com")
///     .default_header("Accept", "application/vnd.github+json")
///     .build()?;
///
/// let response = client
///     .get("/repos/:owner/:repo", &GetRepo { owner: "rust-lang".into(), repo: "rust".into() })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<C = HyperClient> {
    transport: C,
    base_url: Option<Url>,
    default_headers: HeaderMap,
    user_agent: HeaderValue,
}

impl Client {
    /// Creates a new [`ClientBuilder`].
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl<C> Client<C> {
    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Headers applied before every request's own headers.
    ///
    /// The configured `User-Agent` is not part of this map unless it was set
    /// through [`ClientBuilder::default_header`]; it is only added to requests
    /// that end up without one.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Get a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }
}

impl<C: HttpClient> Client<C> {
    /// Compile and send a request.
    ///
    /// Compilation runs on the blocking thread pool since file parts are read
    /// from disk.
    ///
    /// # Errors
    ///
    /// Compilation errors ([`Error::InvalidUrl`], [`Error::FileAccess`],
    /// [`Error::MultipartWrite`]), [`Error::InvalidRequest`] for invalid
    /// headers, and transport errors.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let span = debug_span!(
            "restwire",
            method = %request.method(),
            resource = request.resource()
        );
        async move {
            let base = self.base_url.clone();
            let compiled = tokio::task::spawn_blocking(move || request.compile(base.as_ref()))
                .await
                .map_err(|e| {
                    Error::invalid_request(format!("request compilation aborted: {e}"))
                })??;
            debug!(
                url = %compiled.url,
                body_len = compiled.body.len(),
                content_type = compiled.content_type.as_deref(),
                "request compiled"
            );

            let mut http_request = compiled.into_http(&self.default_headers)?;
            if !http_request.headers().contains_key(USER_AGENT) {
                http_request
                    .headers_mut()
                    .insert(USER_AGENT, self.user_agent.clone());
            }
            self.transport.execute(http_request).await
        }
        .instrument(span)
        .await
    }

    /// Send a request built from `params` with the given method.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`].
    pub async fn send(
        &self,
        method: Method,
        resource: &str,
        params: &impl Params,
    ) -> Result<Response> {
        let request = Request::from_params(method, resource, params)?;
        self.execute(request).await
    }

    /// `GET` a resource.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`].
    pub async fn get(&self, resource: &str, params: &impl Params) -> Result<Response> {
        self.send(Method::Get, resource, params).await
    }

    /// `POST` to a resource.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`].
    pub async fn post(&self, resource: &str, params: &impl Params) -> Result<Response> {
        self.send(Method::Post, resource, params).await
    }

    /// `PUT` a resource.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`].
    pub async fn put(&self, resource: &str, params: &impl Params) -> Result<Response> {
        self.send(Method::Put, resource, params).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`].
    pub async fn delete(&self, resource: &str, params: &impl Params) -> Result<Response> {
        self.send(Method::Delete, resource, params).await
    }
}

/// Builder for [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
    config: Option<ClientConfig>,
    transport: HyperClientBuilder,
}

impl ClientBuilder {
    /// Resolve relative resources against this URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set a header sent with every request.
    ///
    /// A later call with the same name replaces the value. Request headers
    /// are appended after defaults, never replacing them.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Transport configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Log every request with [`LoggingLayer`](crate::middleware::LoggingLayer).
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.transport = self.transport.with_logging();
        self
    }

    /// Build a client using the hyper transport.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`] for an unparsable base URL,
    /// [`Error::InvalidRequest`] for an invalid default header.
    pub fn build(mut self) -> Result<Client> {
        let config = self.config.clone().unwrap_or_default();
        let transport = std::mem::take(&mut self.transport).config(config).build();
        self.build_with(transport)
    }

    /// Build a client around a custom transport.
    ///
    /// The fallback `User-Agent` comes from the configuration given to
    /// [`config`](Self::config), if any.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn build_with<C: HttpClient>(self, transport: C) -> Result<Client<C>> {
        let base_url = self.base_url.as_deref().map(Url::parse).transpose()?;

        let user_agent = parse_header_value(&self.config.unwrap_or_default().user_agent)?;
        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::invalid_request(format!("header '{name}': {e}")))?;
            default_headers.insert(name, parse_header_value(value)?);
        }

        Ok(Client {
            transport,
            base_url,
            default_headers,
            user_agent,
        })
    }
}

fn parse_header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::invalid_request(format!("header value '{value}': {e}")))
}
