//! Request accumulation and compilation.
//!
//! Use [`Request::builder`] to collect parameters, then [`Request::compile`]
//! to turn them into a URL, a body and the headers to send.
//!
//! # Example
//!
//! ```
//! use restwire_core::{Method, Request};
//!
//! let base = url::Url::parse("https://api.example.com/v1").unwrap();
//! let request = Request::builder(Method::Post, "/users/:id/avatar")
//!     .segment("id", "42")
//!     .query("notify", "true")
//!     .header("X-Trace", "abc")
//!     .form_field("caption", "me")
//!     .file_bytes("avatar", "me.png", vec![0x89, 0x50, 0x4E, 0x47])
//!     .build()
//!     .unwrap();
//!
//! let compiled = request.compile(Some(&base)).unwrap();
//! assert_eq!(compiled.url, "https://api.example.com/v1/users/42/avatar?notify=true");
//! assert!(compiled
//!     .content_type
//!     .as_deref()
//!     .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary=")));
//! ```

use std::path::Path;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};
use url::Url;

use crate::body::{BodySource, CompiledBody, compile_body};
use crate::file::FileParam;
use crate::param::{
    BodyParam, CookieParam, FormFieldParam, HeaderParam, Param, PathSegmentParam, QueryParam,
};
use crate::schema::Params;
use crate::url_compiler::compile_url;
use crate::{Error, Method, Result};

/// A frozen set of request parameters, ready to compile.
///
/// Compilation only reads the request, so a `Request` can be compiled any
/// number of times and from any thread.
#[derive(Debug, Clone, Default)]
pub struct Request {
    resource: String,
    method: Method,
    cookies: Vec<CookieParam>,
    headers: Vec<HeaderParam>,
    queries: Vec<QueryParam>,
    segments: Vec<PathSegmentParam>,
    form_fields: Vec<FormFieldParam>,
    files: Vec<FileParam>,
    body: Option<BodyParam>,
    content_type: Option<String>,
    boundary: Option<String>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, resource: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, resource)
    }

    /// Build a request from the annotated fields of `value`.
    ///
    /// # Errors
    ///
    /// Never fails for annotated records; kept fallible to match
    /// [`RequestBuilder::build`].
    pub fn from_params(
        method: Method,
        resource: impl Into<String>,
        value: &impl Params,
    ) -> Result<Self> {
        Self::builder(method, resource).extract(value).build()
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Resource path or absolute URL.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Cookies, in insertion order.
    #[must_use]
    pub fn cookies(&self) -> &[CookieParam] {
        &self.cookies
    }

    /// Headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[HeaderParam] {
        &self.headers
    }

    /// Query parameters, in insertion order.
    #[must_use]
    pub fn queries(&self) -> &[QueryParam] {
        &self.queries
    }

    /// Path segment substitutions, in insertion order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegmentParam] {
        &self.segments
    }

    /// Form fields, in insertion order.
    #[must_use]
    pub fn form_fields(&self) -> &[FormFieldParam] {
        &self.form_fields
    }

    /// File parts, in insertion order.
    #[must_use]
    pub fn files(&self) -> &[FileParam] {
        &self.files
    }

    /// Explicit body, if set.
    #[must_use]
    pub const fn body(&self) -> Option<&BodyParam> {
        self.body.as_ref()
    }

    /// Compile the target URL.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`] if there is no base and the resource is not an
    /// absolute URL.
    pub fn compile_url(&self, base: Option<&Url>) -> Result<String> {
        let url = compile_url(base, &self.resource, &self.queries, &self.segments)?;
        debug!(%url, "compiled request URL");
        Ok(url)
    }

    /// Compile the body and its content type.
    ///
    /// An explicit [`RequestBuilder::content_type`] replaces the derived one.
    ///
    /// # Errors
    ///
    /// [`Error::FileAccess`] or [`Error::MultipartWrite`] if a file part cannot
    /// be streamed. No partial body is returned.
    pub fn compile_body(&self) -> Result<CompiledBody> {
        let mut compiled = compile_body(&BodySource {
            method: self.method,
            body: self.body.as_ref(),
            form_fields: &self.form_fields,
            files: &self.files,
            boundary: self.boundary.as_deref(),
        })?;
        if let Some(content_type) = &self.content_type {
            compiled.content_type = Some(content_type.clone());
        }
        Ok(compiled)
    }

    /// Compile URL, body, headers and cookies.
    ///
    /// # Errors
    ///
    /// See [`Request::compile_url`] and [`Request::compile_body`].
    pub fn compile(&self, base: Option<&Url>) -> Result<CompiledRequest> {
        let url = self.compile_url(base)?;
        let CompiledBody { content_type, body } = self.compile_body()?;
        Ok(CompiledRequest {
            method: self.method,
            url,
            body,
            content_type,
            headers: self.headers.clone(),
            cookies: self.cookies.clone(),
        })
    }
}

/// Builder collecting request parameters.
///
/// Adding parameters never fails. Serialization helpers ([`json`](Self::json),
/// [`xml`](Self::xml), [`form`](Self::form)) and [`file_path`](Self::file_path) capture their
/// error instead; inspect it with [`error`](Self::error), it is returned by
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RequestBuilder {
    request: Request,
    error: Option<Error>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, resource: impl Into<String>) -> Self {
        Self {
            request: Request {
                method,
                resource: resource.into(),
                ..Request::default()
            },
            error: None,
        }
    }

    /// Add a parameter to the list matching its kind.
    ///
    /// A body replaces any body set before.
    #[must_use]
    pub fn param(mut self, param: impl Into<Param>) -> Self {
        let request = &mut self.request;
        match param.into() {
            Param::Query(p) => request.queries.push(p),
            Param::PathSegment(p) => request.segments.push(p),
            Param::Header(p) => request.headers.push(p),
            Param::Cookie(p) => request.cookies.push(p),
            Param::FormField(p) => request.form_fields.push(p),
            Param::File(p) => request.files.push(p),
            Param::Body(p) => request.body = Some(p),
        }
        self
    }

    /// Add parameters in order.
    #[must_use]
    pub fn params(self, params: impl IntoIterator<Item = Param>) -> Self {
        params
            .into_iter()
            .fold(self, |builder, param| builder.param(param))
    }

    /// Add the parameters described by the annotated fields of `value`.
    #[must_use]
    pub fn extract(self, value: &impl Params) -> Self {
        self.params(value.params())
    }

    /// Add a cookie.
    #[must_use]
    pub fn cookie(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(CookieParam::new(name, value))
    }

    /// Append a header.
    #[must_use]
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(HeaderParam::new(name, value))
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(QueryParam::new(name, value))
    }

    /// Substitute the `:name` placeholder.
    #[must_use]
    pub fn segment(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(PathSegmentParam::new(name, value))
    }

    /// Substitute a placeholder built from a custom pattern such as `{%s}`.
    #[must_use]
    pub fn segment_with_format(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        self.param(PathSegmentParam::with_format(name, value, format))
    }

    /// Append a form field.
    #[must_use]
    pub fn form_field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(FormFieldParam::new(name, value))
    }

    /// Append the fields of a serializable value as form fields.
    ///
    /// Uses `serde_html_form`, so `Vec<T>` fields become repeated fields.
    #[must_use]
    pub fn form<T: serde::Serialize + ?Sized>(self, value: &T) -> Self {
        match serde_html_form::to_string(value) {
            Ok(encoded) => {
                let fields: Vec<Param> = url::form_urlencoded::parse(encoded.as_bytes())
                    .map(|(name, value)| FormFieldParam::new(name, value).into())
                    .collect();
                self.params(fields)
            }
            Err(err) => self.capture(err.into()),
        }
    }

    /// Attach an in-memory file.
    #[must_use]
    pub fn file_bytes(
        self,
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.param(FileParam::from_bytes(field_name, file_name, bytes))
    }

    /// Attach a file streamed from disk when the body is compiled.
    #[must_use]
    pub fn file_path(self, field_name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        match FileParam::from_path(field_name, path) {
            Ok(file) => self.param(file),
            Err(err) => self.capture(err),
        }
    }

    /// Set the body.
    #[must_use]
    pub fn body(self, content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.param(BodyParam::new(content_type, content))
    }

    /// Set a JSON body.
    #[must_use]
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> Self {
        match BodyParam::json(value) {
            Ok(body) => self.param(body),
            Err(err) => self.capture(err),
        }
    }

    /// Set an XML body; a serialization error is captured like [`json`](Self::json).
    #[must_use]
    pub fn xml<T: serde::Serialize + ?Sized>(self, value: &T) -> Self {
        match BodyParam::xml(value) {
            Ok(body) => self.param(body),
            Err(err) => self.capture(err),
        }
    }

    /// Replace the content type derived at compile time.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.request.content_type = Some(content_type.into());
        self
    }

    /// Use a fixed multipart boundary instead of a random one.
    #[must_use]
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.request.boundary = Some(boundary.into());
        self
    }

    /// The first error captured while building, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Freeze the request.
    ///
    /// # Errors
    ///
    /// Returns the first captured error.
    pub fn build(self) -> Result<Request> {
        match self.error {
            Some(err) => {
                warn!(error = %err, resource = %self.request.resource, "request not built");
                Err(err)
            }
            None => Ok(self.request),
        }
    }

    fn capture(mut self, err: Error) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }
}

/// Everything a transport needs to send a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL.
    pub url: String,
    /// Body bytes, empty for `GET`.
    pub body: Bytes,
    /// Content type to use when the transport has not set one.
    pub content_type: Option<String>,
    /// Headers to append.
    pub headers: Vec<HeaderParam>,
    /// Cookies to attach.
    pub cookies: Vec<CookieParam>,
}

impl CompiledRequest {
    /// Convert into an [`http::Request`].
    ///
    /// `defaults` are applied first. Request headers are appended after them,
    /// cookies are joined into one `Cookie` header, and `Content-Type` is set
    /// only when no header provided one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for invalid header names/values or URL.
    pub fn into_http(self, defaults: &HeaderMap) -> Result<http::Request<Bytes>> {
        let mut headers = defaults.clone();

        for header in &self.headers {
            let name = HeaderName::try_from(header.name.as_str())
                .map_err(|e| Error::invalid_request(format!("header '{}': {e}", header.name)))?;
            headers.append(name, header_value(&header.value)?);
        }

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(CookieParam::pair)
                .collect::<Vec<_>>()
                .join("; ");
            headers.append(COOKIE, header_value(&cookie)?);
        }

        if let Some(content_type) = &self.content_type
            && !headers.contains_key(CONTENT_TYPE)
        {
            headers.insert(CONTENT_TYPE, header_value(content_type)?);
        }

        let mut request = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(self.url.as_str())
            .body(self.body)
            .map_err(|e| Error::invalid_request(e.to_string()))?;
        *request.headers_mut() = headers;
        Ok(request)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::invalid_request(format!("header value '{value}': {e}")))
}
