//! Typed request parameters.
//!
//! A [`Param`] describes one piece of data and the part of the request it
//! belongs to. The name a parameter carries is only used for diagnostics:
//! which list a parameter ends up in is decided by its [`ParamKind`].

use std::time::SystemTime;

use bytes::Bytes;
use derive_more::{Display, From};

use crate::file::FileParam;

/// Default placeholder pattern for path segments: `:name`.
pub const DEFAULT_SEGMENT_FORMAT: &str = ":%s";

/// Which list of the request a parameter is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParamKind {
    /// URL query string.
    #[display("query")]
    Query,
    /// URL placeholder substitution.
    #[display("path segment")]
    PathSegment,
    /// Request header.
    #[display("header")]
    Header,
    /// Request cookie.
    #[display("cookie")]
    Cookie,
    /// Form field (url-encoded or multipart).
    #[display("form field")]
    FormField,
    /// Multipart file part.
    #[display("file")]
    File,
    /// Explicit request body.
    #[display("body")]
    Body,
}

/// A request parameter.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Param {
    /// Placed in the URL query string.
    Query(QueryParam),
    /// Substituted into a URL placeholder.
    PathSegment(PathSegmentParam),
    /// Appended to the request headers.
    Header(HeaderParam),
    /// Attached as a request cookie.
    Cookie(CookieParam),
    /// One entry of a form body.
    FormField(FormFieldParam),
    /// One multipart file part.
    File(FileParam),
    /// The complete request body.
    Body(BodyParam),
}

impl Param {
    /// Classify this parameter.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        match self {
            Self::Query(_) => ParamKind::Query,
            Self::PathSegment(_) => ParamKind::PathSegment,
            Self::Header(_) => ParamKind::Header,
            Self::Cookie(_) => ParamKind::Cookie,
            Self::FormField(_) => ParamKind::FormField,
            Self::File(_) => ParamKind::File,
            Self::Body(_) => ParamKind::Body,
        }
    }

    /// Diagnostic name. For a body this is its content type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Query(p) => &p.name,
            Self::PathSegment(p) => &p.name,
            Self::Header(p) => &p.name,
            Self::Cookie(p) => &p.name,
            Self::FormField(p) => &p.name,
            Self::File(p) => p.field_name(),
            Self::Body(p) => &p.content_type,
        }
    }
}

/// A URL query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    /// Query key.
    pub name: String,
    /// Query value (unencoded).
    pub value: String,
}

impl QueryParam {
    /// Create a query parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A URL placeholder substitution.
///
/// The placeholder token is built by replacing the `%s` in `format` with the
/// name: name `id` with the default format gives `:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegmentParam {
    /// Placeholder name.
    pub name: String,
    /// Replacement text, inserted as is.
    pub value: String,
    /// Placeholder pattern containing `%s`.
    pub format: String,
}

impl PathSegmentParam {
    /// Create a path segment using the default `:name` placeholder.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_format(name, value, DEFAULT_SEGMENT_FORMAT)
    }

    /// Create a path segment with a custom placeholder pattern.
    ///
    /// An empty pattern falls back to [`DEFAULT_SEGMENT_FORMAT`].
    #[must_use]
    pub fn with_format(
        name: impl Into<String>,
        value: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        let format = format.into();
        Self {
            name: name.into(),
            value: value.into(),
            format: if format.is_empty() {
                DEFAULT_SEGMENT_FORMAT.to_string()
            } else {
                format
            },
        }
    }

    /// The literal text this segment replaces in the URL.
    #[must_use]
    pub fn token(&self) -> String {
        self.format.replacen("%s", &self.name, 1)
    }
}

/// A request header. Headers are appended, never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParam {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl HeaderParam {
    /// Create a header parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SameSite {
    /// `SameSite=Strict`
    Strict,
    /// `SameSite=Lax`
    Lax,
    /// `SameSite=None`
    None,
}

/// A request cookie.
///
/// Only `name=value` is sent on the wire; the remaining attributes are kept
/// for collaborators that manage cookie jars.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookieParam {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// `Path` attribute.
    pub path: Option<String>,
    /// `Domain` attribute.
    pub domain: Option<String>,
    /// `Expires` attribute.
    pub expires: Option<SystemTime>,
    /// `Max-Age` attribute in seconds.
    pub max_age: Option<i64>,
    /// `Secure` attribute.
    pub secure: bool,
    /// `HttpOnly` attribute.
    pub http_only: bool,
    /// `SameSite` attribute.
    pub same_site: Option<SameSite>,
}

impl CookieParam {
    /// Create a cookie with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the `Path` attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the `Domain` attribute.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the `Expires` attribute.
    #[must_use]
    pub const fn expires(mut self, expires: SystemTime) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Set the `Max-Age` attribute.
    #[must_use]
    pub const fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Set the `Secure` attribute.
    #[must_use]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `HttpOnly` attribute.
    #[must_use]
    pub const fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the `SameSite` attribute.
    #[must_use]
    pub const fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// The `name=value` pair sent in a `Cookie` request header.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldParam {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
}

impl FormFieldParam {
    /// Create a form field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A complete request body with its content type.
///
/// A request holds at most one body, and when present it wins over any form
/// fields or files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyParam {
    /// MIME type of the body.
    pub content_type: String,
    /// Body bytes, emitted unchanged.
    pub content: Bytes,
}

impl BodyParam {
    /// JSON content type used by [`BodyParam::json`].
    pub const JSON_CONTENT_TYPE: &'static str = "application/json; charset=utf-8";

    /// XML content type used by [`BodyParam::xml`].
    pub const XML_CONTENT_TYPE: &'static str = "application/xml; charset=utf-8";

    /// Create a body from raw bytes.
    #[must_use]
    pub fn new(content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// Serialize a value as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> crate::Result<Self> {
        let content = serde_json::to_vec(value)?;
        Ok(Self::new(Self::JSON_CONTENT_TYPE, content))
    }

    /// Serialize a value as an XML document; the root element is named
    /// after the type.
    ///
    /// # Errors
    ///
    /// [`Error::XmlSerialization`](crate::Error::XmlSerialization) for values
    /// XML cannot represent.
    pub fn xml<T: serde::Serialize + ?Sized>(value: &T) -> crate::Result<Self> {
        let content = quick_xml::se::to_string(value)?;
        Ok(Self::new(Self::XML_CONTENT_TYPE, content))
    }
}
