//! Error types for restwire.

use std::path::PathBuf;

use derive_more::{Display, Error, From};

/// Main error type for restwire operations.
///
/// Request construction never fails eagerly: serialization problems are
/// captured on the [`RequestBuilder`](crate::RequestBuilder) and surface
/// from [`build`](crate::RequestBuilder::build). Compilation and transport
/// failures are returned from the step that produced them.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The resource could not be parsed as a URL and no base URL was given.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON body serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// XML body serialization error.
    #[display("XML serialization error: {_0}")]
    #[from]
    XmlSerialization(quick_xml::SeError),

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// A referenced file could not be stat'd, opened or read.
    #[display("cannot access file '{}': {source}", path.display())]
    #[from(skip)]
    FileAccess {
        /// Path of the file.
        #[error(not(source))]
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing a part into the multipart encoder failed.
    #[display("multipart write error: {_0}")]
    #[from(skip)]
    MultipartWrite(std::io::Error),

    /// The server answered with a non-2xx status.
    #[display("HTTP error {status}")]
    #[from(skip)]
    Http {
        /// Response status.
        status: http::StatusCode,
        /// Response body as received.
        #[error(not(source))]
        body: bytes::Bytes,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration (bad header name, unsupported method...).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a file access error.
    #[must_use]
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Error for a non-2xx response.
    #[must_use]
    pub const fn http(status: http::StatusCode, body: bytes::Bytes) -> Self {
        Self::Http { status, body }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if a referenced file could not be accessed.
    #[must_use]
    pub const fn is_file_access(&self) -> bool {
        matches!(self, Self::FileAccess { .. })
    }

    /// Returns `true` if body serialization (JSON, XML or form) failed.
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(
            self,
            Self::JsonSerialization(_) | Self::XmlSerialization(_) | Self::FormSerialization(_)
        )
    }

    /// Status of an [`Error::Http`].
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for an [`Error::Http`] with a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_client_error())
    }

    /// `true` for an [`Error::Http`] with a 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_server_error())
    }

    /// Body of an [`Error::Http`].
    #[must_use]
    pub const fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use assert2::{check, let_assert};
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    #[test]
    fn display() {
        let err = Error::http(StatusCode::NOT_FOUND, Bytes::new());
        check!(err.to_string() == "HTTP error 404 Not Found");
        check!(Error::Timeout.to_string() == "request timeout");

        let err = Error::file_access(
            "/tmp/missing.txt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        check!(err.to_string() == "cannot access file '/tmp/missing.txt': no such file");

        let err = Error::MultipartWrite(io::Error::other("disk full"));
        check!(err.to_string() == "multipart write error: disk full");
    }

    #[test]
    fn file_access_keeps_io_source() {
        let err = Error::file_access("a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        let_assert!(Some(source) = std::error::Error::source(&err));
        let_assert!(Some(io_err) = source.downcast_ref::<io::Error>());
        check!(io_err.kind() == io::ErrorKind::PermissionDenied);
        check!(err.is_file_access());
        check!(!Error::Timeout.is_file_access());
    }

    #[test]
    fn parse_error_converts() {
        let err: Error = url::Url::parse("not a url").expect_err("invalid").into();
        let_assert!(Error::InvalidUrl(_) = &err);
        check!(err.to_string().starts_with("invalid URL"));
    }

    #[test]
    fn http_status_classes() {
        let err = Error::http(StatusCode::NOT_FOUND, Bytes::from_static(b"gone"));
        check!(err.status() == Some(StatusCode::NOT_FOUND));
        check!(err.is_client_error());
        check!(!err.is_server_error());
        check!(err.body() == Some(&Bytes::from_static(b"gone")));

        check!(Error::http(StatusCode::SERVICE_UNAVAILABLE, Bytes::new()).is_server_error());
        check!(Error::Timeout.status().is_none());
        check!(Error::Timeout.body().is_none());
    }

    #[test]
    fn kinds() {
        check!(Error::Timeout.is_timeout());
        check!(Error::connection("refused").is_connection());
        let json_err = serde_json::from_str::<u32>("nope").expect_err("invalid json");
        check!(Error::from(json_err).is_serialization());
    }
}
