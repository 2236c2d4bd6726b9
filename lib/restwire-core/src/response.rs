//! Buffered transport response.

use std::borrow::Cow;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// What a transport hands back: status, headers and the fully read body.
///
/// A non-2xx status is not an error at this level; call
/// [`error_for_status`](Self::error_for_status) to turn it into one.
///
/// ```ignore
/// let user: User = client.execute(request).await?.error_for_status()?.json()?;
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Assemble a response from its parts.
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// All response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, when it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Buffered body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Take the body, dropping status and headers.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status is 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Status is 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Keep 2xx responses, turn anything else into [`Error::Http`] carrying
    /// the status and body.
    ///
    /// # Errors
    ///
    /// [`Error::Http`] for a non-2xx status.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http(self.status, self.body))
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// [`Error::JsonSerialization`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The body as text; invalid UTF-8 sequences are replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use http::header::{CONTENT_TYPE, HeaderValue};

    use super::*;

    fn with_body(status: StatusCode, body: &'static str) -> Response {
        Response::new(status, HeaderMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn accessors() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = Response::new(StatusCode::OK, headers, Bytes::from(r#"{"id":1}"#));

        check!(response.status() == 200);
        check!(response.header("content-type") == Some("application/json"));
        check!(response.header("etag").is_none());
        check!(response.is_success());
        check!(!response.is_client_error());
        check!(response.into_body().as_ref() == br#"{"id":1}"#);
    }

    #[test]
    fn status_classes() {
        check!(with_body(StatusCode::NOT_FOUND, "").is_client_error());
        check!(with_body(StatusCode::BAD_GATEWAY, "").is_server_error());
        check!(!with_body(StatusCode::MOVED_PERMANENTLY, "").is_success());
    }

    #[test]
    fn error_for_status_keeps_body() {
        let_assert!(Err(err) = with_body(StatusCode::NOT_FOUND, "missing").error_for_status());
        check!(err.status() == Some(StatusCode::NOT_FOUND));
        check!(err.body().map(Bytes::as_ref) == Some(b"missing".as_ref()));

        check!(with_body(StatusCode::NO_CONTENT, "").error_for_status().is_ok());
    }

    #[test]
    fn json_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Order {
            id: u64,
            sku: String,
        }

        let response = with_body(StatusCode::OK, r#"{"id":7,"sku":"LMP-01"}"#);
        let order: Order = response.json().expect("deserialize");
        check!(order == Order { id: 7, sku: "LMP-01".to_string() });

        let_assert!(Err(err) = response.json::<Vec<u8>>());
        check!(err.is_serialization());
    }

    #[test]
    fn lossy_text() {
        check!(with_body(StatusCode::OK, "Hello").text() == "Hello");
        let garbled = Response::new(StatusCode::OK, HeaderMap::new(), Bytes::from_static(b"a\xffb"));
        check!(garbled.text() == "a\u{fffd}b");
    }
}
