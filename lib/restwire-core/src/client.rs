//! Transport boundary.
//!
//! [`HttpClient`] executes an already compiled [`http::Request`]. The
//! `restwire` crate ships a hyper-based implementation; implement the trait
//! directly for mock transports in tests.

use std::future::Future;

use bytes::Bytes;

use crate::{Response, Result};

/// Core HTTP transport trait.
pub trait HttpClient: Send + Sync {
    /// Send a request and buffer the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> impl Future<Output = Result<Response>> + Send;
}
