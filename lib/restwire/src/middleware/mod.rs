//! Tower middleware layers for the restwire transport.
//!
//! Layers wrap [`HyperClient`](crate::HyperClient) through
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer). Any tower
//! layer whose service handles `http::Request<Bytes>` and returns a
//! [`Response`](crate::Response) can be used.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};
