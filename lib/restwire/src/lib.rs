//! Declarative HTTP request construction for Rust.
//!
//! Describe what a request needs as typed parameters, directly or through
//! annotated structs, and let restwire compile them into a URL, a body and
//! headers.
//!
//! # Example
//!
//! ```ignore
//! use restwire::prelude::*;
//!
//! #[derive(Params)]
//! struct ListIssues {
//!     #[param(path = "repo")]
//!     repo: String,
//!     #[param(query = "state")]
//!     state: String,
//!     #[param(query("label", required))]
//!     labels: Vec<String>,
//! }
//!
//! let client = Client::builder()
//!     .base_url("https://api.example.com")
//!     .with_logging()
//!     .build()?;
//!
//! let response = client
//!     .get(
//!         "/repos/:repo/issues",
//!         &ListIssues { repo: "restwire".into(), state: "open".into(), labels: vec![] },
//!     )
//!     .await?;
//!
//! // Or build the request by hand
//! let request = Request::builder(Method::Post, "/upload")
//!     .form_field("title", "report")
//!     .file_path("doc", "/tmp/report.pdf")
//!     .build()?;
//! let response = client.execute(request).await?;
//! ```

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

// Re-export client types
pub use api_client::{Client, ClientBuilder};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use restwire_core::{
    BodyParam, CHUNK_SIZE, CompiledBody, CompiledRequest, CookieParam, DEFAULT_SEGMENT_FORMAT,
    Error, FORM_URLENCODED, FieldSpec, FileContent, FileParam, FormFieldParam, HeaderParam,
    HttpClient, Method, MultipartWriter, Param, ParamKind, ParamLocation, ParamValue, Params,
    PathSegmentParam, QueryParam, Request, RequestBuilder, Response, Result, SameSite,
};

// Re-export http types for status codes and headers
pub use restwire_core::{StatusCode, header};

// Re-export crates used in public signatures
pub use url;

// Re-export macros
pub use restwire_macro::Params;
