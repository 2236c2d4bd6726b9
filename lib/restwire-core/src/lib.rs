//! Core types for restwire declarative HTTP requests.
//!
//! This crate provides the building blocks used by restwire:
//! - [`Param`] and its variants - typed request parameters
//! - [`Params`] and [`FieldSpec`] - parameters described by annotated struct fields
//! - [`Request`] and [`RequestBuilder`] - parameter accumulation
//! - [`Request::compile_url`] and [`Request::compile_body`] - URL and body compilation
//! - [`CompiledRequest`] - transport-ready request parts
//! - [`MultipartWriter`] - streaming multipart encoder
//! - [`Response`] - buffered HTTP response
//! - [`Error`] and [`Result`] - error handling
//! - [`HttpClient`] - transport trait
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod error;
mod file;
mod method;
mod multipart;
mod param;
pub mod prelude;
mod request;
mod response;
mod schema;
mod url_compiler;

pub use body::{CompiledBody, FORM_URLENCODED};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use file::{CHUNK_SIZE, FileContent, FileParam};
pub use method::Method;
pub use multipart::MultipartWriter;
pub use param::{
    BodyParam, CookieParam, DEFAULT_SEGMENT_FORMAT, FormFieldParam, HeaderParam, Param, ParamKind,
    PathSegmentParam, QueryParam, SameSite,
};
pub use request::{CompiledRequest, Request, RequestBuilder};
pub use response::Response;
pub use schema::{FieldSpec, ParamLocation, ParamValue, Params};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
