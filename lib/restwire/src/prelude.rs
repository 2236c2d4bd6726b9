//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and the derive macro
//! for easy glob importing:
//!
//! ```ignore
//! use restwire::prelude::*;
//! ```

pub use crate::{
    BodyParam, Client, ClientConfig, CookieParam, Error, FileParam, FormFieldParam, HeaderParam,
    HttpClient, HyperClient, Method, Param, Params, PathSegmentParam, QueryParam, Request,
    RequestBuilder, Response, Result, StatusCode, header,
};
pub use serde::{Deserialize, Serialize};
