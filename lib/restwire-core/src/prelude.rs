//! Prelude module for convenient imports.
//!
//! ```ignore
//! use restwire_core::prelude::*;
//! ```

pub use crate::{
    BodyParam, CookieParam, Error, FileParam, FormFieldParam, HeaderParam, HttpClient, Method,
    Param, Params, PathSegmentParam, QueryParam, Request, RequestBuilder, Response, Result,
};
