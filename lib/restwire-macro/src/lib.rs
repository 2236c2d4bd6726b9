//! Procedural macros for restwire.
//!
//! - `#[derive(Params)]` - Describe request parameters with annotated struct fields
//!
//! # Example
//!
//! ```ignore
//! use restwire::Params;
//!
//! #[derive(Params)]
//! struct ListRepos {
//!     #[param(path = "owner")]
//!     owner: String,
//!     #[param(query = "per_page")]
//!     per_page: u32,
//!     #[param(query("topic", required))]
//!     topics: Vec<String>,
//! }
//! ```

mod attrs;
mod params_derive;

use proc_macro::TokenStream;

/// Derive the `Params` trait for a struct with named fields.
///
/// # Field Attributes
///
/// Each key of `#[param(...)]` adds one annotation. A field may carry any
/// number of them; every annotation yields its own parameter(s), in source order.
///
/// - `query`, `path`, `header`, `cookie` - target location, with the target name as:
///   - `query = "name"`
///   - `query("name", required)` - emit the field even when it is empty
///   - `query` - use the field name
/// - `flatten` - splice in the parameters of a nested `Params` type
///
/// Without `required`, zero values (`""`, `0`, `false`, `None`, empty
/// collections) are skipped. Sequences yield one parameter per element.
/// Fields without annotations are ignored, and so are fields whose
/// `#[param(...)]` attribute cannot be parsed.
///
/// # Example
///
/// ```ignore
/// use restwire::Params;
///
/// #[derive(Params)]
/// struct GetUser {
///     #[param(path = "id", header = "X-User-Id")]
///     id: u64,
///     #[param(cookie)]
///     session: Option<String>,
///     #[param(flatten)]
///     paging: Paging,
/// }
/// ```
#[proc_macro_derive(Params, attributes(param))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    params_derive::expand_params_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
