//! Attribute parsing for restwire proc-macros.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::ParseStream;
use syn::{Ident, LitStr, Token, parenthesized};

/// Request location named by a `#[param(...)]` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    Query,
    Path,
    Header,
    Cookie,
}

impl Location {
    /// Parse a location key. Returns `None` for unknown keys.
    #[must_use]
    pub(crate) fn parse(ident: &Ident) -> Option<Self> {
        match ident.to_string().as_str() {
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    /// Path of the matching `ParamLocation` variant.
    pub(crate) fn to_tokens(self) -> TokenStream {
        match self {
            Self::Query => quote!(::restwire::ParamLocation::Query),
            Self::Path => quote!(::restwire::ParamLocation::Path),
            Self::Header => quote!(::restwire::ParamLocation::Header),
            Self::Cookie => quote!(::restwire::ParamLocation::Cookie),
        }
    }
}

/// One location annotation, e.g. `query("page", required)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Annotation {
    pub(crate) location: Location,
    pub(crate) name: String,
    pub(crate) required: bool,
}

/// What the `#[param(...)]` attributes of a field ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldOptions {
    /// Location annotations, in source order.
    pub(crate) annotations: Vec<Annotation>,
    /// Splice the parameters of the field's own `Params` impl.
    pub(crate) flatten: bool,
}

/// Parse every `#[param(...)]` attribute of a field.
///
/// Returns `None` when an attribute is malformed; the field is then skipped
/// entirely. Unknown keys and options are ignored.
#[must_use]
pub(crate) fn parse_field_options(field_name: &str, attrs: &[syn::Attribute]) -> Option<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let Some(key) = meta.path.get_ident() else {
                return skip_value(meta.input);
            };

            if key == "flatten" {
                options.flatten = true;
                return Ok(());
            }

            let Some(location) = Location::parse(key) else {
                return skip_value(meta.input);
            };

            let (name, required) = if meta.input.peek(Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                (value.value(), false)
            } else if meta.input.peek(syn::token::Paren) {
                parse_name_and_options(meta.input)?
            } else {
                (field_name.to_string(), false)
            };

            options.annotations.push(Annotation {
                location,
                name,
                required,
            });
            Ok(())
        })
        .ok()?;
    }

    Some(options)
}

/// Parse `("name", option, ...)`. Only the `required` option is recognized.
fn parse_name_and_options(input: ParseStream<'_>) -> syn::Result<(String, bool)> {
    let content;
    parenthesized!(content in input);

    let name: LitStr = content.parse()?;
    let mut required = false;
    while !content.is_empty() {
        content.parse::<Token![,]>()?;
        if content.is_empty() {
            break;
        }
        let option: Ident = content.parse()?;
        if option == "required" {
            required = true;
        }
    }
    Ok((name.value(), required))
}

/// Consume the value of an ignored key: `= <expr>` or `(...)`.
fn skip_value(input: ParseStream<'_>) -> syn::Result<()> {
    if input.peek(Token![=]) {
        input.parse::<Token![=]>()?;
        input.parse::<syn::Expr>()?;
    } else if input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in input);
        content.parse::<TokenStream>()?;
    }
    Ok(())
}
