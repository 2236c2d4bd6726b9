//! Params derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, parse2};

use crate::attrs::{Annotation, parse_field_options};

/// Expand the `#[derive(Params)]` macro.
pub fn expand_params_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields: Vec<&syn::Field> = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Params derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Params derive only supports structs",
            ));
        }
    };

    let mut specs = Vec::new();
    let mut handlers = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = field_ident.to_string();
        let field_name = field_name.trim_start_matches("r#");
        let Some(options) = parse_field_options(field_name, &field.attrs) else {
            continue;
        };

        if options.flatten {
            handlers.push(quote! {
                params.extend(::restwire::Params::params(&self.#field_ident));
            });
            continue;
        }

        for annotation in &options.annotations {
            specs.push(field_spec(field_name, annotation));
            handlers.push(quote! {
                if let ::std::option::Option::Some(spec) = fields.next() {
                    spec.extract(&self.#field_ident, &mut params);
                }
            });
        }
    }

    let fields_iter = (!specs.is_empty()).then(|| {
        quote! {
            let mut fields = <Self as ::restwire::Params>::FIELDS.iter();
        }
    });

    Ok(quote! {
        impl #impl_generics ::restwire::Params for #name #ty_generics #where_clause {
            const FIELDS: &'static [::restwire::FieldSpec] = &[#(#specs),*];

            #[allow(unused_mut)]
            fn params(&self) -> ::std::vec::Vec<::restwire::Param> {
                let mut params = ::std::vec::Vec::new();
                #fields_iter
                #(#handlers)*
                params
            }
        }
    })
}

fn field_spec(field_name: &str, annotation: &Annotation) -> TokenStream {
    let location = annotation.location.to_tokens();
    let name = &annotation.name;
    let required = annotation.required;
    quote! {
        ::restwire::FieldSpec {
            field: #field_name,
            location: #location,
            name: #name,
            required: #required,
        }
    }
}
