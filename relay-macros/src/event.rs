//! `#[derive(Event)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident, LitStr, Token, parse_macro_input};

/// Reads `name = "..."` out of the `#[event(...)]` attributes.
fn event_name(input: &DeriveInput) -> syn::Result<Option<LitStr>> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("event")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                meta.input.parse::<Token![=]>()?;
                name = Some(meta.input.parse::<LitStr>()?);
                Ok(())
            } else {
                let ident = meta
                    .path
                    .get_ident()
                    .map(Ident::to_string)
                    .unwrap_or_default();
                Err(meta.error(format!("unknown attribute: {}", ident)))
            }
        })?;
    }
    Ok(name)
}

/// Implementation of `#[derive(Event)]`.
pub fn derive_event_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let label = match event_name(&input) {
        Ok(label) => label,
        Err(err) => return err.to_compile_error().into(),
    };

    let name_impl = label.map(|label| {
        quote! {
            fn event_name(&self) -> &'static str {
                #label
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics ::relay::Event for #name #ty_generics #where_clause {
            #name_impl
        }
    };

    TokenStream::from(expanded)
}
