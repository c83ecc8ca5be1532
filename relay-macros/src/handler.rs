//! `#[handler]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    FnArg, GenericArgument, Ident, ItemFn, LitInt, LitStr, PathArguments, ReturnType, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[handler]` macro.
pub(crate) struct HandlerArgs {
    pub priority: Option<i32>,
    pub owner: Option<LitStr>,
}

impl Parse for HandlerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut priority = None;
        let mut owner = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "priority" => {
                    let lit: LitInt = input.parse()?;
                    priority = Some(lit.base10_parse()?);
                }
                "owner" => {
                    owner = Some(input.parse()?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(HandlerArgs { priority, owner })
    }
}

/// Extracts `T` from `&EventHandle<T>`.
fn event_type(ty: &Type) -> Option<&Type> {
    let Type::Reference(reference) = ty else {
        return None;
    };
    let Type::Path(path) = &*reference.elem else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "EventHandle" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

/// Implementation of the `#[handler]` macro.
pub fn handler_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as HandlerArgs);
    let input = parse_macro_input!(item as ItemFn);

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;

    if let Some(asyncness) = &input.sig.asyncness {
        return syn::Error::new_spanned(
            asyncness,
            "Handler function must not be async; hold the event and resume it from the async work",
        )
        .to_compile_error()
        .into();
    }

    let inputs = &input.sig.inputs;
    if inputs.len() != 1 {
        return syn::Error::new_spanned(
            inputs,
            "Handler function must take exactly one argument: fn(event: &EventHandle<T>)",
        )
        .to_compile_error()
        .into();
    }

    let (event_pat, event_ty) = match inputs.first() {
        Some(FnArg::Typed(pat_type)) => match event_type(&pat_type.ty) {
            Some(ty) => (&pat_type.pat, ty),
            None => {
                return syn::Error::new_spanned(
                    &pat_type.ty,
                    "Handler event argument must be `&EventHandle<T>`",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(inputs, "Handler cannot have self parameter")
                .to_compile_error()
                .into();
        }
    };

    let body = match &input.sig.output {
        ReturnType::Default => quote! {
            #fn_block
            ::core::result::Result::Ok(())
        },
        ReturnType::Type(..) => quote! { #fn_block },
    };

    let priority = args.priority.unwrap_or(0);
    let owner = match &args.owner {
        Some(owner) => quote! { #owner },
        None => quote! { concat!(module_path!(), "::", stringify!(#fn_name)) },
    };

    let expanded = quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Auto-generated Handler from `#[relay::handler]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #fn_name;

        impl #fn_name {
            /// The priority tier of this handler. Lower values run first.
            pub const PRIORITY: i32 = #priority;

            /// The owner reported when this handler stalls a dispatch.
            pub const OWNER: &'static str = #owner;

            /// Registration metadata carrying the priority and owner.
            pub fn meta() -> ::relay::RegistrationMeta {
                ::relay::RegistrationMeta::new()
                    .with_priority(Self::PRIORITY)
                    .with_owner(Self::OWNER)
            }
        }

        impl ::relay::Handler<#event_ty> for #fn_name {
            fn handle(
                &self,
                #event_pat: &::relay::EventHandle<#event_ty>,
            ) -> ::core::result::Result<(), ::relay::BoxError> {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}
