//! Procedural macros for the typed-emitter crate.
//!
//! - `#[derive(EventName)]`: Implements `typed_emitter::EventName` for an enum of
//!   unit variants. Every variant becomes an allowed event name, so an emitter
//!   parameterized with the enum validates names without explicit configuration.
//!
//! Usage:
//! ```rust,ignore
//! use typed_emitter::EventName;
//!
//! #[derive(EventName)]
//! enum Events {
//!     #[event(name = "foo")]
//!     Foo,
//!     #[event(name = "bar")]
//!     Bar,
//! }
//! ```
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Variant, parse_macro_input};

#[proc_macro_derive(EventName, attributes(event))]
pub fn derive_event_name(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "EventName can only be derived for enums",
        ));
    };

    let mut match_arms = Vec::with_capacity(data_enum.variants.len());
    let mut names = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "EventName variants must not carry data",
            ));
        }
        let variant_ident = &variant.ident;
        let name = variant_name(variant)?;
        match_arms.push(quote! { Self::#variant_ident => #name });
        names.push(name);
    }

    let name_body = if match_arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#match_arms),*
            }
        }
    };

    Ok(quote! {
        impl #impl_generics typed_emitter::EventName for #ident #ty_generics #where_clause {
            fn name(&self) -> &str {
                #name_body
            }

            fn allowed_names() -> ::std::option::Option<&'static [&'static str]> {
                ::std::option::Option::Some(&[#(#names),*])
            }
        }
    })
}

/// Variant identifier, unless overridden by `#[event(name = "...")]`.
fn variant_name(variant: &Variant) -> syn::Result<String> {
    let mut name = None;
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("event")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported event attribute, expected `name`"))
            }
        })?;
    }
    Ok(name.unwrap_or_else(|| variant.ident.to_string()))
}
