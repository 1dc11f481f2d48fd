use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{quote, ToTokens};

mod choices;
mod field;
mod record;

/// The expression describing `ty`, or `Unresolved` when it cannot be named statically.
fn describe_type(ty: &syn::Type, type_parameters: &[syn::Ident]) -> TokenStream2 {
    match ty {
        syn::Type::Paren(paren) => describe_type(&paren.elem, type_parameters),
        syn::Type::Group(group) => describe_type(&group.elem, type_parameters),
        syn::Type::Path(path) if path.qself.is_none() && !mentions(ty.to_token_stream(), type_parameters) => {
            quote! { <#ty as ::bindarg::Describe>::describe() }
        }
        _ => quote! { ::bindarg::TypeDescriptor::Unresolved },
    }
}

// Whether any of the record's type parameters appears in `tokens`.
fn mentions(tokens: TokenStream2, type_parameters: &[syn::Ident]) -> bool {
    tokens.into_iter().any(|token| match token {
        TokenTree::Ident(ident) => type_parameters.contains(&ident),
        TokenTree::Group(group) => mentions(group.stream(), type_parameters),
        _ => false,
    })
}

/// Whether `ty` is spelled `Option<..>`.
fn is_option(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
