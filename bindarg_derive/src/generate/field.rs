use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;

use crate::generate::{describe_type, is_option};
use crate::model::{DeriveDefault, DeriveField, DeriveValue};

impl DeriveField {
    pub(super) fn binding_name(&self) -> String {
        self.field_name.unraw().to_string()
    }

    fn descriptor(&self, type_parameters: &[syn::Ident]) -> TokenStream2 {
        match &self.literal {
            Some(values) => {
                let values = values.iter().map(|DeriveValue { tokens }| {
                    quote! { ::bindarg::IntoValue::into_value(#tokens) }
                });
                let literal = quote! { ::bindarg::TypeDescriptor::literal([#( #values ),*]) };

                if is_option(&self.field_type) {
                    quote! { ::bindarg::TypeDescriptor::optional(#literal) }
                } else {
                    literal
                }
            }
            None => describe_type(&self.field_type, type_parameters),
        }
    }

    /// The `FieldSpec` expression declaring this field.
    pub(super) fn spec(&self, type_parameters: &[syn::Ident]) -> TokenStream2 {
        let name = self.binding_name();
        let field_type = &self.field_type;
        let descriptor = self.descriptor(type_parameters);
        let mut calls = Vec::default();

        match &self.default {
            DeriveDefault::Missing => {}
            DeriveDefault::Value(DeriveValue { tokens }) => {
                calls.push(quote! { .default_value::<#field_type>(#tokens) });
            }
            DeriveDefault::Text(DeriveValue { tokens }) => {
                calls.push(quote! { .default_text(#tokens) });
            }
            DeriveDefault::Trait => {
                calls.push(quote! {
                    .default_factory(|| ::bindarg::IntoValue::into_value(
                        <#field_type as ::std::default::Default>::default()
                    ))
                });
            }
            DeriveDefault::Factory(DeriveValue { tokens }) => {
                calls.push(quote! {
                    .default_factory(|| ::bindarg::IntoValue::into_value(#tokens()))
                });
            }
        }

        if let Some(DeriveValue { tokens }) = &self.parse {
            let label = tokens.to_string().replace(' ', "");
            calls.push(quote! { .parse(::bindarg::Coercion::from_fn(#label, #tokens)) });
        }

        if let Some(DeriveValue { tokens }) = &self.required {
            calls.push(quote! { .required(#tokens) });
        }

        if let Some(DeriveValue { tokens }) = &self.separator {
            calls.push(quote! { .separator(#tokens) });
        }

        if let Some(DeriveValue { tokens }) = &self.choices {
            calls.push(quote! { .choices(#tokens) });
        }

        for DeriveValue { tokens } in &self.aliases {
            calls.push(quote! { .alias(#tokens) });
        }

        if let Some(DeriveValue { tokens }) = &self.help {
            calls.push(quote! { .help(#tokens) });
        }

        if self.multiple {
            calls.push(quote! { .multiple(true) });
        }

        if self.file || self.file_mode.is_some() || self.file_encoding.is_some() {
            calls.push(quote! { .file() });
        }

        if let Some(DeriveValue { tokens }) = &self.file_mode {
            calls.push(quote! { .file_mode(#tokens) });
        }

        if let Some(DeriveValue { tokens }) = &self.file_encoding {
            calls.push(quote! { .file_encoding(#tokens) });
        }

        quote! {
            ::bindarg::FieldSpec::new(#name, #descriptor) #( #calls )*
        }
    }

    /// The initializer of this field inside `from_fields`.
    pub(super) fn assignment(&self) -> TokenStream2 {
        let field_name = &self.field_name;

        if self.skip {
            quote! { #field_name: ::std::default::Default::default() }
        } else {
            let name = self.binding_name();
            quote! { #field_name: fields.take(#name)? }
        }
    }
}
