use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveChoices, DeriveVariant};

impl TryFrom<DeriveChoices> for TokenStream2 {
    type Error = syn::Error;

    fn try_from(value: DeriveChoices) -> Result<Self, Self::Error> {
        let DeriveChoices {
            enum_name,
            variants,
        } = value;
        let type_name = enum_name.to_string();

        let members = variants.iter().map(|DeriveVariant { variant_name, repr }| {
            let variant = variant_name.to_string();
            quote! { ::bindarg::Choice::member(#type_name, #variant, #repr) }
        });
        let into_arms = variants.iter().map(|DeriveVariant { variant_name, repr }| {
            let variant = variant_name.to_string();
            quote! {
                #enum_name::#variant_name => ::bindarg::Value::Member(
                    ::bindarg::Member::new(#type_name, #variant, #repr)
                )
            }
        });
        let from_arms = variants.iter().map(|DeriveVariant { variant_name, .. }| {
            let variant = variant_name.to_string();
            quote! { #variant => ::std::result::Result::Ok(#enum_name::#variant_name) }
        });

        Ok(quote! {
            impl ::bindarg::Describe for #enum_name {
                fn describe() -> ::bindarg::TypeDescriptor {
                    ::bindarg::TypeDescriptor::Enum(::bindarg::ChoiceSet::new(
                        #type_name,
                        [#( #members ),*],
                    ))
                }
            }

            impl ::bindarg::IntoValue for #enum_name {
                fn into_value(self) -> ::bindarg::Value {
                    match self {
                        #( #into_arms ),*
                    }
                }
            }

            impl ::bindarg::FromValue for #enum_name {
                fn from_value(
                    value: ::bindarg::Value,
                ) -> ::std::result::Result<Self, ::bindarg::ValueError> {
                    if let ::bindarg::Value::Member(member) = &value {
                        if member.type_name() == #type_name {
                            return match member.variant() {
                                #( #from_arms, )*
                                _ => ::std::result::Result::Err(::bindarg::ValueError::mismatch(#type_name, &value)),
                            };
                        }
                    }

                    ::std::result::Result::Err(::bindarg::ValueError::mismatch(#type_name, &value))
                }
            }
        })
    }
}
