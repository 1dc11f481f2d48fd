use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::DeriveRecord;

impl TryFrom<DeriveRecord> for TokenStream2 {
    type Error = syn::Error;

    fn try_from(value: DeriveRecord) -> Result<Self, Self::Error> {
        let DeriveRecord {
            struct_name,
            record_name,
            mut generics,
            fields,
        } = value;
        let type_parameters: Vec<syn::Ident> = generics
            .type_params()
            .map(|parameter| parameter.ident.clone())
            .collect();

        if !type_parameters.is_empty() {
            let where_clause = generics.make_where_clause();

            for parameter in &type_parameters {
                where_clause
                    .predicates
                    .push(syn::parse_quote! { #parameter: ::bindarg::FromValue });
            }
        }

        let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
        let specs = fields
            .iter()
            .filter(|field| !field.skip)
            .map(|field| field.spec(&type_parameters));
        let assignments = fields.iter().map(|field| field.assignment());

        Ok(quote! {
            impl #impl_generics ::bindarg::Record for #struct_name #type_generics #where_clause {
                fn record_name() -> &'static str {
                    #record_name
                }

                fn fields() -> ::std::vec::Vec<::bindarg::FieldSpec> {
                    ::std::vec![#( #specs ),*]
                }

                fn from_fields(
                    fields: &mut ::bindarg::FieldValues,
                ) -> ::std::result::Result<Self, ::bindarg::ParseError> {
                    ::std::result::Result::Ok(Self {
                        #( #assignments ),*
                    })
                }
            }

            impl #impl_generics ::bindarg::Describe for #struct_name #type_generics #where_clause {
                fn describe() -> ::bindarg::TypeDescriptor {
                    ::bindarg::TypeDescriptor::complex(#record_name)
                }
            }
        })
    }
}
