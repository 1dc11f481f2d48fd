use crate::load::{load_attributes, single_string};
use crate::model::{DeriveField, DeriveRecord};
use crate::MACRO_RECORD;

impl TryFrom<syn::DeriveInput> for DeriveRecord {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let struct_name = value.ident.clone();
        let attributes = load_attributes(&value.attrs, &struct_name, &[], &["name"])?;
        let record_name =
            single_string(&attributes, &struct_name, "name")?.unwrap_or_else(|| struct_name.to_string());

        match &value.data {
            syn::Data::Struct(ds) => {
                let fields = match &ds.fields {
                    syn::Fields::Named(fields) => fields
                        .named
                        .iter()
                        .map(DeriveField::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                    syn::Fields::Unit => Vec::default(),
                    syn::Fields::Unnamed(_) => {
                        return Err(syn::Error::new(
                            struct_name.span(),
                            format!("Invalid - {MACRO_RECORD} requires named fields."),
                        ));
                    }
                };

                Ok(DeriveRecord {
                    struct_name,
                    record_name,
                    generics: value.generics,
                    fields,
                })
            }
            _ => Err(syn::Error::new(
                struct_name.span(),
                format!("Invalid - {MACRO_RECORD} only applies to 'struct' data structures."),
            )),
        }
    }
}
