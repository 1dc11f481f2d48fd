use crate::load::{load_attributes, single_string};
use crate::model::{DeriveChoices, DeriveVariant};
use crate::MACRO_CHOICES;

impl TryFrom<syn::DeriveInput> for DeriveChoices {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let enum_name = &value.ident;

        match &value.data {
            syn::Data::Enum(de) => {
                let variants = de
                    .variants
                    .iter()
                    .map(DeriveVariant::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                for (i, variant) in variants.iter().enumerate() {
                    if let Some(other) = variants[..i].iter().find(|v| v.repr == variant.repr) {
                        return Err(syn::Error::new(
                            variant.variant_name.span(),
                            format!(
                                "Invalid - variants `{}` and `{}` share the value '{}'.",
                                other.variant_name, variant.variant_name, variant.repr
                            ),
                        ));
                    }
                }

                Ok(DeriveChoices {
                    enum_name: enum_name.clone(),
                    variants,
                })
            }
            _ => Err(syn::Error::new(
                enum_name.span(),
                format!("Invalid - {MACRO_CHOICES} only applies to 'enum' data structures."),
            )),
        }
    }
}

impl TryFrom<&syn::Variant> for DeriveVariant {
    type Error = syn::Error;

    fn try_from(value: &syn::Variant) -> Result<Self, Self::Error> {
        let variant_name = value.ident.clone();

        if !matches!(value.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                variant_name.span(),
                format!("Invalid - {MACRO_CHOICES} only applies to unit variants."),
            ));
        }

        let attributes = load_attributes(&value.attrs, &variant_name, &[], &["value"])?;
        let repr = single_string(&attributes, &variant_name, "value")?
            .unwrap_or_else(|| kebab_case(&variant_name.to_string()));

        Ok(DeriveVariant { variant_name, repr })
    }
}

/// `DryRun` becomes `dry-run`, `HTTPServer` becomes `http-server`.
fn kebab_case(name: &str) -> String {
    let characters: Vec<char> = name.chars().collect();
    let mut kebab = String::with_capacity(name.len() + 4);

    for (i, c) in characters.iter().enumerate() {
        if *c == '_' {
            kebab.push('-');
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let previous = characters[i - 1];
            let next_lower = characters.get(i + 1).is_some_and(|n| n.is_lowercase());

            if previous.is_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_uppercase() && next_lower)
            {
                kebab.push('-');
            }
        }

        kebab.extend(c.to_lowercase());
    }

    kebab
}
