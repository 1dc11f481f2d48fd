use crate::load::{incompatible_error, load_attributes, single};
use crate::model::{DeriveDefault, DeriveField, DeriveValue};
use crate::ATTRIBUTE;
use quote::ToTokens;

const SINGLETONS: [&str; 5] = ["default", "required", "multiple", "file", "skip"];
const PAIRS: [&str; 12] = [
    "default",
    "default_str",
    "default_with",
    "parse",
    "required",
    "sep",
    "choices",
    "alias",
    "help",
    "file_mode",
    "file_encoding",
    "literal",
];

impl TryFrom<&syn::Field> for DeriveField {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value.ident.clone().ok_or_else(|| {
            syn::Error::new_spanned(value, "Invalid - record fields must be named.")
        })?;
        let attributes = load_attributes(&value.attrs, &field_name, &SINGLETONS, &PAIRS)?;
        let skip = attributes.singletons.contains("skip");

        if skip && (attributes.singletons.len() > 1 || !attributes.pairs.is_empty()) {
            let other = attributes
                .singletons
                .iter()
                .find(|s| s.as_str() != "skip")
                .map(|s| format!("#[{ATTRIBUTE}({s})]"))
                .or_else(|| {
                    attributes
                        .pairs
                        .keys()
                        .next()
                        .map(|k| format!("#[{ATTRIBUTE}({k} = ..)]"))
                })
                .unwrap_or_default();
            return Err(incompatible_error(
                &field_name,
                format!("#[{ATTRIBUTE}(skip)]"),
                other,
            ));
        }

        let mut defaults = Vec::default();

        if attributes.singletons.contains("default") {
            defaults.push(("#[binding(default)]", DeriveDefault::Trait));
        }

        if let Some(value) = single(&attributes, &field_name, "default")? {
            defaults.push(("#[binding(default = ..)]", DeriveDefault::Value(value)));
        }

        if let Some(value) = single(&attributes, &field_name, "default_str")? {
            defaults.push(("#[binding(default_str = ..)]", DeriveDefault::Text(value)));
        }

        if let Some(value) = single(&attributes, &field_name, "default_with")? {
            defaults.push(("#[binding(default_with = ..)]", DeriveDefault::Factory(value)));
        }

        let default = match defaults.as_slice() {
            [] => DeriveDefault::Missing,
            [(_, default)] => default.clone(),
            [(left, _), (right, _), ..] => {
                return Err(incompatible_error(&field_name, *left, *right));
            }
        };

        let required = match single(&attributes, &field_name, "required")? {
            Some(value) => {
                if attributes.singletons.contains("required") {
                    return Err(incompatible_error(
                        &field_name,
                        "#[binding(required)]",
                        "#[binding(required = ..)]",
                    ));
                }
                Some(value)
            }
            None if attributes.singletons.contains("required") => Some(DeriveValue {
                tokens: syn::LitBool::new(true, field_name.span()).into_token_stream(),
            }),
            None => None,
        };

        let literal = match single(&attributes, &field_name, "literal")? {
            Some(value) => match syn::parse2::<syn::ExprArray>(value.tokens) {
                Ok(array) => Some(
                    array
                        .elems
                        .iter()
                        .map(|element| DeriveValue {
                            tokens: element.to_token_stream(),
                        })
                        .collect(),
                ),
                Err(_) => {
                    return Err(syn::Error::new(
                        field_name.span(),
                        "Invalid - attribute `#[binding(literal = ..)]` expects an array `[..]`.",
                    ));
                }
            },
            None => None,
        };

        Ok(DeriveField {
            field_type: value.ty.clone(),
            skip,
            default,
            parse: single(&attributes, &field_name, "parse")?,
            required,
            separator: single(&attributes, &field_name, "sep")?,
            choices: single(&attributes, &field_name, "choices")?,
            aliases: attributes.pairs.get("alias").cloned().unwrap_or_default(),
            help: single(&attributes, &field_name, "help")?,
            multiple: attributes.singletons.contains("multiple"),
            file: attributes.singletons.contains("file"),
            file_mode: single(&attributes, &field_name, "file_mode")?,
            file_encoding: single(&attributes, &field_name, "file_encoding")?,
            literal,
            field_name,
        })
    }
}
