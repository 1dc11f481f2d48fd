use crate::model::{DeriveValue, IntermediateAttributes};
use crate::ATTRIBUTE;

mod attribute;
mod choices;
mod field;
mod record;

fn incompatible_error(
    field_name: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        field_name.span(),
        format!(
            "Invalid - field cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

/// Gather every `#[binding(..)]` attribute, rejecting keys outside `singletons` and `pairs`.
fn load_attributes(
    attrs: &[syn::Attribute],
    name: &syn::Ident,
    singletons: &[&str],
    pairs: &[&str],
) -> Result<IntermediateAttributes, syn::Error> {
    let mut attributes = IntermediateAttributes::default();

    for attribute in attrs {
        if attribute.path().is_ident(ATTRIBUTE) {
            attributes.extend(IntermediateAttributes::try_from(attribute)?);
        }
    }

    for singleton in &attributes.singletons {
        if !singletons.contains(&singleton.as_str()) {
            return Err(unknown_error(name, singleton));
        }
    }

    for key in attributes.pairs.keys() {
        if !pairs.contains(&key.as_str()) {
            return Err(unknown_error(name, format!("{key} = ..")));
        }
    }

    Ok(attributes)
}

fn unknown_error(name: &syn::Ident, attribute: impl Into<String>) -> syn::Error {
    syn::Error::new(
        name.span(),
        format!(
            "Invalid - unknown attribute `#[{ATTRIBUTE}({})]`.",
            attribute.into()
        ),
    )
}

/// The value of a pair that may appear at most once.
fn single(
    attributes: &IntermediateAttributes,
    name: &syn::Ident,
    key: &str,
) -> Result<Option<DeriveValue>, syn::Error> {
    match attributes.pairs.get(key).map(Vec::as_slice) {
        None | Some([]) => Ok(None),
        Some([value]) => Ok(Some(value.clone())),
        Some(_) => Err(syn::Error::new(
            name.span(),
            format!("Invalid - attribute `#[{ATTRIBUTE}({key} = ..)]` may only appear once."),
        )),
    }
}

/// The value of a pair that must be a string literal.
fn single_string(
    attributes: &IntermediateAttributes,
    name: &syn::Ident,
    key: &str,
) -> Result<Option<String>, syn::Error> {
    match single(attributes, name, key)? {
        Some(value) => match syn::parse2::<syn::LitStr>(value.tokens) {
            Ok(literal) => Ok(Some(literal.value())),
            Err(_) => Err(syn::Error::new(
                name.span(),
                format!("Invalid - attribute `#[{ATTRIBUTE}({key} = ..)]` expects a string literal."),
            )),
        },
        None => Ok(None),
    }
}
