use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let expressions = value.parse_args_with(attributes_parser)?;
        let mut attributes = IntermediateAttributes::default();

        for expression in expressions {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let left = assignment.left.to_token_stream();
                    attributes
                        .pairs
                        .entry(left.to_string())
                        .or_default()
                        .push(DeriveValue {
                            tokens: assignment.right.to_token_stream(),
                        });
                }
                syn::Expr::Path(path) if path.path.get_ident().is_some() => {
                    attributes
                        .singletons
                        .insert(path.path.to_token_stream().to_string());
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        &other,
                        format!(
                            "Invalid - unparseable attribute `{}`.",
                            other.to_token_stream()
                        ),
                    ));
                }
            };
        }

        Ok(attributes)
    }
}

impl IntermediateAttributes {
    pub fn extend(&mut self, other: IntermediateAttributes) {
        let IntermediateAttributes { singletons, pairs } = other;
        self.singletons.extend(singletons);

        for (key, values) in pairs {
            self.pairs.entry(key).or_default().extend(values);
        }
    }
}
