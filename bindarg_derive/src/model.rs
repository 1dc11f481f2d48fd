use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.to_string() == other.tokens.to_string()
    }
}

impl Eq for DeriveValue {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeriveDefault {
    Missing,
    /// `default = EXPR`
    Value(DeriveValue),
    /// `default_str = ".."`
    Text(DeriveValue),
    /// `default`
    Trait,
    /// `default_with = PATH`
    Factory(DeriveValue),
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveField {
    pub field_name: syn::Ident,
    pub field_type: syn::Type,
    pub skip: bool,
    pub default: DeriveDefault,
    pub parse: Option<DeriveValue>,
    pub required: Option<DeriveValue>,
    pub separator: Option<DeriveValue>,
    pub choices: Option<DeriveValue>,
    pub aliases: Vec<DeriveValue>,
    pub help: Option<DeriveValue>,
    pub multiple: bool,
    pub file: bool,
    pub file_mode: Option<DeriveValue>,
    pub file_encoding: Option<DeriveValue>,
    pub literal: Option<Vec<DeriveValue>>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveRecord {
    pub struct_name: syn::Ident,
    pub record_name: String,
    pub generics: syn::Generics,
    pub fields: Vec<DeriveField>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveVariant {
    pub variant_name: syn::Ident,
    pub repr: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveChoices {
    pub enum_name: syn::Ident,
    pub variants: Vec<DeriveVariant>,
}
