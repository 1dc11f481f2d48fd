use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{DefaultSpec, FieldSpec};
use crate::binding::classify::{classify, AmbiguousUnion, Shape};
use crate::binding::coerce::{render_choices, Coercion};
use crate::binding::options::options;
use crate::error::{BindingError, CoerceError};
use crate::model::WrapperKind;
use crate::resource::{check_encoding, FileMode, FsOpener, ResourceOpener};
use crate::value::Value;

const DEFAULT_FILE_MODE: &str = "r";
const DEFAULT_FILE_ENCODING: &str = "utf-8";

/// A field's resolved default.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// No default: the field must be supplied.
    Required,
    /// The default value.
    Value(Value),
}

/// A non-fatal finding about a field's declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// An explicit coercion replaced the inferred one.
    ShadowedCoercion,
    /// A complex field without an explicit coercion receives the raw text.
    ComplexWithoutCoercion,
    /// A complex field without help text.
    ComplexWithoutHelp,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ShadowedCoercion => {
                write!(f, "the explicit coercion overrides the one inferred from the type")
            }
            Advisory::ComplexWithoutCoercion => write!(
                f,
                "complex type without an explicit coercion, the raw text is passed through"
            ),
            Advisory::ComplexWithoutHelp => write!(f, "complex type without help text"),
        }
    }
}

/// How many values an option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// None: presence flips the field.
    Switch,
    /// Precisely one.
    Single,
    /// Any number, gathered across occurrences.
    Variadic,
}

/// The canonical binding of one field.
#[derive(Debug, Clone)]
pub struct FieldBindingDescriptor {
    name: String,
    shape: Shape,
    coercion: Option<Coercion>,
    aliases: Vec<String>,
    choices: Option<Vec<String>>,
    multiple: bool,
    default: FieldDefault,
    separator: Option<String>,
    required: bool,
    help: Option<String>,
    file: bool,
    file_mode: FileMode,
    file_encoding: String,
    advisories: Vec<Advisory>,
}

impl FieldBindingDescriptor {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The classified shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The wrapper kind.
    pub fn kind(&self) -> WrapperKind {
        self.shape.kind()
    }

    /// The per-token conversion; `None` for switches and uncoerced complex fields.
    pub fn coercion(&self) -> Option<&Coercion> {
        self.coercion.as_ref()
    }

    /// The aliases.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The valid string representations.
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Whether the field accepts more than one element.
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    /// The resolved default.
    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    /// The separator, present only when the field is multiple.
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// Whether the field must be supplied.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The user help text.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether the raw value is a path to open.
    pub fn file(&self) -> bool {
        self.file
    }

    /// The mode file fields are opened with.
    pub fn file_mode(&self) -> FileMode {
        self.file_mode
    }

    /// The encoding of text file fields.
    pub fn file_encoding(&self) -> &str {
        &self.file_encoding
    }

    /// The non-fatal findings reported while building.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Whether this is an on/off switch.
    pub fn is_switch(&self) -> bool {
        self.kind() == WrapperKind::Bool
    }

    /// The value a switch holds when its flag is absent.
    pub fn switch_default(&self) -> bool {
        matches!(self.default, FieldDefault::Value(Value::Bool(true)))
    }

    /// How many values the option consumes.
    pub fn arity(&self) -> Arity {
        if self.is_switch() {
            Arity::Switch
        } else if self.multiple && self.separator.is_none() {
            Arity::Variadic
        } else {
            Arity::Single
        }
    }

    /// The generated hints appended to the help text.
    pub fn help_suffix(&self) -> String {
        let mut suffix = Vec::new();

        if let Some(separator) = &self.separator {
            suffix.push(format!(
                "A string with multiple values, each separated by \"{separator}\"."
            ));
        }

        if self.kind() == WrapperKind::Dict {
            suffix.push("A JSON string or a JSON file to convert to a dictionary object.".to_string());
        }

        if self.required {
            suffix.push("REQUIRED.".to_string());
        } else if self.is_switch() {
            let state = if self.switch_default() {
                "enabled"
            } else {
                "disabled"
            };
            suffix.push(format!("Optional. {} is {state} by default.", self.name));
        } else if let FieldDefault::Value(value) = &self.default {
            suffix.push(format!("Optional. Default `{value}`."));
        }

        suffix.join(" ")
    }

    /// The user help followed by the generated hints.
    pub fn help_text(&self) -> String {
        match &self.help {
            Some(help) if !help.is_empty() => format!("{help} {}", self.help_suffix()),
            _ => self.help_suffix(),
        }
    }
}

/// Builds [`FieldBindingDescriptor`]s, opening file fields through a [`ResourceOpener`].
#[derive(Clone)]
pub struct DescriptorBuilder {
    opener: Arc<dyn ResourceOpener>,
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self {
            opener: Arc::new(FsOpener),
        }
    }
}

impl DescriptorBuilder {
    /// A builder opening files from the file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open file fields through `opener`.
    pub fn opener(mut self, opener: Arc<dyn ResourceOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Combine the classification of `field`'s type with its overrides.
    pub fn build(&self, field: &FieldSpec) -> Result<FieldBindingDescriptor, BindingError> {
        let name = field.name();
        let overrides = field.field_overrides();
        let shape = classify(field.ty()).map_err(|AmbiguousUnion(arms)| {
            BindingError::AmbiguousUnion {
                field: name.to_string(),
                arms,
            }
        })?;
        let kind = shape.kind();
        let mut advisories = Vec::new();

        if kind == WrapperKind::Unknown && overrides.coercion.is_none() && !overrides.file {
            return Err(BindingError::UnknownType {
                field: name.to_string(),
            });
        }

        if let Some(alias) = overrides
            .aliases
            .iter()
            .find(|alias| alias.chars().all(|c| c == '-' || c == '_'))
        {
            return Err(BindingError::InvalidAlias {
                field: name.to_string(),
                alias: alias.clone(),
            });
        }

        let mut coercion = match (&overrides.coercion, shape.coercion()) {
            (Some(explicit), Some(_)) => {
                advisories.push(Advisory::ShadowedCoercion);
                Some(explicit.clone())
            }
            (Some(explicit), None) => Some(explicit.clone()),
            (None, inferred) => inferred,
        };

        let has_default = !matches!(field.default_spec(), DefaultSpec::Missing);
        let required = overrides.required.unwrap_or(!has_default);
        let mut choices = overrides.choices.clone().or_else(|| shape.choices());
        let mut multiple = overrides.multiple.unwrap_or_else(|| kind.is_collection());
        let mut separator = None;

        if let Some(explicit) = &overrides.choices {
            coercion = coercion.map(|inner| inner.restricted(explicit.clone()));
        }

        if multiple {
            if let Some(split) = &overrides.separator {
                let element = coercion.take().unwrap_or_else(Coercion::identity);
                coercion = Some(element.separated(split.clone(), kind.collection()));
                separator = Some(split.clone());
            }
        }

        let invalid_file = |source: CoerceError| BindingError::InvalidFile {
            field: name.to_string(),
            source,
        };
        let file = overrides.file || kind == WrapperKind::File;
        let file_mode = FileMode::parse(overrides.file_mode.as_deref().unwrap_or(DEFAULT_FILE_MODE))
            .map_err(invalid_file)?;
        let file_encoding = overrides
            .file_encoding
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_ENCODING.to_string());

        if file {
            if !file_mode.is_binary() {
                check_encoding(&file_encoding).map_err(invalid_file)?;
            }

            coercion = Some(Coercion::file(
                file_mode,
                file_encoding.clone(),
                self.opener.clone(),
            ));
            choices = None;
            multiple = false;
            separator = None;
        }

        if kind == WrapperKind::Bool {
            coercion = None;
            choices = None;
            multiple = false;
            separator = None;
        }

        let default = match field.default_spec() {
            DefaultSpec::Missing if required => FieldDefault::Required,
            DefaultSpec::Missing => FieldDefault::Value(Value::Absent),
            DefaultSpec::Value(value) => FieldDefault::Value(value.clone()),
            DefaultSpec::Factory(factory) => FieldDefault::Value(factory()),
        };

        // File defaults are opened lazily, when the flag is absent.
        let default = match (default, &coercion) {
            (FieldDefault::Value(Value::Text(text)), Some(coercion)) if !file => {
                let value = coercion
                    .coerce(&text)
                    .map_err(|source| BindingError::DefaultCoercion {
                        field: name.to_string(),
                        source,
                    })?;
                FieldDefault::Value(value)
            }
            (FieldDefault::Value(Value::Text(text)), None) if kind == WrapperKind::Bool => {
                let value = switch_state(&text).map_err(|source| BindingError::DefaultCoercion {
                    field: name.to_string(),
                    source,
                })?;
                FieldDefault::Value(value)
            }
            (default, _) => default,
        };

        if kind == WrapperKind::Complex {
            if overrides.coercion.is_none() {
                advisories.push(Advisory::ComplexWithoutCoercion);
            }

            if overrides.help.is_none() {
                advisories.push(Advisory::ComplexWithoutHelp);
            }
        }

        for advisory in &advisories {
            warn!(field = name, "{advisory}");
        }

        let descriptor = FieldBindingDescriptor {
            name: name.to_string(),
            shape,
            coercion,
            aliases: overrides.aliases.clone(),
            choices,
            multiple,
            default,
            separator,
            required,
            help: overrides.help.clone(),
            file,
            file_mode,
            file_encoding,
            advisories,
        };
        debug!(
            field = name,
            kind = %descriptor.kind(),
            required = descriptor.required,
            multiple = descriptor.multiple,
            options = ?options(&descriptor),
            "built binding"
        );
        Ok(descriptor)
    }
}

fn switch_state(text: &str) -> Result<Value, CoerceError> {
    match text.trim() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        other => Err(CoerceError::NoMatchingValue {
            value: other.to_string(),
            choices: render_choices(&["true".to_string(), "false".to_string()]),
        }),
    }
}

/// Build the descriptor of `field`, opening file fields from the file system.
pub fn build(field: &FieldSpec) -> Result<FieldBindingDescriptor, BindingError> {
    DescriptorBuilder::default().build(field)
}
