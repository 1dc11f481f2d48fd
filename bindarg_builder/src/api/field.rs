use crate::binding::Coercion;
use crate::model::TypeDescriptor;
use crate::value::{IntoValue, Value};

/// Where a field's default comes from.
#[derive(Debug, Clone)]
pub enum DefaultSpec {
    /// No default; the field is required unless overridden.
    Missing,
    /// A literal default.
    Value(Value),
    /// A factory, invoked once when the binding is built.
    Factory(fn() -> Value),
}

/// The explicit, per-field overrides layered over inference.
///
/// Every option defaults to "infer".
#[derive(Debug, Clone, Default)]
pub struct FieldOverrides {
    /// An explicit coercion, replacing the inferred one.
    pub coercion: Option<Coercion>,
    /// Explicit requiredness.
    pub required: Option<bool>,
    /// Separator for expanding one token into several elements.
    pub separator: Option<String>,
    /// Explicit choices, validated against the coerced value.
    pub choices: Option<Vec<String>>,
    /// Alternate names.
    pub aliases: Vec<String>,
    /// Help text.
    pub help: Option<String>,
    /// Forced multiplicity.
    pub multiple: Option<bool>,
    /// Treat the raw value as a path to open.
    pub file: bool,
    /// The mode to open the file with (default `r`).
    pub file_mode: Option<String>,
    /// The encoding of a text file (default `utf-8`).
    pub file_encoding: Option<String>,
}

/// A record field as declared: its name, static type, default and overrides.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ty: TypeDescriptor,
    default: DefaultSpec,
    overrides: FieldOverrides,
}

impl FieldSpec {
    /// Declare the field `name` of type `ty`.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            default: DefaultSpec::Missing,
            overrides: FieldOverrides::default(),
        }
    }

    /// Set a literal default.
    pub fn default_value<V: IntoValue>(mut self, value: V) -> Self {
        self.default = DefaultSpec::Value(value.into_value());
        self
    }

    /// Set a literal default given as command line text.
    pub fn default_text(mut self, text: impl Into<String>) -> Self {
        self.default = DefaultSpec::Value(Value::Text(text.into()));
        self
    }

    /// Set a default factory.
    pub fn default_factory(mut self, factory: fn() -> Value) -> Self {
        self.default = DefaultSpec::Factory(factory);
        self
    }

    /// Set an explicit coercion.
    pub fn parse(mut self, coercion: Coercion) -> Self {
        self.overrides.coercion = Some(coercion);
        self
    }

    /// Set explicit requiredness.
    pub fn required(mut self, required: bool) -> Self {
        self.overrides.required = Some(required);
        self
    }

    /// Set the separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.overrides.separator = Some(separator.into());
        self
    }

    /// Set explicit choices.
    pub fn choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.overrides.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Add an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.overrides.aliases.push(alias.into());
        self
    }

    /// Set the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.overrides.help = Some(help.into());
        self
    }

    /// Force multiplicity.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.overrides.multiple = Some(multiple);
        self
    }

    /// Treat the raw value as a path to open.
    pub fn file(mut self) -> Self {
        self.overrides.file = true;
        self
    }

    /// Set the file mode.
    pub fn file_mode(mut self, mode: impl Into<String>) -> Self {
        self.overrides.file_mode = Some(mode.into());
        self
    }

    /// Set the file encoding.
    pub fn file_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.overrides.file_encoding = Some(encoding.into());
        self
    }

    /// Replace every override at once.
    pub fn overrides(mut self, overrides: FieldOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The field's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's static type.
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// The field's default.
    pub fn default_spec(&self) -> &DefaultSpec {
        &self.default
    }

    /// The field's overrides.
    pub fn field_overrides(&self) -> &FieldOverrides {
        &self.overrides
    }
}
