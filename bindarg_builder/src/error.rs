use thiserror::Error;

use crate::model::ScalarKind;

/// A fatal error raised while turning record definitions into bindings.
///
/// These surface before any command line token is consumed.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The field's type could not be classified and no explicit coercion was supplied.
    #[error("cannot bind field '{field}': its type is not supported, supply an explicit `parse` coercion.")]
    UnknownType {
        /// The offending field.
        field: String,
    },
    /// The field's optional type wraps more than one alternative.
    #[error("cannot bind field '{field}': an optional type may only wrap one alternative (found {arms}).")]
    AmbiguousUnion {
        /// The offending field.
        field: String,
        /// The rendered non-absent alternatives.
        arms: String,
    },
    /// The field's textual default does not survive its own coercion.
    #[error("cannot bind field '{field}': invalid default: {source}")]
    DefaultCoercion {
        /// The offending field.
        field: String,
        /// The coercion failure.
        source: CoerceError,
    },
    /// The field's file mode or encoding is not supported.
    #[error("cannot bind field '{field}': {source}")]
    InvalidFile {
        /// The offending field.
        field: String,
        /// The unsupported setting.
        source: CoerceError,
    },
    /// An alias is empty or made only of separator characters.
    #[error("cannot bind field '{field}': invalid alias '{alias}'.")]
    InvalidAlias {
        /// The offending field.
        field: String,
        /// The alias as declared.
        alias: String,
    },
    /// Two fields declare the same option spelling.
    #[error("cannot bind option '{option}': declared by both '{first}' and '{second}'.")]
    ConflictingOption {
        /// The colliding spelling.
        option: String,
        /// The field that declared it first.
        first: String,
        /// The field that declared it again.
        second: String,
    },
    /// A field declares an option spelling reserved for help.
    #[error("cannot bind option '{option}' for field '{field}': it is reserved.")]
    ReservedOption {
        /// The offending field.
        field: String,
        /// The reserved spelling.
        option: String,
    },
}

/// A fatal error raised while converting one raw value.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// The raw text is not the representation of any enumeration/literal member.
    #[error("no matching value for '{value}' (choose from {choices}).")]
    NoMatchingValue {
        /// The raw text.
        value: String,
        /// The rendered choices.
        choices: String,
    },
    /// The converted value is not one of the explicitly declared choices.
    #[error("invalid choice: '{value}' (choose from {choices})")]
    InvalidChoice {
        /// The raw text.
        value: String,
        /// The rendered choices.
        choices: String,
    },
    /// The raw text is neither a JSON object nor the path of a file holding one.
    #[error("'{value}' is neither a valid JSON literal nor a valid JSON file.")]
    NotJson {
        /// The raw text.
        value: String,
    },
    /// The JSON document does not hold an object.
    #[error("'{value}' does not hold a JSON object.")]
    NotAMapping {
        /// The raw text.
        value: String,
    },
    /// The raw text cannot be converted to the scalar kind.
    #[error("cannot convert '{value}' to {kind}: {reason}.")]
    InvalidScalar {
        /// The raw text.
        value: String,
        /// The target kind.
        kind: ScalarKind,
        /// The underlying failure.
        reason: String,
    },
    /// The resource cannot be opened.
    #[error("can't open '{path}': {reason}")]
    CannotOpen {
        /// The path as given.
        path: String,
        /// The operating system message.
        reason: String,
    },
    /// Only UTF-8 text is supported.
    #[error("unsupported encoding '{0}'.")]
    UnsupportedEncoding(String),
    /// The file mode is not one of `r`, `w`, `a` (optionally with `b`/`t`).
    #[error("unsupported file mode '{0}'.")]
    UnsupportedMode(String),
    /// A user supplied coercion failed.
    #[error("{0}")]
    Custom(String),
}

/// A failure recovering a typed field from a coerced [`crate::Value`].
#[derive(Debug, Error)]
pub enum ValueError {
    /// The value has a different shape than the field.
    #[error("expected {expected}, found {found}.")]
    Mismatch {
        /// What the field expects.
        expected: String,
        /// What the value holds.
        found: String,
    },
    /// The number does not fit the field's integer type.
    #[error("{value} is out of range for {target}.")]
    OutOfRange {
        /// The rendered number.
        value: String,
        /// The target integer type.
        target: &'static str,
    },
    /// Reading a file's content failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValueError {
    /// Construct a `Mismatch` for the value `found`.
    pub fn mismatch(expected: impl Into<String>, found: &crate::Value) -> Self {
        ValueError::Mismatch {
            expected: expected.into(),
            found: found.kind_name().to_string(),
        }
    }
}

/// A fatal error aborting a whole parse/reconstruct pass.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The bindings could not be constructed.
    #[error(transparent)]
    Binding(#[from] BindingError),
    /// The command line engine rejected the tokens (this includes help requests).
    #[error(transparent)]
    Engine(#[from] clap::Error),
    /// A raw value could not be coerced.
    #[error("argument '{field}': {source}")]
    Coerce {
        /// The field being parsed.
        field: String,
        /// The coercion failure.
        source: CoerceError,
    },
    /// A required field was not supplied.
    #[error("missing required argument '{field}'.")]
    MissingRequired {
        /// The field.
        field: String,
    },
    /// The namespace holds no value for a field.
    #[error("no value parsed for field '{field}'.")]
    MissingField {
        /// The field.
        field: String,
    },
    /// A coerced value could not be recovered as the field's type.
    #[error("field '{field}': {source}")]
    Value {
        /// The field.
        field: String,
        /// The recovery failure.
        source: ValueError,
    },
    /// The requested record was not part of the pass.
    #[error("record '{record}' was not registered.")]
    RecordNotRegistered {
        /// The record name.
        record: String,
    },
}

impl ParseError {
    /// The process exit code for this error.
    ///
    /// Engine errors carry their own code (`0` for help); every other error is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ParseError::Engine(error) => error.exit_code(),
            _ => 1,
        }
    }
}
