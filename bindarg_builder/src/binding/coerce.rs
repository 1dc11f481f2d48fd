use std::fmt;
use std::sync::Arc;

use crate::binding::classify::Element;
use crate::error::CoerceError;
use crate::model::{ChoiceSet, CollectionKind, ScalarKind};
use crate::resource::{FileMode, ResourceOpener};
use crate::value::{json_integer, IntoValue, SharedFile, Value};

type CoerceFn = dyn Fn(&str) -> Result<Value, CoerceError> + Send + Sync;

/// The conversion of one raw command line token into a field value.
#[derive(Clone)]
pub struct Coercion {
    label: String,
    function: Arc<CoerceFn>,
}

impl Coercion {
    /// A coercion named `label` (shown in diagnostics) running `function`.
    pub fn new(
        label: impl Into<String>,
        function: impl Fn(&str) -> Result<Value, CoerceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            function: Arc::new(function),
        }
    }

    /// Lift a typed parse function, such as a `FromStr`-like `fn(&str) -> Result<T, E>`.
    pub fn from_fn<T, E, F>(label: impl Into<String>, function: F) -> Self
    where
        T: IntoValue,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::new(label, move |raw| {
            function(raw)
                .map(IntoValue::into_value)
                .map_err(|error| CoerceError::Custom(error.to_string()))
        })
    }

    /// Pass the token through as text.
    pub fn identity() -> Self {
        Self::new("identity", |raw| Ok(Value::Text(raw.to_string())))
    }

    /// Convert the token to a scalar.
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::new(kind.to_string(), move |raw| coerce_scalar(kind, raw))
    }

    /// Look the token up among the representations of `choices`.
    pub fn choices(choices: ChoiceSet) -> Self {
        Self::new(choices.type_name().to_string(), move |raw| {
            choices
                .lookup(raw)
                .cloned()
                .ok_or_else(|| CoerceError::NoMatchingValue {
                    value: raw.to_string(),
                    choices: render_choices(&choices.reprs()),
                })
        })
    }

    /// Read a JSON object from the token, or from the file it names, converting every entry.
    pub fn dict(key: Element, value: Element) -> Self {
        Self::new("dict", move |raw| coerce_dict(raw, key, value))
    }

    /// Open the path named by the token.
    pub fn file(
        mode: FileMode,
        encoding: impl Into<String>,
        opener: Arc<dyn ResourceOpener>,
    ) -> Self {
        let encoding = encoding.into();
        Self::new(format!("file ({mode})"), move |raw| {
            opener
                .open(raw, mode, &encoding)
                .map(|handle| Value::File(SharedFile::new(handle)))
        })
    }

    /// Split the token on `separator`, coerce each piece, and wrap the pieces in `container`.
    ///
    /// Without a container the pieces are left as a raw [`Value::Sequence`].
    pub fn separated(self, separator: impl Into<String>, container: Option<CollectionKind>) -> Self {
        let separator = separator.into();
        let label = format!("{} separated by '{}'", self.label, separator);

        Self::new(label, move |raw| {
            let elements = raw
                .split(separator.as_str())
                .map(|piece| self.coerce(piece))
                .collect::<Result<Vec<_>, _>>()?;
            let sequence = Value::Sequence(elements);

            Ok(match container {
                Some(kind) => sequence.wrap(kind),
                None => sequence,
            })
        })
    }

    /// Accept only values equal to the coercion of one of `choices`.
    pub fn restricted(self, choices: Vec<String>) -> Self {
        let label = self.label.clone();

        Self::new(label, move |raw| {
            let value = self.coerce(raw)?;
            let allowed = choices
                .iter()
                .any(|choice| matches!(self.coerce(choice), Ok(candidate) if candidate == value));

            if allowed {
                Ok(value)
            } else {
                Err(CoerceError::InvalidChoice {
                    value: raw.to_string(),
                    choices: render_choices(&choices),
                })
            }
        })
    }

    /// The diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Convert `raw`.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        (self.function)(raw)
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coercion({})", self.label)
    }
}

pub(crate) fn render_choices(choices: &[String]) -> String {
    choices
        .iter()
        .map(|choice| format!("'{choice}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn coerce_scalar(kind: ScalarKind, raw: &str) -> Result<Value, CoerceError> {
    let invalid = |reason: String| CoerceError::InvalidScalar {
        value: raw.to_string(),
        kind,
        reason,
    };

    match kind {
        ScalarKind::Text => Ok(Value::Text(raw.to_string())),
        ScalarKind::Integer => raw
            .trim()
            .parse::<i128>()
            .map(Value::Int)
            .map_err(|error| invalid(error.to_string())),
        ScalarKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|error| invalid(error.to_string())),
        // Bytes are always the UTF-8 encoding of the token.
        ScalarKind::Bytes => Ok(Value::Bytes(raw.as_bytes().to_vec())),
    }
}

fn coerce_json(element: Element, json: serde_json::Value) -> Result<Value, CoerceError> {
    let kind = match element {
        Element::Any => return Ok(Value::Json(json)),
        Element::Scalar(kind) => kind,
    };
    let not_scalar = |json: &serde_json::Value| CoerceError::InvalidScalar {
        value: json.to_string(),
        kind,
        reason: "not a scalar".to_string(),
    };

    match (kind, json) {
        (_, serde_json::Value::String(text)) => coerce_scalar(kind, &text),
        (ScalarKind::Integer, serde_json::Value::Number(number)) => json_integer(&number)
            .map(Value::Int)
            .ok_or_else(|| not_scalar(&serde_json::Value::Number(number))),
        (ScalarKind::Float, serde_json::Value::Number(number)) => number
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| not_scalar(&serde_json::Value::Number(number))),
        (ScalarKind::Integer, serde_json::Value::Bool(flag)) => Ok(Value::Int(i128::from(flag))),
        (ScalarKind::Float, serde_json::Value::Bool(flag)) => {
            Ok(Value::Float(if flag { 1.0 } else { 0.0 }))
        }
        (ScalarKind::Text, other) => Ok(Value::Text(other.to_string())),
        (_, other) => Err(not_scalar(&other)),
    }
}

fn coerce_dict(raw: &str, key: Element, value: Element) -> Result<Value, CoerceError> {
    let object = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(object)) => object,
        _ => read_json_file(raw)?,
    };

    object
        .into_iter()
        .map(|(k, v)| {
            let k = match key {
                Element::Any => Value::Json(serde_json::Value::String(k)),
                Element::Scalar(kind) => coerce_scalar(kind, &k)?,
            };
            Ok((k, coerce_json(value, v)?))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Map)
}

fn read_json_file(raw: &str) -> Result<serde_json::Map<String, serde_json::Value>, CoerceError> {
    let not_json = || CoerceError::NotJson {
        value: raw.to_string(),
    };
    let content = std::fs::read_to_string(raw).map_err(|_| not_json())?;

    match serde_json::from_str::<serde_json::Value>(&content).map_err(|_| not_json())? {
        serde_json::Value::Object(object) => Ok(object),
        _ => Err(CoerceError::NotAMapping {
            value: raw.to_string(),
        }),
    }
}
