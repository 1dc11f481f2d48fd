//! The dynamically typed values produced by coercion and consumed by reconstruction.
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::model::CollectionKind;
use crate::resource::FileHandle;

mod containers;
mod convert;

pub use containers::{Bytes, Queue};
pub(crate) use convert::json_integer;
pub use convert::{FromValue, IntoValue};

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (`None`).
    Absent,
    /// A boolean.
    Bool(bool),
    /// An integer, wide enough for every signed and unsigned primitive.
    Int(i128),
    /// A floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// A byte sequence.
    Bytes(Vec<u8>),
    /// An enumeration member.
    Member(Member),
    /// An untyped JSON value.
    Json(serde_json::Value),
    /// The raw, not yet wrapped, values of a repeated option.
    Sequence(Vec<Value>),
    /// A list.
    List(Vec<Value>),
    /// A tuple.
    Tuple(Vec<Value>),
    /// A set, in order of first occurrence.
    Set(Vec<Value>),
    /// A queue, front first.
    Queue(Vec<Value>),
    /// A double-ended queue, front first.
    Deque(Vec<Value>),
    /// A mapping, in insertion order.
    Map(Vec<(Value, Value)>),
    /// An opened file.
    File(SharedFile),
    /// A user type produced by an explicit coercion.
    Opaque(Opaque),
}

impl Value {
    /// A short name of the value's shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Member(_) => "enum member",
            Value::Json(_) => "json",
            Value::Sequence(_) => "sequence",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Queue(_) => "queue",
            Value::Deque(_) => "deque",
            Value::Map(_) => "mapping",
            Value::File(_) => "file",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Whether this is `Absent`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The elements of any sequence-like value; anything else is handed back.
    pub fn into_elements(self) -> Result<Vec<Value>, Value> {
        match self {
            Value::Sequence(elements)
            | Value::List(elements)
            | Value::Tuple(elements)
            | Value::Set(elements)
            | Value::Queue(elements)
            | Value::Deque(elements) => Ok(elements),
            other => Err(other),
        }
    }

    /// Wrap a sequence-like value in the container `kind`.
    ///
    /// Values that are not sequence-like (such as `Absent`) are returned unchanged.
    pub fn wrap(self, kind: CollectionKind) -> Value {
        match self.into_elements() {
            Ok(elements) => match kind {
                CollectionKind::List => Value::List(elements),
                CollectionKind::Tuple => Value::Tuple(elements),
                CollectionKind::Set => {
                    let mut unique: Vec<Value> = Vec::with_capacity(elements.len());
                    for element in elements {
                        if !unique.contains(&element) {
                            unique.push(element);
                        }
                    }
                    Value::Set(unique)
                }
                CollectionKind::Queue => Value::Queue(elements),
                CollectionKind::Deque => Value::Deque(elements),
            },
            Err(other) => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(values: &[Value]) -> String {
            values
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            Value::Absent => write!(f, "None"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value}"),
            Value::Bytes(value) => write!(f, "{}", String::from_utf8_lossy(value)),
            Value::Member(member) => write!(f, "{member}"),
            Value::Json(value) => write!(f, "{value}"),
            Value::Sequence(values)
            | Value::List(values)
            | Value::Tuple(values)
            | Value::Set(values)
            | Value::Queue(values)
            | Value::Deque(values) => write!(f, "[{}]", join(values)),
            Value::Map(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{pairs}}}")
            }
            Value::File(file) => write!(f, "{}", file.path()),
            Value::Opaque(opaque) => write!(f, "<{}>", opaque.type_name()),
        }
    }
}

/// An enumeration member, identified by its type and variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    type_name: String,
    variant: String,
    repr: String,
}

impl Member {
    /// Create a member of `type_name`, represented on the command line by `repr`.
    pub fn new(
        type_name: impl Into<String>,
        variant: impl Into<String>,
        repr: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
            repr: repr.into(),
        }
    }

    /// The enumeration's name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The variant's name.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// The command line representation.
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr)
    }
}

/// A user value carried through coercion untouched.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    /// Wrap `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// The wrapped type's name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// A clone of the wrapped value, if it is a `T`.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.inner.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.inner) as *const () == Arc::as_ptr(&other.inner) as *const ()
    }
}

/// An opened file, shared between every copy of the value that holds it.
///
/// Every record reading the value receives a clone of the same handle.
#[derive(Clone)]
pub struct SharedFile {
    handle: FileHandle,
}

impl SharedFile {
    /// Share `handle`.
    pub fn new(handle: FileHandle) -> Self {
        Self { handle }
    }

    /// The path the file was opened from.
    pub fn path(&self) -> &str {
        self.handle.path()
    }

    /// A handle on the shared stream.
    pub fn handle(&self) -> FileHandle {
        self.handle.clone()
    }
}

impl fmt::Debug for SharedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedFile({})", self.path())
    }
}

impl PartialEq for SharedFile {
    fn eq(&self, other: &Self) -> bool {
        self.handle.same_stream(&other.handle)
    }
}
