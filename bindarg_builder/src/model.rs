use std::fmt;

use crate::value::{Member, Value};

/// The scalar kinds a raw token may be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// UTF-8 text.
    Text,
    /// A signed integer.
    Integer,
    /// A floating point number.
    Float,
    /// A byte sequence (the UTF-8 encoding of the text).
    Bytes,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Text => write!(f, "text"),
            ScalarKind::Integer => write!(f, "integer"),
            ScalarKind::Float => write!(f, "float"),
            ScalarKind::Bytes => write!(f, "bytes"),
        }
    }
}

/// The content flavour of a file-like type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// A text stream.
    Text,
    /// A binary stream.
    Binary,
    /// A stream of unspecified content.
    Generic,
}

/// The five container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// An ordered list.
    List,
    /// An ordered, fixed sequence.
    Tuple,
    /// Unique elements, in order of first occurrence.
    Set,
    /// A first-in-first-out queue.
    Queue,
    /// A double-ended queue.
    Deque,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::List => write!(f, "List"),
            CollectionKind::Tuple => write!(f, "Tuple"),
            CollectionKind::Set => write!(f, "Set"),
            CollectionKind::Queue => write!(f, "Queue"),
            CollectionKind::Deque => write!(f, "Deque"),
        }
    }
}

/// The closed classification of a field's value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// A scalar.
    Basic,
    /// An on/off switch.
    Bool,
    /// An enumeration.
    Enum,
    /// A literal set.
    Literal,
    /// A list container.
    List,
    /// A tuple container.
    Tuple,
    /// A set container.
    Set,
    /// A queue container.
    Queue,
    /// A double-ended queue container.
    Dequeue,
    /// A mapping.
    Dict,
    /// A file handle.
    File,
    /// A user defined or unsupported nested type.
    Complex,
    /// An unresolvable type.
    Unknown,
}

impl WrapperKind {
    /// Whether this is one of the five container kinds.
    pub fn is_collection(self) -> bool {
        self.collection().is_some()
    }

    /// The container kind, if this is one.
    pub fn collection(self) -> Option<CollectionKind> {
        match self {
            WrapperKind::List => Some(CollectionKind::List),
            WrapperKind::Tuple => Some(CollectionKind::Tuple),
            WrapperKind::Set => Some(CollectionKind::Set),
            WrapperKind::Queue => Some(CollectionKind::Queue),
            WrapperKind::Dequeue => Some(CollectionKind::Deque),
            _ => None,
        }
    }
}

impl From<CollectionKind> for WrapperKind {
    fn from(value: CollectionKind) -> Self {
        match value {
            CollectionKind::List => WrapperKind::List,
            CollectionKind::Tuple => WrapperKind::Tuple,
            CollectionKind::Set => WrapperKind::Set,
            CollectionKind::Queue => WrapperKind::Queue,
            CollectionKind::Deque => WrapperKind::Dequeue,
        }
    }
}

impl fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One member of an enumeration or literal set: its string representation and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    repr: String,
    value: Value,
}

impl Choice {
    /// A choice represented by `repr`.
    pub fn new(repr: impl Into<String>, value: Value) -> Self {
        Self {
            repr: repr.into(),
            value,
        }
    }

    /// An enumeration member choice.
    pub fn member(
        type_name: impl Into<String>,
        variant: impl Into<String>,
        repr: impl Into<String>,
    ) -> Self {
        let repr = repr.into();
        Self {
            value: Value::Member(Member::new(type_name, variant, repr.clone())),
            repr,
        }
    }

    /// The string representation.
    pub fn repr(&self) -> &str {
        &self.repr
    }

    /// The member value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// The ordered members of an enumeration or literal set.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSet {
    type_name: String,
    members: Vec<Choice>,
}

impl ChoiceSet {
    /// Create a choice set for the type `type_name`.
    pub fn new(type_name: impl Into<String>, members: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            type_name: type_name.into(),
            members: members.into_iter().collect(),
        }
    }

    /// Create a literal set; each value is represented by its display form.
    pub fn literal(values: impl IntoIterator<Item = Value>) -> Self {
        Self::new(
            "Literal",
            values
                .into_iter()
                .map(|value| Choice::new(value.to_string(), value)),
        )
    }

    /// The name of the type the members belong to.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The members, in declaration order.
    pub fn members(&self) -> &[Choice] {
        &self.members
    }

    /// The string representations, in declaration order.
    pub fn reprs(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|choice| choice.repr.clone())
            .collect()
    }

    /// Find the member represented by `repr`.
    pub fn lookup(&self, repr: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|choice| choice.repr == repr)
            .map(|choice| &choice.value)
    }
}

/// The static type of a field, as seen by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A type that cannot be named statically.
    Unresolved,
    /// The absent arm of an optional type.
    Absent,
    /// A scalar.
    Scalar(ScalarKind),
    /// An untyped pass-through value.
    Any,
    /// A boolean.
    Bool,
    /// A union of alternatives (`Option<T>` is `Union([T, Absent])`).
    Union(Vec<TypeDescriptor>),
    /// An enumeration.
    Enum(ChoiceSet),
    /// A literal set.
    Literal(ChoiceSet),
    /// A container with its generic arguments.
    Collection(CollectionKind, Vec<TypeDescriptor>),
    /// A mapping with its generic arguments.
    Dict(Vec<TypeDescriptor>),
    /// A file-like type.
    Stream(StreamKind),
    /// A named user type.
    Complex(String),
}

impl TypeDescriptor {
    /// `Union([inner, Absent])`.
    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Union(vec![inner, TypeDescriptor::Absent])
    }

    /// A container of `element`.
    pub fn collection(kind: CollectionKind, element: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(kind, vec![element])
    }

    /// A mapping from `key` to `value`.
    pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Dict(vec![key, value])
    }

    /// A literal set of `values`.
    pub fn literal(values: impl IntoIterator<Item = Value>) -> Self {
        TypeDescriptor::Literal(ChoiceSet::literal(values))
    }

    /// A named user type.
    pub fn complex(name: impl Into<String>) -> Self {
        TypeDescriptor::Complex(name.into())
    }

    /// The generic arguments, if any.
    pub fn generics(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Union(arms) => arms,
            TypeDescriptor::Collection(_, generics) | TypeDescriptor::Dict(generics) => generics,
            _ => &[],
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(generics: &[TypeDescriptor]) -> String {
            generics
                .iter()
                .map(|generic| generic.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            TypeDescriptor::Unresolved => write!(f, "?"),
            TypeDescriptor::Absent => write!(f, "None"),
            TypeDescriptor::Scalar(kind) => write!(f, "{kind}"),
            TypeDescriptor::Any => write!(f, "Any"),
            TypeDescriptor::Bool => write!(f, "bool"),
            TypeDescriptor::Union(arms) => write!(f, "Union[{}]", join(arms)),
            TypeDescriptor::Enum(choices) => write!(f, "{}", choices.type_name()),
            TypeDescriptor::Literal(choices) => write!(f, "Literal[{}]", choices.reprs().join(", ")),
            TypeDescriptor::Collection(kind, generics) => write!(f, "{kind}[{}]", join(generics)),
            TypeDescriptor::Dict(generics) => write!(f, "Dict[{}]", join(generics)),
            TypeDescriptor::Stream(StreamKind::Text) => write!(f, "TextFile"),
            TypeDescriptor::Stream(StreamKind::Binary) => write!(f, "BinaryFile"),
            TypeDescriptor::Stream(StreamKind::Generic) => write!(f, "FileHandle"),
            TypeDescriptor::Complex(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WrapperKind::Basic, false)]
    #[case(WrapperKind::Bool, false)]
    #[case(WrapperKind::List, true)]
    #[case(WrapperKind::Tuple, true)]
    #[case(WrapperKind::Set, true)]
    #[case(WrapperKind::Queue, true)]
    #[case(WrapperKind::Dequeue, true)]
    #[case(WrapperKind::Dict, false)]
    #[case(WrapperKind::Complex, false)]
    fn wrapper_is_collection(#[case] kind: WrapperKind, #[case] expected: bool) {
        assert_eq!(kind.is_collection(), expected);
    }

    #[rstest]
    #[case(CollectionKind::List)]
    #[case(CollectionKind::Tuple)]
    #[case(CollectionKind::Set)]
    #[case(CollectionKind::Queue)]
    #[case(CollectionKind::Deque)]
    fn wrapper_collection_inverse(#[case] kind: CollectionKind) {
        assert_eq!(WrapperKind::from(kind).collection(), Some(kind));
    }

    #[test]
    fn choice_set_lookup() {
        // Setup
        let choices = ChoiceSet::literal([Value::Int(1), Value::Int(2)]);

        // Execute
        let one = choices.lookup("1");
        let three = choices.lookup("3");

        // Verify
        assert_eq!(choices.reprs(), vec!["1", "2"]);
        assert_eq!(one, Some(&Value::Int(1)));
        assert_eq!(three, None);
    }

    #[test]
    fn descriptor_display() {
        // Setup
        let descriptor = TypeDescriptor::optional(TypeDescriptor::collection(
            CollectionKind::List,
            TypeDescriptor::Scalar(ScalarKind::Integer),
        ));

        // Execute
        let rendered = descriptor.to_string();

        // Verify
        assert_eq!(rendered, "Union[List[integer], None]");
    }
}
