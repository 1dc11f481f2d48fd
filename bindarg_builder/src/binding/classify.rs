use thiserror::Error;
use tracing::debug;

use crate::binding::coerce::Coercion;
use crate::model::{ChoiceSet, CollectionKind, ScalarKind, StreamKind, TypeDescriptor, WrapperKind};

/// The element type of a container or mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// A scalar.
    Scalar(ScalarKind),
    /// An untyped pass-through.
    Any,
}

impl Element {
    fn of(descriptor: &TypeDescriptor) -> Option<Element> {
        match descriptor {
            TypeDescriptor::Scalar(kind) => Some(Element::Scalar(*kind)),
            TypeDescriptor::Any => Some(Element::Any),
            _ => None,
        }
    }

    /// The conversion of one raw token to this element.
    pub fn coercion(&self) -> Coercion {
        match self {
            Element::Scalar(kind) => Coercion::scalar(*kind),
            Element::Any => Coercion::identity(),
        }
    }

    fn descriptor(&self) -> TypeDescriptor {
        match self {
            Element::Scalar(kind) => TypeDescriptor::Scalar(*kind),
            Element::Any => TypeDescriptor::Any,
        }
    }
}

/// The classified shape of a field type, one variant per wrapper kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A scalar.
    Basic(ScalarKind),
    /// A switch.
    Bool,
    /// An enumeration.
    Enum(ChoiceSet),
    /// A literal set.
    Literal(ChoiceSet),
    /// A container of scalar (or untyped) elements.
    Collection(CollectionKind, Element),
    /// A mapping between scalar (or untyped) keys and values.
    Dict {
        /// The key element.
        key: Element,
        /// The value element.
        value: Element,
    },
    /// A file.
    File(StreamKind),
    /// A type with no inferable conversion.
    Complex(String),
    /// An unresolvable type.
    Unknown,
}

impl Shape {
    /// The wrapper kind.
    pub fn kind(&self) -> WrapperKind {
        match self {
            Shape::Basic(_) => WrapperKind::Basic,
            Shape::Bool => WrapperKind::Bool,
            Shape::Enum(_) => WrapperKind::Enum,
            Shape::Literal(_) => WrapperKind::Literal,
            Shape::Collection(kind, _) => WrapperKind::from(*kind),
            Shape::Dict { .. } => WrapperKind::Dict,
            Shape::File(_) => WrapperKind::File,
            Shape::Complex(_) => WrapperKind::Complex,
            Shape::Unknown => WrapperKind::Unknown,
        }
    }

    /// The inferred conversion of one raw token, if any.
    pub fn coercion(&self) -> Option<Coercion> {
        match self {
            Shape::Basic(kind) => Some(Coercion::scalar(*kind)),
            Shape::Enum(choices) | Shape::Literal(choices) => Some(Coercion::choices(choices.clone())),
            Shape::Collection(_, element) => Some(element.coercion()),
            Shape::Dict { key, value } => Some(Coercion::dict(*key, *value)),
            Shape::File(StreamKind::Text) => Some(Coercion::scalar(ScalarKind::Text)),
            Shape::File(_) => Some(Coercion::identity()),
            Shape::Bool | Shape::Complex(_) | Shape::Unknown => None,
        }
    }

    /// The string representations of an enumeration or literal set.
    pub fn choices(&self) -> Option<Vec<String>> {
        match self {
            Shape::Enum(choices) | Shape::Literal(choices) => Some(choices.reprs()),
            _ => None,
        }
    }

    /// The generic arguments the shape was classified with.
    pub fn generics(&self) -> Vec<TypeDescriptor> {
        match self {
            Shape::Collection(_, element) => vec![element.descriptor()],
            Shape::Dict { key, value } => vec![key.descriptor(), value.descriptor()],
            _ => vec![],
        }
    }
}

/// An optional type wrapping more than one alternative.
#[derive(Debug, Error, PartialEq)]
#[error("an optional type may only wrap one alternative (found {0}).")]
pub struct AmbiguousUnion(pub String);

/// Classify a static type by its structure.
pub fn classify(descriptor: &TypeDescriptor) -> Result<Shape, AmbiguousUnion> {
    let shape = match descriptor {
        TypeDescriptor::Unresolved | TypeDescriptor::Absent => Shape::Unknown,
        TypeDescriptor::Scalar(kind) => Shape::Basic(*kind),
        TypeDescriptor::Bool => Shape::Bool,
        TypeDescriptor::Union(arms) => {
            let present: Vec<&TypeDescriptor> = arms
                .iter()
                .filter(|arm| **arm != TypeDescriptor::Absent)
                .collect();

            match present.as_slice() {
                [] => Shape::Unknown,
                [single] => return classify(single),
                many => {
                    let rendered = many
                        .iter()
                        .map(|arm| arm.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(AmbiguousUnion(rendered));
                }
            }
        }
        TypeDescriptor::Enum(choices) => Shape::Enum(choices.clone()),
        TypeDescriptor::Literal(choices) => Shape::Literal(choices.clone()),
        TypeDescriptor::Dict(generics) => match generics.as_slice() {
            [] => Shape::Dict {
                key: Element::Any,
                value: Element::Any,
            },
            [key, value] => match (Element::of(key), Element::of(value)) {
                (Some(key), Some(value)) => Shape::Dict { key, value },
                _ => Shape::Complex(descriptor.to_string()),
            },
            _ => Shape::Complex(descriptor.to_string()),
        },
        TypeDescriptor::Collection(kind, generics) => match generics.as_slice() {
            [] => Shape::Collection(*kind, Element::Any),
            [element] => match Element::of(element) {
                Some(element) => Shape::Collection(*kind, element),
                None => Shape::Complex(descriptor.to_string()),
            },
            _ => Shape::Complex(descriptor.to_string()),
        },
        TypeDescriptor::Stream(kind) => Shape::File(*kind),
        TypeDescriptor::Any | TypeDescriptor::Complex(_) => Shape::Complex(descriptor.to_string()),
    };

    debug!(descriptor = %descriptor, kind = %shape.kind(), "classified");
    Ok(shape)
}
