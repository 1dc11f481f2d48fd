use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::model::{CollectionKind, ScalarKind, StreamKind, TypeDescriptor};
use crate::resource::{BinaryFile, FileHandle, TextFile};
use crate::value::{Bytes, Queue};

/// Produce the static [`TypeDescriptor`] of a field type.
///
/// `#[derive(Record)]` calls this for every bound field.
/// Implement it (or use [`impl_complex!`](crate::impl_complex)) to bind your own types.
pub trait Describe {
    /// The descriptor of `Self`.
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_as {
    ($descriptor:expr => $($target:ty),*) => {
        $(
            impl Describe for $target {
                fn describe() -> TypeDescriptor {
                    $descriptor
                }
            }
        )*
    };
}

describe_as!(TypeDescriptor::Scalar(ScalarKind::Text) => String, PathBuf);
describe_as!(TypeDescriptor::Scalar(ScalarKind::Integer) => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
describe_as!(TypeDescriptor::Scalar(ScalarKind::Float) => f32, f64);
describe_as!(TypeDescriptor::Scalar(ScalarKind::Bytes) => Bytes);
describe_as!(TypeDescriptor::Any => serde_json::Value);
describe_as!(TypeDescriptor::Bool => bool);
describe_as!(TypeDescriptor::Stream(StreamKind::Text) => TextFile);
describe_as!(TypeDescriptor::Stream(StreamKind::Binary) => BinaryFile);
describe_as!(TypeDescriptor::Stream(StreamKind::Generic) => FileHandle);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::optional(T::describe())
    }
}

macro_rules! describe_collection {
    ($kind:expr => $($target:ident),*) => {
        $(
            impl<T: Describe> Describe for $target<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::collection($kind, T::describe())
                }
            }
        )*
    };
}

describe_collection!(CollectionKind::List => Vec);
describe_collection!(CollectionKind::Set => HashSet, BTreeSet);
describe_collection!(CollectionKind::Queue => Queue);
describe_collection!(CollectionKind::Deque => VecDeque);

impl<T: Describe> Describe for Box<[T]> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection(CollectionKind::Tuple, T::describe())
    }
}

macro_rules! describe_dict {
    ($($target:ident),*) => {
        $(
            impl<K: Describe, V: Describe> Describe for $target<K, V> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::dict(K::describe(), V::describe())
                }
            }
        )*
    };
}

describe_dict!(HashMap, BTreeMap, IndexMap);

/// Bind a user type as a `Complex` field, carried through coercion as [`Value::Opaque`](crate::Value::Opaque).
///
/// The type must be `Clone + Send + Sync + 'static`, and the field needs an explicit `parse` coercion.
///
/// ```ignore
/// #[derive(Clone)]
/// struct Endpoint { host: String, port: u16 }
/// impl_complex!(Endpoint);
/// ```
#[macro_export]
macro_rules! impl_complex {
    ($($target:ty),+ $(,)?) => {
        $(
            impl $crate::Describe for $target {
                fn describe() -> $crate::TypeDescriptor {
                    $crate::TypeDescriptor::complex(stringify!($target))
                }
            }

            impl $crate::IntoValue for $target {
                fn into_value(self) -> $crate::Value {
                    $crate::Value::Opaque($crate::Opaque::new(self))
                }
            }

            impl $crate::FromValue for $target {
                fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::ValueError> {
                    match value {
                        $crate::Value::Opaque(ref opaque) => opaque.downcast::<$target>().ok_or_else(|| {
                            $crate::ValueError::mismatch(stringify!($target), &value)
                        }),
                        other => ::std::result::Result::Err($crate::ValueError::mismatch(stringify!($target), &other)),
                    }
                }
            }
        )+
    };
}
