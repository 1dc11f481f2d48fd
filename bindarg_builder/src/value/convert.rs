use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::io::Read;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::ValueError;
use crate::resource::{BinaryFile, FileHandle, TextFile};
use crate::value::{Bytes, Queue, SharedFile, Value};

/// Recover a typed field from its coerced [`Value`].
pub trait FromValue: Sized {
    /// Convert `value`, failing if its shape does not fit.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// Lower a typed default into a [`Value`].
pub trait IntoValue {
    /// Convert `self`.
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(flag) | Value::Json(serde_json::Value::Bool(flag)) => Ok(flag),
            other => Err(ValueError::mismatch("bool", &other)),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

/// The integral value of a JSON number, if it has one.
pub(crate) fn json_integer(number: &serde_json::Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

macro_rules! impl_integer {
    ($($target:ty),*) => {
        $(
            impl FromValue for $target {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let out_of_range = |rendered: String| ValueError::OutOfRange {
                        value: rendered,
                        target: stringify!($target),
                    };

                    match value {
                        Value::Int(number) => {
                            <$target>::try_from(number).map_err(|_| out_of_range(number.to_string()))
                        }
                        Value::Json(serde_json::Value::Number(number)) => match json_integer(&number) {
                            Some(integer) => {
                                <$target>::try_from(integer).map_err(|_| out_of_range(integer.to_string()))
                            }
                            None => Err(ValueError::Mismatch {
                                expected: stringify!($target).to_string(),
                                found: format!("json number {number}"),
                            }),
                        },
                        Value::Text(text) => text.trim().parse::<$target>().map_err(|_| ValueError::Mismatch {
                            expected: stringify!($target).to_string(),
                            found: format!("text '{text}'"),
                        }),
                        other => Err(ValueError::mismatch(stringify!($target), &other)),
                    }
                }
            }

            impl IntoValue for $target {
                fn into_value(self) -> Value {
                    Value::Int(self as i128)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($target:ty),*) => {
        $(
            impl FromValue for $target {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Float(number) => Ok(number as $target),
                        Value::Int(number) => Ok(number as $target),
                        Value::Json(serde_json::Value::Number(ref number)) => match number.as_f64() {
                            Some(number) => Ok(number as $target),
                            None => Err(ValueError::mismatch(stringify!($target), &value)),
                        },
                        Value::Text(text) => text.trim().parse::<$target>().map_err(|_| ValueError::Mismatch {
                            expected: stringify!($target).to_string(),
                            found: format!("text '{text}'"),
                        }),
                        other => Err(ValueError::mismatch(stringify!($target), &other)),
                    }
                }
            }

            impl IntoValue for $target {
                fn into_value(self) -> Value {
                    Value::Float(self as f64)
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) | Value::Json(serde_json::Value::String(text)) => Ok(text),
            Value::File(file) => {
                let mut content = String::new();
                file.handle().read_to_string(&mut content)?;
                Ok(content)
            }
            other => Err(ValueError::mismatch("text", &other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) => Ok(PathBuf::from(text)),
            Value::File(file) => Ok(PathBuf::from(file.path())),
            other => Err(ValueError::mismatch("path", &other)),
        }
    }
}

impl IntoValue for PathBuf {
    fn into_value(self) -> Value {
        Value::Text(self.to_string_lossy().into_owned())
    }
}

impl FromValue for Bytes {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(bytes) => Ok(Bytes::from(bytes)),
            Value::Text(text) => Ok(Bytes::from(text.into_bytes())),
            Value::File(file) => {
                let mut content = Vec::new();
                file.handle().read_to_end(&mut content)?;
                Ok(Bytes::from(content))
            }
            other => Err(ValueError::mismatch("bytes", &other)),
        }
    }
}

impl IntoValue for Bytes {
    fn into_value(self) -> Value {
        Value::Bytes(self.into_inner())
    }
}

fn to_json(value: Value) -> Result<serde_json::Value, ValueError> {
    Ok(match value {
        Value::Absent => serde_json::Value::Null,
        Value::Bool(flag) => serde_json::Value::Bool(flag),
        Value::Int(number) => match (i64::try_from(number), u64::try_from(number)) {
            (Ok(signed), _) => serde_json::Value::from(signed),
            (_, Ok(unsigned)) => serde_json::Value::from(unsigned),
            _ => {
                return Err(ValueError::OutOfRange {
                    value: number.to_string(),
                    target: "json number",
                })
            }
        },
        Value::Float(number) => serde_json::Number::from_f64(number)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(text) => serde_json::Value::String(text),
        Value::Bytes(bytes) => serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Member(member) => serde_json::Value::String(member.repr().to_string()),
        Value::Json(json) => json,
        Value::Sequence(elements)
        | Value::List(elements)
        | Value::Tuple(elements)
        | Value::Set(elements)
        | Value::Queue(elements)
        | Value::Deque(elements) => serde_json::Value::Array(
            elements
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Map(pairs) => {
            let mut object = serde_json::Map::new();
            for (key, value) in pairs {
                let key = match key {
                    Value::Text(text) => text,
                    other => other.to_string(),
                };
                object.insert(key, to_json(value)?);
            }
            serde_json::Value::Object(object)
        }
        other => return Err(ValueError::mismatch("json", &other)),
    })
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        to_json(value)
    }
}

impl IntoValue for serde_json::Value {
    fn into_value(self) -> Value {
        Value::Json(self)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Absent | Value::Json(serde_json::Value::Null) => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Absent,
        }
    }
}

fn elements<T: FromValue>(value: Value, expected: &str) -> Result<Vec<T>, ValueError> {
    match value.into_elements() {
        Ok(elements) => elements.into_iter().map(T::from_value).collect(),
        Err(Value::Json(serde_json::Value::Array(elements))) => elements
            .into_iter()
            .map(|element| T::from_value(Value::Json(element)))
            .collect(),
        Err(other) => Err(ValueError::mismatch(expected, &other)),
    }
}

fn lower<T: IntoValue>(items: impl IntoIterator<Item = T>) -> Vec<Value> {
    items.into_iter().map(IntoValue::into_value).collect()
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        elements(value, "list")
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(lower(self))
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        elements(value, "tuple").map(Vec::into_boxed_slice)
    }
}

impl<T: IntoValue> IntoValue for Box<[T]> {
    fn into_value(self) -> Value {
        Value::Tuple(lower(self.into_vec()))
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(elements::<T>(value, "set")?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for HashSet<T> {
    fn into_value(self) -> Value {
        Value::Set(lower(self))
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(elements::<T>(value, "set")?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(lower(self))
    }
}

impl<T: FromValue> FromValue for Queue<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(elements::<T>(value, "queue")?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for Queue<T> {
    fn into_value(self) -> Value {
        Value::Queue(lower(self))
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(elements::<T>(value, "deque")?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        Value::Deque(lower(self))
    }
}

fn pairs<K: FromValue, V: FromValue>(value: Value) -> Result<Vec<(K, V)>, ValueError> {
    match value {
        Value::Map(pairs) => pairs
            .into_iter()
            .map(|(key, value)| Ok((K::from_value(key)?, V::from_value(value)?)))
            .collect(),
        Value::Json(serde_json::Value::Object(object)) => object
            .into_iter()
            .map(|(key, value)| {
                Ok((
                    K::from_value(Value::Text(key))?,
                    V::from_value(Value::Json(value))?,
                ))
            })
            .collect(),
        other => Err(ValueError::mismatch("mapping", &other)),
    }
}

fn lower_pairs<K: IntoValue, V: IntoValue>(pairs: impl IntoIterator<Item = (K, V)>) -> Value {
    Value::Map(
        pairs
            .into_iter()
            .map(|(key, value)| (key.into_value(), value.into_value()))
            .collect(),
    )
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(pairs::<K, V>(value)?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        lower_pairs(self)
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(pairs::<K, V>(value)?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        lower_pairs(self)
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for IndexMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(pairs::<K, V>(value)?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for IndexMap<K, V> {
    fn into_value(self) -> Value {
        lower_pairs(self)
    }
}

impl FromValue for FileHandle {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::File(file) => Ok(file.handle()),
            other => Err(ValueError::mismatch("file", &other)),
        }
    }
}

impl IntoValue for FileHandle {
    fn into_value(self) -> Value {
        Value::File(SharedFile::new(self))
    }
}

impl FromValue for TextFile {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        FileHandle::from_value(value).map(TextFile::from)
    }
}

impl IntoValue for TextFile {
    fn into_value(self) -> Value {
        self.into_inner().into_value()
    }
}

impl FromValue for BinaryFile {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        FileHandle::from_value(value).map(BinaryFile::from)
    }
}

impl IntoValue for BinaryFile {
    fn into_value(self) -> Value {
        self.into_inner().into_value()
    }
}
