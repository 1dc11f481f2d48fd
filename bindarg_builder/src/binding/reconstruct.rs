use indexmap::IndexMap;

use crate::api::{FieldValues, Record, RecordSchema, SplitRecords};
use crate::binding::bindings::Bindings;
use crate::binding::descriptor::FieldBindingDescriptor;
use crate::error::ParseError;
use crate::value::{FromValue, Value};

/// The coerced values of one parse, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    values: IndexMap<String, Value>,
}

impl Namespace {
    /// An empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of `field`.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Remove and return the value of `field`.
    pub fn pop(&mut self, field: &str) -> Option<Value> {
        self.values.shift_remove(field)
    }

    /// The value of `field`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Whether `field` has a value.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// The number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Apply the deferred container wrapping to a parsed value.
///
/// Values coerced through a separator already carry their container and pass through.
pub fn finalize(descriptor: &FieldBindingDescriptor, value: Value) -> Value {
    match descriptor.kind().collection() {
        Some(kind) if descriptor.separator().is_none() => value.wrap(kind),
        _ => value,
    }
}

fn pop(namespace: &mut Namespace, field: &str) -> Result<Value, ParseError> {
    namespace.pop(field).ok_or_else(|| ParseError::MissingField {
        field: field.to_string(),
    })
}

/// Take the values of `schema`'s fields out of `namespace`.
pub fn record_values(
    schema: &RecordSchema,
    bindings: &Bindings,
    namespace: &mut Namespace,
) -> Result<FieldValues, ParseError> {
    let mut values = FieldValues::new(schema.name());

    for field in schema.fields() {
        let value = pop(namespace, field.name())?;
        let value = match bindings.get(field.name()) {
            Some(descriptor) => finalize(descriptor, value),
            None => value,
        };
        values.insert(field.name(), value);
    }

    Ok(values)
}

/// Build one `T`, consuming its fields from `namespace`.
pub fn reconstruct<T: Record>(bindings: &Bindings, namespace: &mut Namespace) -> Result<T, ParseError> {
    let schema = RecordSchema::of::<T>();
    T::from_fields(&mut record_values(&schema, bindings, namespace)?)
}

/// Build one composite result holding the union of every record's fields.
pub fn merge(
    schemas: &[RecordSchema],
    bindings: &Bindings,
    namespace: &mut Namespace,
) -> Result<MergedRecord, ParseError> {
    let mut values = IndexMap::default();

    for descriptor in bindings.iter() {
        let value = pop(namespace, descriptor.name())?;
        values.insert(descriptor.name().to_string(), finalize(descriptor, value));
    }

    Ok(MergedRecord {
        records: schemas.iter().map(RecordSchema::name).collect(),
        values,
    })
}

/// Build each record independently, every one reading from the same `namespace`.
///
/// A field declared by several records is filled from the same parsed value in each.
pub fn split(
    schemas: &[RecordSchema],
    bindings: &Bindings,
    namespace: &Namespace,
) -> Result<SplitRecords, ParseError> {
    let mut records = SplitRecords::default();

    for schema in schemas {
        let mut shared = namespace.clone();
        records.push(record_values(schema, bindings, &mut shared)?);
    }

    Ok(records)
}

/// The composite of several records' fields, produced in merge mode.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    records: Vec<&'static str>,
    values: IndexMap<String, Value>,
}

impl MergedRecord {
    /// The names of the merged records, in registration order.
    pub fn records(&self) -> &[&'static str] {
        &self.records
    }

    /// The field names, in first-declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The value of `field`.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// The value of `field`, as a `T`.
    pub fn get<T: FromValue>(&self, field: &str) -> Result<T, ParseError> {
        let value = self
            .values
            .get(field)
            .cloned()
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })?;

        T::from_value(value).map_err(|source| ParseError::Value {
            field: field.to_string(),
            source,
        })
    }

    /// Re-read the fields of the merged record `T`.
    pub fn extract<T: Record>(&self) -> Result<T, ParseError> {
        if !self.records.contains(&T::record_name()) {
            return Err(ParseError::RecordNotRegistered {
                record: T::record_name().to_string(),
            });
        }

        let mut values = FieldValues::new(T::record_name());

        for field in T::fields() {
            let value = self
                .values
                .get(field.name())
                .cloned()
                .ok_or_else(|| ParseError::MissingField {
                    field: field.name().to_string(),
                })?;
            values.insert(field.name(), value);
        }

        T::from_fields(&mut values)
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
