use indexmap::IndexMap;

use crate::api::field::FieldSpec;
use crate::error::ParseError;
use crate::value::{FromValue, Value};

/// A record type whose fields are bound to the command line.
///
/// Typically derived: `#[derive(Record)]`.
pub trait Record: Sized {
    /// The record's name, used in messages.
    fn record_name() -> &'static str;

    /// The bound fields, in declaration order.
    fn fields() -> Vec<FieldSpec>;

    /// Build an instance by taking each field out of `fields`.
    fn from_fields(fields: &mut FieldValues) -> Result<Self, ParseError>;
}

/// The type-erased shape of a record: its name and fields.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// The schema of `T`.
    pub fn of<T: Record>() -> Self {
        Self {
            name: T::record_name(),
            fields: T::fields(),
        }
    }

    /// The record's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The record's fields.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// The reconstructed values of one record, keyed by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    record: String,
    values: IndexMap<String, Value>,
}

impl FieldValues {
    /// Empty values for `record`.
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            values: IndexMap::default(),
        }
    }

    /// The record these values belong to.
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Set the value of `field`.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// The value of `field`, if present.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Take `field` out, as a `T`.
    pub fn take<T: FromValue>(&mut self, field: &str) -> Result<T, ParseError> {
        let value = self
            .values
            .shift_remove(field)
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })?;

        T::from_value(value).map_err(|source| ParseError::Value {
            field: field.to_string(),
            source,
        })
    }

    /// The field names still present.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The number of fields still present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether every field was taken.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The values of several records reconstructed independently (split mode).
#[derive(Debug, Default)]
pub struct SplitRecords {
    records: IndexMap<String, FieldValues>,
}

impl SplitRecords {
    pub(crate) fn push(&mut self, values: FieldValues) {
        self.records.insert(values.record().to_string(), values);
    }

    /// Build the instance of `T`, removing its values.
    pub fn take<T: Record>(&mut self) -> Result<T, ParseError> {
        let mut values = self
            .records
            .shift_remove(T::record_name())
            .ok_or_else(|| ParseError::RecordNotRegistered {
                record: T::record_name().to_string(),
            })?;
        T::from_fields(&mut values)
    }

    /// The names of the records still present.
    pub fn records(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// The number of records still present.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether every record was taken.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A fixed set of record types, parsed together and reconstructed one instance each.
///
/// Implemented for tuples of one to six records.
pub trait RecordSet: Sized {
    /// The schemas, in registration order.
    fn schemas() -> Vec<RecordSchema>;

    /// Build one instance per record.
    fn assemble(records: &mut SplitRecords) -> Result<Self, ParseError>;
}

macro_rules! impl_record_set {
    ($($member:ident),+) => {
        impl<$($member: Record),+> RecordSet for ($($member,)+) {
            fn schemas() -> Vec<RecordSchema> {
                vec![$(RecordSchema::of::<$member>()),+]
            }

            fn assemble(records: &mut SplitRecords) -> Result<Self, ParseError> {
                Ok(($(records.take::<$member>()?,)+))
            }
        }
    };
}

impl_record_set!(A);
impl_record_set!(A, B);
impl_record_set!(A, B, C);
impl_record_set!(A, B, C, D);
impl_record_set!(A, B, C, D, E);
impl_record_set!(A, B, C, D, E, F);
