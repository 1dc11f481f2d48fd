use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::api::RecordSchema;
use crate::binding::descriptor::{DescriptorBuilder, FieldBindingDescriptor};
use crate::binding::options::options;
use crate::error::BindingError;

const RESERVED_OPTIONS: [&str; 2] = ["-h", "--help"];

/// The descriptors of every bound field, keyed by field name.
///
/// Field names are the merge key across records: a later record's field replaces an
/// earlier record's field of the same name, keeping the original position.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    descriptors: IndexMap<String, FieldBindingDescriptor>,
    owners: IndexMap<String, &'static str>,
}

impl Bindings {
    /// Build the descriptors of every field of `schemas`, in order.
    pub fn build(
        schemas: &[RecordSchema],
        builder: &DescriptorBuilder,
    ) -> Result<Self, BindingError> {
        let mut bindings = Bindings::default();

        for schema in schemas {
            for field in schema.fields() {
                let descriptor = builder.build(field)?;
                bindings.insert(schema.name(), descriptor);
            }
        }

        bindings.validate()?;
        debug!(
            records = schemas.len(),
            fields = bindings.len(),
            "built bindings"
        );
        Ok(bindings)
    }

    fn insert(&mut self, record: &'static str, descriptor: FieldBindingDescriptor) {
        let name = descriptor.name().to_string();

        if let Some(previous) = self.owners.insert(name.clone(), record) {
            warn!(
                field = %name,
                replaced = previous,
                by = record,
                "field declared by several records, the last registered wins"
            );
        }

        self.descriptors.insert(name, descriptor);
    }

    fn validate(&self) -> Result<(), BindingError> {
        let mut declared: HashMap<String, &str> = HashMap::default();

        for descriptor in self.descriptors.values() {
            for option in options(descriptor) {
                if RESERVED_OPTIONS.contains(&option.as_str()) {
                    return Err(BindingError::ReservedOption {
                        field: descriptor.name().to_string(),
                        option,
                    });
                }

                if let Some(first) = declared.insert(option.clone(), descriptor.name()) {
                    return Err(BindingError::ConflictingOption {
                        option,
                        first: first.to_string(),
                        second: descriptor.name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// The descriptor of `field`.
    pub fn get(&self, field: &str) -> Option<&FieldBindingDescriptor> {
        self.descriptors.get(field)
    }

    /// The record whose declaration of `field` won.
    pub fn owner(&self, field: &str) -> Option<&'static str> {
        self.owners.get(field).copied()
    }

    /// Every descriptor, in first-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldBindingDescriptor> {
        self.descriptors.values()
    }

    /// The number of bound fields.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no field is bound.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
