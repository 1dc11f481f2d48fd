//! From record fields to bindings, and from parsed values back to records.
mod bindings;
mod classify;
mod coerce;
mod descriptor;
mod options;
mod reconstruct;

pub use bindings::Bindings;
pub use classify::{classify, AmbiguousUnion, Element, Shape};
pub use coerce::Coercion;
pub use descriptor::{
    build, Advisory, Arity, DescriptorBuilder, FieldBindingDescriptor, FieldDefault,
};
pub use options::{is_shortcut, options};
pub use reconstruct::{finalize, merge, reconstruct, record_values, split, MergedRecord, Namespace};
