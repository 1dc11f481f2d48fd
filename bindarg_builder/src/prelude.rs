//! Traits which, typically, may be imported without concern: `use bindarg::prelude::*`.

pub use crate::api::{Describe, Record, RecordSet};
pub use crate::value::{FromValue, IntoValue};
