mod describe;
mod field;
mod meta;
mod record;

pub use describe::Describe;
pub use field::{DefaultSpec, FieldOverrides, FieldSpec};
pub use meta::ParserMeta;
pub use record::{FieldValues, Record, RecordSchema, RecordSet, SplitRecords};
