use std::env;
use std::ffi::OsString;
use std::mem;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::api::{ParserMeta, Record, RecordSchema, RecordSet, SplitRecords};
use crate::binding::MergedRecord;
use crate::error::ParseError;
use crate::parser::BindingParser;
use crate::resource::ResourceOpener;

const DEFAULT_PROGRAM: &str = "program";

/// Accumulates record types and parser metadata across registration calls.
///
/// The registry has a two phase lifecycle: records are registered incrementally,
/// then a single parse consumes everything registered so far and returns the registry
/// to its initial state (whether or not the parse succeeds).
/// The resource opener is configuration, not registration, and survives the drain.
///
/// The registry is an ordinary value; independent registries never interact.
#[derive(Default)]
pub struct BindingRegistry {
    schemas: Vec<RecordSchema>,
    meta: ParserMeta,
    opener: Option<Arc<dyn ResourceOpener>>,
}

impl BindingRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the record type `T`.
    pub fn register<T: Record>(&mut self) -> &mut Self {
        self.register_schema(RecordSchema::of::<T>())
    }

    /// Register an already captured record schema.
    pub fn register_schema(&mut self, schema: RecordSchema) -> &mut Self {
        debug!(record = schema.name(), "registering record");
        self.schemas.push(schema);
        self
    }

    /// Set the program name displayed in usage and errors.
    pub fn prog(&mut self, prog: impl Into<String>) -> &mut Self {
        self.meta.prog = Some(prog.into());
        self
    }

    /// Set the program description.
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.meta.about = Some(description.into());
        self
    }

    /// Layer `meta` over the accumulated parser metadata.
    pub fn parser_meta(&mut self, meta: ParserMeta) -> &mut Self {
        self.meta.merge(meta);
        self
    }

    /// Open file fields through `opener`.
    pub fn opener(&mut self, opener: Arc<dyn ResourceOpener>) -> &mut Self {
        self.opener = Some(opener);
        self
    }

    /// The registered record names, in registration order.
    pub fn records(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(RecordSchema::name)
    }

    /// The accumulated parser metadata.
    pub fn meta(&self) -> &ParserMeta {
        &self.meta
    }

    /// The number of registered records.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no record is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Discard every registered record and the parser metadata.
    pub fn reset(&mut self) {
        self.schemas.clear();
        self.meta = ParserMeta::default();
    }

    /// Take the registered state as a parser, leaving the registry empty.
    pub fn drain(&mut self) -> BindingParser {
        let schemas = mem::take(&mut self.schemas);
        let meta = mem::take(&mut self.meta);
        debug!(records = schemas.len(), "draining registry");

        let mut parser = BindingParser::new(default_program()).meta(meta);

        if let Some(opener) = &self.opener {
            parser = parser.opener(opener.clone());
        }

        for schema in schemas {
            parser.add_schema(schema);
        }

        parser
    }

    /// Parse `tokens` against every registered record, merged into one composite.
    pub fn try_parse_merged_from<I, T>(&mut self, tokens: I) -> Result<MergedRecord, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.drain().try_parse_merged_from(tokens)
    }

    /// Parse `tokens` against every registered record, one value per record.
    pub fn try_parse_split_from<I, T>(&mut self, tokens: I) -> Result<SplitRecords, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.drain().try_parse_split_from(tokens)
    }

    /// Parse `tokens` into the records of `S`.
    pub fn try_parse_from<S, I, T>(&mut self, tokens: I) -> Result<S, ParseError>
    where
        S: RecordSet,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.drain().try_parse_from(tokens)
    }

    /// Parse the Cli [`env::args`] into a merged record, exiting the process on failure.
    pub fn parse_merged(&mut self) -> MergedRecord {
        self.drain().parse_merged()
    }

    /// Parse the Cli [`env::args`] into the records of `S`, exiting the process on failure.
    pub fn parse<S: RecordSet>(&mut self) -> S {
        self.drain().parse()
    }
}

fn default_program() -> String {
    env::args()
        .next()
        .and_then(|argument| {
            Path::new(&argument)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
}
