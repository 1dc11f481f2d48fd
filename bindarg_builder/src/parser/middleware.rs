use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use clap::Command;
use tracing::{debug, info};

use crate::api::{ParserMeta, Record, RecordSchema, RecordSet, SplitRecords};
use crate::binding::{merge, split, Bindings, DescriptorBuilder, MergedRecord, Namespace};
use crate::error::{BindingError, ParseError};
use crate::parser::engine;
use crate::parser::interface::{ConsoleInterface, UserInterface};
use crate::resource::ResourceOpener;

/// The command line parser bound to one or more records.
///
/// Records are bound in the order they are added; when several records declare the
/// same field, the last one added defines its option.
///
/// ```
/// use bindarg_builder::*;
///
/// struct Options {
///     workers: i64,
/// }
///
/// impl Record for Options {
///     fn record_name() -> &'static str {
///         "Options"
///     }
///
///     fn fields() -> Vec<FieldSpec> {
///         vec![FieldSpec::new("workers", i64::describe()).default_value(1)]
///     }
///
///     fn from_fields(fields: &mut FieldValues) -> Result<Self, ParseError> {
///         Ok(Self {
///             workers: fields.take("workers")?,
///         })
///     }
/// }
///
/// let parser = BindingParser::new("program").record::<Options>();
/// let options: Options = parser.try_parse_record_from(["--workers", "4"]).unwrap();
/// assert_eq!(options.workers, 4);
/// ```
pub struct BindingParser {
    program: String,
    meta: ParserMeta,
    schemas: Vec<RecordSchema>,
    builder: DescriptorBuilder,
    user_interface: Box<dyn UserInterface>,
}

impl BindingParser {
    /// Create a parser for `program` with no records bound.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            meta: ParserMeta::default(),
            schemas: Vec::default(),
            builder: DescriptorBuilder::default(),
            user_interface: Box::<ConsoleInterface>::default(),
        }
    }

    /// Create a parser for `program` bound to every record of `S`.
    pub fn for_records<S: RecordSet>(program: impl Into<String>) -> Self {
        let mut parser = Self::new(program);
        parser.schemas = S::schemas();
        parser
    }

    #[cfg(test)]
    pub(crate) fn user_interface(mut self, user_interface: Box<dyn UserInterface>) -> Self {
        self.user_interface = user_interface;
        self
    }

    /// Bind the fields of `T`.
    pub fn record<T: Record>(mut self) -> Self {
        self.add_record::<T>();
        self
    }

    /// Bind the fields of `T`, in place.
    pub fn add_record<T: Record>(&mut self) -> &mut Self {
        self.add_schema(RecordSchema::of::<T>())
    }

    /// Bind the fields of an already captured schema.
    pub fn add_schema(&mut self, schema: RecordSchema) -> &mut Self {
        debug!(record = schema.name(), fields = schema.fields().len(), "adding record");
        self.schemas.push(schema);
        self
    }

    /// Describe the program in the help message.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.meta.about = Some(about.into());
        self
    }

    /// Text displayed after the options in the help message.
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.meta.epilog = Some(epilog.into());
        self
    }

    /// Replace the generated usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.meta.usage = Some(usage.into());
        self
    }

    /// Layer `meta` over the current parser metadata.
    pub fn meta(mut self, meta: ParserMeta) -> Self {
        self.meta.merge(meta);
        self
    }

    /// Open file fields through `opener` rather than the file system.
    pub fn opener(mut self, opener: Arc<dyn ResourceOpener>) -> Self {
        self.builder = self.builder.opener(opener);
        self
    }

    /// The schemas of the bound records, in the order they were added.
    pub fn schemas(&self) -> &[RecordSchema] {
        &self.schemas
    }

    /// Build the binding of every field.
    pub fn bindings(&self) -> Result<Bindings, BindingError> {
        Bindings::build(&self.schemas, &self.builder)
    }

    /// Build the `clap` command declaring every binding.
    pub fn command(&self) -> Result<Command, BindingError> {
        Ok(engine::command(&self.program, &self.meta, &self.bindings()?))
    }

    /// Render the help message.
    pub fn render_help(&self) -> Result<String, BindingError> {
        Ok(self.command()?.render_help().to_string())
    }

    /// Parse `tokens` (excluding the program name) into the coerced value of every field.
    pub fn try_parse_namespace_from<I, T>(
        &self,
        tokens: I,
    ) -> Result<(Bindings, Namespace), ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let bindings = self.bindings()?;
        let matches = engine::command(&self.program, &self.meta, &bindings).try_get_matches_from(tokens)?;
        let namespace = engine::collect(&bindings, &matches)?;
        info!(program = %self.program, fields = namespace.len(), "parsed command line");
        Ok((bindings, namespace))
    }

    /// Parse `tokens` into one composite of every record's fields.
    pub fn try_parse_merged_from<I, T>(&self, tokens: I) -> Result<MergedRecord, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let (bindings, mut namespace) = self.try_parse_namespace_from(tokens)?;
        merge(&self.schemas, &bindings, &mut namespace)
    }

    /// Parse `tokens` into one value per record.
    pub fn try_parse_split_from<I, T>(&self, tokens: I) -> Result<SplitRecords, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let (bindings, namespace) = self.try_parse_namespace_from(tokens)?;
        split(&self.schemas, &bindings, &namespace)
    }

    /// Parse `tokens` into the records of `S`.
    pub fn try_parse_from<S, I, T>(&self, tokens: I) -> Result<S, ParseError>
    where
        S: RecordSet,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        S::assemble(&mut self.try_parse_split_from(tokens)?)
    }

    /// Parse `tokens` into the single record `R`.
    pub fn try_parse_record_from<R, I, T>(&self, tokens: I) -> Result<R, ParseError>
    where
        R: Record,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.try_parse_split_from(tokens)?.take::<R>()
    }

    fn report<R>(&self, result: Result<R, ParseError>) -> Result<R, i32> {
        result.map_err(|error| {
            match &error {
                ParseError::Engine(engine_error) if !engine_error.use_stderr() => {
                    self.user_interface.print(engine_error.to_string());
                }
                ParseError::Engine(engine_error) => {
                    self.user_interface.print_error(engine_error.to_string());
                }
                _ => {
                    self.user_interface.print_error(format!("error: {error}"));
                }
            }

            error.exit_code()
        })
    }

    /// Run the parser against the input tokens, producing the records of `S`.
    ///
    /// The help message (`-h` or `--help`) is displayed with `Err(0)`.
    /// Any other failure is displayed with its exit code, typically `Err(1)` or `Err(2)`.
    pub fn parse_tokens<S: RecordSet>(&self, tokens: &[&str]) -> Result<S, i32> {
        self.report(self.try_parse_from(tokens.iter().copied()))
    }

    /// Run the parser against the input tokens, producing a merged record.
    ///
    /// Reports failures the same way as [`BindingParser::parse_tokens`].
    pub fn parse_tokens_merged(&self, tokens: &[&str]) -> Result<MergedRecord, i32> {
        self.report(self.try_parse_merged_from(tokens.iter().copied()))
    }

    /// Run the parser against the Cli [`env::args`], producing the records of `S`.
    ///
    /// If parsing fails or the help message is displayed, the process exits (via `std::process::exit`).
    pub fn parse<S: RecordSet>(&self) -> S {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(records) => records,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }

    /// Run the parser against the Cli [`env::args`], producing a merged record.
    ///
    /// If parsing fails or the help message is displayed, the process exits (via `std::process::exit`).
    pub fn parse_merged(&self) -> MergedRecord {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.parse_tokens_merged(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(merged) => merged,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }
}
