use std::ffi::OsStr;

use clap::builder::{PossibleValue, StringValueParser, TypedValueParser};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use terminal_size::{terminal_size, Width};

use crate::api::ParserMeta;
use crate::binding::{options, Arity, Bindings, FieldBindingDescriptor, FieldDefault, Namespace};
use crate::error::ParseError;
use crate::value::Value;

// Hands the raw token to the binding layer; choices are only advertised.
#[derive(Clone)]
struct RawValueParser {
    choices: Vec<String>,
}

impl TypedValueParser for RawValueParser {
    type Value = String;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        StringValueParser::new().parse_ref(cmd, arg, value)
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        if self.choices.is_empty() {
            None
        } else {
            Some(Box::new(
                self.choices
                    .iter()
                    .map(|choice| PossibleValue::new(choice.clone())),
            ))
        }
    }
}

fn argument(descriptor: &FieldBindingDescriptor) -> Arg {
    let mut arg = Arg::new(descriptor.name().to_string())
        .help(descriptor.help_text())
        .required(false);
    let mut has_short = false;
    let mut has_long = false;

    for spelling in options(descriptor) {
        if let Some(long) = spelling.strip_prefix("--") {
            arg = if has_long {
                arg.visible_alias(long.to_string())
            } else {
                has_long = true;
                arg.long(long.to_string())
            };
        } else if let Some(short) = spelling.strip_prefix('-').and_then(|s| s.chars().next()) {
            arg = if has_short {
                arg.visible_short_alias(short)
            } else {
                has_short = true;
                arg.short(short)
            };
        }
    }

    let value_parser = RawValueParser {
        choices: descriptor.choices().map(<[String]>::to_vec).unwrap_or_default(),
    };
    let value_name = descriptor.name().to_ascii_uppercase();

    match descriptor.arity() {
        Arity::Switch => arg.action(ArgAction::SetTrue),
        Arity::Single => arg
            .action(ArgAction::Set)
            .num_args(1)
            .allow_negative_numbers(true)
            .value_name(value_name)
            .value_parser(value_parser),
        Arity::Variadic => arg
            .action(ArgAction::Append)
            .num_args(0..)
            .allow_negative_numbers(true)
            .value_name(value_name)
            .value_parser(value_parser),
    }
}

/// Declare every binding as a clap argument.
pub(crate) fn command(program: &str, meta: &ParserMeta, bindings: &Bindings) -> Command {
    let program = meta.prog.clone().unwrap_or_else(|| program.to_string());
    let mut command = Command::new(program).no_binary_name(true);

    if let Some(about) = &meta.about {
        command = command.about(about.clone());
    }

    if let Some(epilog) = &meta.epilog {
        command = command.after_help(epilog.clone());
    }

    if let Some(usage) = &meta.usage {
        command = command.override_usage(usage.clone());
    }

    if let Some((Width(width), _)) = terminal_size() {
        command = command.term_width(width as usize);
    }

    bindings
        .iter()
        .fold(command, |command, descriptor| command.arg(argument(descriptor)))
}

fn coerce(descriptor: &FieldBindingDescriptor, raw: &str) -> Result<Value, ParseError> {
    match descriptor.coercion() {
        Some(coercion) => coercion.coerce(raw).map_err(|source| ParseError::Coerce {
            field: descriptor.name().to_string(),
            source,
        }),
        None => Ok(Value::Text(raw.to_string())),
    }
}

fn absent(descriptor: &FieldBindingDescriptor) -> Result<Value, ParseError> {
    let missing = || ParseError::MissingRequired {
        field: descriptor.name().to_string(),
    };

    if descriptor.required() {
        return Err(missing());
    }

    match descriptor.default() {
        FieldDefault::Required => Err(missing()),
        FieldDefault::Value(Value::Text(path)) if descriptor.file() => coerce(descriptor, path),
        FieldDefault::Value(value) => Ok(value.clone()),
    }
}

/// Turn clap's matches into the namespace of coerced values.
pub(crate) fn collect(bindings: &Bindings, matches: &ArgMatches) -> Result<Namespace, ParseError> {
    let mut namespace = Namespace::new();

    for descriptor in bindings.iter() {
        let name = descriptor.name();

        let value = if matches.value_source(name) == Some(ValueSource::CommandLine) {
            match descriptor.arity() {
                Arity::Switch => Value::Bool(!descriptor.switch_default()),
                Arity::Single => {
                    let raw = matches
                        .get_one::<String>(name)
                        .map(String::as_str)
                        .unwrap_or_default();
                    coerce(descriptor, raw)?
                }
                Arity::Variadic => Value::Sequence(
                    matches
                        .get_many::<String>(name)
                        .into_iter()
                        .flatten()
                        .map(|raw| coerce(descriptor, raw))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            }
        } else {
            absent(descriptor)?
        };

        namespace.insert(name, value);
    }

    Ok(namespace)
}
