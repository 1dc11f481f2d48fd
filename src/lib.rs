//! `bindarg` binds typed record definitions to a command line interface.
//!
//! Declare your program's inputs as plain structs, and `bindarg` works out how each field is exposed on the Cli.
//! The field's type decides the shape of the option: how raw text is converted, whether it repeats, which values it accepts and what its default is.
//! Parsing then hands back the typed records, either one instance per record or a single merged result.
//! `bindarg` prioritizes the following design concerns:
//! * *Inference over configuration*:
//! The user should not describe an option the type already describes.
//! `Vec<u32>` is a repeatable integer option, `bool` is a switch, an enum is a closed set of choices.
//! * *Overrides when inference falls short*:
//! Every inferred aspect (conversion, requiredness, choices, separator, aliases, help, file handling) may be set explicitly per field.
//! * *Fail at construction, not at runtime*:
//! A field whose type cannot be bound is an error before any token is consumed.
//! * *Records compose*:
//! Several records may share one Cli, and their fields merge by name.
//!
//! Tokenizing and help rendering are delegated to [clap](https://docs.rs/clap).
//!
//! # Usage
//! This page includes a few demos on using `bindarg`.
//! More examples are outlined in [the source](https://github.com/bindarg/bindarg/tree/main/demos).
//!
//! via [derive Api](./derive/index.html):
//! ```no_run
#![doc = include_str!("../demos/summer.rs")]
//! ```
//!
//! ```console
//! $ summer --items 1,2,3
//! Sum: 6
//!
//! $ summer --items 1,blah
//! error: argument 'items': cannot convert 'blah' to integer: invalid digit found in string.
//!
//! $ summer
//! error: missing required argument 'items'.
//! ```
//!
//! # Binding Rules
//! Each field is classified by its type into exactly one *wrapper kind*:
//! ```console
//! Type                                 | Kind        | Option
//! -------------------------------------------------------------------------------------
//! String, PathBuf, integers, floats    | Basic       | --name VALUE
//! Bytes                                | Basic       | --name VALUE (utf-8 encoded)
//! bool                                 | Bool        | --with-name / --without-name
//! #[derive(Choices)] enum              | Enum        | --name {a, b, ..}
//! #[binding(literal = [..])]           | Literal     | --name {a, b, ..}
//! Vec<T>, Box<[T]>, HashSet<T>, ..     | List, ..    | --name VALUE [VALUE ...] (repeatable)
//! HashMap<K, V>, BTreeMap<K, V>, ..    | Dict        | --name JSON_OR_FILE
//! TextFile, BinaryFile, FileHandle     | File        | --name PATH
//! Option<T>                            | same as T   | same as T
//! anything else                        | Complex     | requires `parse = ..`
//! ```
//!
//! ### Option names
//! * A single character field (ex: `a`) is spelled `-a`.
//! * Any other field (ex: `long_param`) is spelled both `--long_param` and `--long-param`.
//! * A `bool` field defaulting to `false` is spelled `--with-verbose`/`--with_verbose`; supplying it sets the field `true`.
//! A `bool` field defaulting to `true` is spelled `--without-verbose`/`--without_verbose`; supplying it sets the field `false`.
//! * Aliases follow the same rules.
//!
//! ### Defaults & Requiredness
//! A field is required exactly when it has no default, unless `required` says otherwise.
//! Textual defaults (`default_str`) are converted like Cli input, so defaults and parsed values share one representation.
//! File fields open their textual default only when the option is absent; `-` names the standard input (or output).
//!
//! ### Collections
//! Without a separator, the option consumes every following value and may be repeated: `--ids 1 2 --ids 3`.
//! With a separator (`sep = ","`), the option takes one value that is split: `--ids 1,2,3`.
//! Either way the values are collected into the field's container, in order.
//!
//! ### Merging records
//! Several records may share one parser.
//! Fields merge by name: when two records declare the same field, the record added last defines its option (a warning is logged).
//! The result is either one instance per record ([`BindingParser::try_parse_from`]) or one [`MergedRecord`] ([`BindingParser::try_parse_merged_from`]).
//!
//! ```no_run
#![doc = include_str!("../demos/registry.rs")]
//! ```
//!
//! # Builder Api
//! The derive macros are a thin layer over the builder Api.
//! A [`Record`] lists its fields as [`FieldSpec`]s, each pairing a name with a [`TypeDescriptor`] and optional overrides.
//! [`Bindings::build`] turns these into [`FieldBindingDescriptor`]s, which drive both the clap options and the reconstruction of typed values.
//!
//! # Logging
//! `bindarg` logs through [tracing](https://docs.rs/tracing).
//! Advisory warnings (an explicit coercion shadowing an inferred one, a complex field without a coercion or help text, a field declared by several records) are emitted at `warn` level.
//! Classification, option synthesis and registry drains are emitted at `debug` level.
pub mod derive;
pub use bindarg_builder::*;
pub use derive::{Choices, Record};
