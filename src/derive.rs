//! Derive Api for `bindarg` configuration.
//!
//! ### Getting Started
//! Use the derive Api by instrumenting a record struct `S` with `#[derive(Record)]`.
//! Every named field of `S` becomes an option, inferred from the field's type.
//! Parse with a [`BindingParser`](../struct.BindingParser.html) bound to `S`.
//!
//! ```no_run
#![doc = include_str!("../demos/training.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ training -h
//! Train a model on a line-oriented corpus.
//!
//! Usage: training [OPTIONS]
//!
//! Options:
//!       --corpus <CORPUS>                The training corpus, one example per line. Optional. Default `-`.
//!   -b, --batch-size <BATCH_SIZE>        Optional. Default `32`.
//!       --split <SPLIT>                  The train/validation split. A string with multiple values, each separated by ",". Optional. Default `[0.8, 0.2]`.
//!   -o, --optimizer <OPTIMIZER>          Optional. Default `adam`. [possible values: sgd, adam, adam-w]
//!       --learning-rate <LEARNING_RATE>  Optional. Default `0.001`.
//!       --with-verbose                   Log every batch. Optional. verbose is disabled by default.
//!       --output-dir <OUTPUT_DIR>        Optional. Default `checkpoints`.
//!   -h, --help                           Print help
//!
//! The corpus is read from the standard input unless `--corpus` names a file.
//! ```
//!
//! ### Record Configuration
//! * `#[binding(name = "..")]` renames the record in messages (default: the struct name).
//!
//! Records may be generic; every type parameter must implement [`FromValue`](../trait.FromValue.html), and fields of a parameter type need an explicit `parse`.
//!
//! ### Field Configuration
//! The implicit inference follows the binding rules on the [crate root](../index.html#binding-rules).
//! Each aspect may be set explicitly via field attributes, which may be combined as necessary.
//! * `#[binding(default = EXPR)]` sets a default value, typed as the field (ex: `default = vec![1, 2]`).
//! * `#[binding(default_str = "..")]` sets a default given as Cli text, converted like Cli input.
//! * `#[binding(default)]` uses `Default::default()` as the default.
//! * `#[binding(default_with = PATH)]` calls `PATH()` for the default.
//! Only one of the default forms may be used on the same field.
//! * `#[binding(parse = PATH)]` converts the raw text with `PATH: fn(&str) -> Result<T, E>`, replacing the inferred conversion.
//! User types must be bound with [`impl_complex!`](../macro.impl_complex.html) to be returned.
//! * `#[binding(required)]` or `#[binding(required = BOOL)]` sets requiredness explicitly.
//! * `#[binding(sep = "..")]` splits a collection's single value on the separator.
//! * `#[binding(choices = ["..", ..])]` restricts the value to the conversion of one of the choices.
//! * `#[binding(alias = "..")]` adds an alternate name; repeatable.
//! * `#[binding(help = "..")]` sets the help message.
//! * `#[binding(multiple)]` forces a field to repeat.
//! * `#[binding(file)]`, `#[binding(file_mode = "w")]`, `#[binding(file_encoding = "utf-8")]` open the value as a file.
//! * `#[binding(literal = [..])]` restricts the field to a literal set of values.
//! * `#[binding(skip)]` leaves the field off the Cli; it takes `Default::default()`.
//! `skip` may not be combined with any other attribute.
//!
//! ### Choices
//! Instrument a fieldless enum with `#[derive(Choices)]` to use it as a field type.
//! Each variant is represented on the Cli by its kebab-case name (ex: `DryRun` is `dry-run`).
//! * `#[binding(value = "..")]` sets the variant's representation explicitly.
//!
//! ```ignore
//! #[derive(Choices)]
//! enum Level {
//!     Debug,
//!     // the above is represented by "debug"
//!
//!     #[binding(value = "warn")]
//!     Warning,
//!     // the above is represented by "warn"
//! }
//! ```

pub use bindarg_derive::*;
