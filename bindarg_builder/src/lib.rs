//! Builder module for `bindarg`.
//! See [documentation root](https://docs.rs/bindarg/latest/bindarg/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod binding;
mod error;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod registry;
mod resource;
mod value;

pub use api::*;
pub use binding::*;
pub use error::{BindingError, CoerceError, ParseError, ValueError};
pub use model::*;
pub use parser::BindingParser;
pub use registry::BindingRegistry;
pub use resource::{
    Access, BinaryFile, FileHandle, FileMode, FsOpener, ResourceOpener, TextFile, STANDARD_STREAM,
};
pub use value::{Bytes, FromValue, IntoValue, Member, Opaque, Queue, SharedFile, Value};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
