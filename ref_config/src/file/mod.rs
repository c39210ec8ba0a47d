//! Reading YAML and JSON documents and resolving filesystem paths.

mod error;
mod loader;
mod parser;
mod path;

pub(crate) use error::file_error;
pub use loader::{read_document, read_document_as};
pub use parser::{DocumentFormat, parse_document, parse_json_str, parse_yaml_str};
pub use path::{canonicalise, expand_relative, is_relative_specifier, join_lexical};
pub(crate) use path::{normalise_cycle_key, parent_dir};

#[cfg(test)]
mod tests;
