//! Primary error enum for configuration loading flows.

use std::path::PathBuf;

use figment::Error as FigmentError;
use thiserror::Error;

use crate::file::DocumentFormat;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RefConfigError {
    /// A document could not be opened or read.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported by the filesystem.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A document contained malformed YAML or JSON.
    #[error("Failed to parse {format} in '{path}': {source}")]
    Parse {
        /// Path of the malformed document (`<inline>` for text input).
        path: PathBuf,
        /// Format the document was parsed as.
        format: DocumentFormat,
        /// Message produced by the parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A `$ref` value was not a usable reference string.
    #[error("Invalid reference at '{location}': {message}")]
    InvalidReference {
        /// Document and JSON pointer of the reference node.
        location: String,
        /// Explanation of what was wrong with the value.
        message: String,
    },

    /// A reference led back to a document or key that is still being
    /// resolved.
    #[error("cyclic reference detected: {cycle}")]
    CyclicReference {
        /// Chain of references participating in the cycle.
        cycle: String,
    },

    /// More references were nested than the configured limit allows.
    #[error("reference nesting exceeded {limit} levels at '{reference}'")]
    DepthExceeded {
        /// Configured nesting limit.
        limit: usize,
        /// Reference that would have exceeded the limit.
        reference: String,
    },

    /// The resolved document cannot be flattened into top-level keys.
    #[error("Configuration root in '{document}' must be a mapping, found {found}")]
    NotAMapping {
        /// Document whose root was rejected.
        document: String,
        /// Type of the resolved root value.
        found: &'static str,
    },

    /// Deserializing resolved values into a typed structure failed.
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<FigmentError>),
}
