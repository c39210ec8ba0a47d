//! Error types for `ref-config`.

use std::sync::Arc;

use ref_config::RefConfigError;
use thiserror::Error;

/// Errors surfaced by the `ref-config` command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Resolve(#[from] Arc<RefConfigError>),

    #[error("no value at '{0}'")]
    MissingKey(String),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
