//! Error constructors shared by document loading helpers.

use crate::RefConfigError;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::parser::DocumentFormat;

/// Construct a [`RefConfigError::File`] for a document path.
pub(crate) fn file_error(
    path: &Path,
    err: impl Into<Box<dyn Error + Send + Sync>>,
) -> Arc<RefConfigError> {
    Arc::new(RefConfigError::File {
        path: path.to_path_buf(),
        source: err.into(),
    })
}

pub(crate) fn invalid_input(path: &Path, msg: impl Into<String>) -> Arc<RefConfigError> {
    file_error(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidInput, msg.into()),
    )
}

/// Construct a [`RefConfigError::Parse`] carrying the parser's message.
pub(super) fn parse_error(
    path: &Path,
    format: DocumentFormat,
    err: impl Into<Box<dyn Error + Send + Sync>>,
) -> Arc<RefConfigError> {
    Arc::new(RefConfigError::Parse {
        path: path.to_path_buf(),
        format,
        source: err.into(),
    })
}
