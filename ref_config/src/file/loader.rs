//! Reading documents from disk.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde_json::Value;

use crate::RefResult;

use std::path::Path;

use super::error::{file_error, invalid_input};
use super::parser::{DocumentFormat, parse_document};

/// Read and parse the document at `path`, selecting the parser from the
/// file extension.
///
/// Every call reads the file afresh; nothing is cached between calls.
///
/// # Examples
///
/// ```rust,no_run
/// use ref_config::read_document;
/// use std::path::Path;
///
/// # fn run() -> ref_config::RefResult<()> {
/// let tree = read_document(Path::new("config/app.yaml"))?;
/// assert!(tree.is_object());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`crate::RefConfigError::File`] when the file is missing or
/// unreadable and [`crate::RefConfigError::Parse`] when its contents are
/// malformed.
pub fn read_document(path: &Path) -> RefResult<Value> {
    read_document_as(path, DocumentFormat::from_path(path))
}

/// Read the document at `path` and parse it as `format` regardless of its
/// extension.
///
/// # Errors
///
/// See [`read_document`].
pub fn read_document_as(path: &Path, format: DocumentFormat) -> RefResult<Value> {
    let data = read_text(path)?;
    tracing::debug!(path = %path.display(), %format, "read configuration document");
    parse_document(path, format, &data)
}

/// Read `path` through a `cap-std` handle on its containing directory.
fn read_text(path: &Path) -> RefResult<String> {
    let utf8 = Utf8Path::from_path(path)
        .ok_or_else(|| invalid_input(path, "document path is not valid UTF-8"))?;
    let name = utf8
        .file_name()
        .ok_or_else(|| invalid_input(path, "document path has no file name"))?;
    let dir = match utf8.parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            Dir::open_ambient_dir(parent, ambient_authority())
        }
        _ => Dir::open_ambient_dir(".", ambient_authority()),
    }
    .map_err(|e| file_error(path, e))?;
    dir.read_to_string(name).map_err(|e| file_error(path, e))
}
