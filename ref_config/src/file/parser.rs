//! Format detection and parsing of YAML and JSON documents.

use crate::RefResult;

use serde_json::Value;
use serde_saphyr::Options;

use std::fmt;
use std::path::Path;

use super::error::parse_error;

/// Label used in diagnostics for documents parsed from in-memory text.
const INLINE_SOURCE: &str = "<inline>";

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// JSON, the fallback for every extension other than `yaml`/`yml`.
    Json,
    /// YAML 1.2, parsed with strict boolean semantics.
    Yaml,
}

impl DocumentFormat {
    /// Select the format for `path` from its extension.
    ///
    /// `.yaml` and `.yml` (in any letter case) select YAML; anything else,
    /// including no extension at all, selects JSON. File contents are never
    /// inspected.
    ///
    /// # Examples
    ///
    /// ```
    /// use ref_config::DocumentFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), DocumentFormat::Yaml);
    /// assert_eq!(DocumentFormat::from_path(Path::new("a.conf")), DocumentFormat::Json);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Short uppercase name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `data` as `format`, attributing failures to `path`.
///
/// # Errors
///
/// Returns a [`crate::RefConfigError::Parse`] carrying the parser message
/// when `data` is malformed.
pub fn parse_document(path: &Path, format: DocumentFormat, data: &str) -> RefResult<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(data).map_err(|e| parse_error(path, format, e))
        }
        DocumentFormat::Yaml => {
            if data.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_saphyr::from_str_with_options(
                data,
                Options {
                    strict_booleans: true,
                    ..Options::default()
                },
            )
            .map_err(|e| parse_error(path, format, e.to_string()))
        }
    }
}

/// Parse JSON text into a configuration tree.
///
/// # Errors
///
/// Returns a [`crate::RefConfigError::Parse`] when the text is not valid
/// JSON.
pub fn parse_json_str(text: &str) -> RefResult<Value> {
    parse_document(Path::new(INLINE_SOURCE), DocumentFormat::Json, text)
}

/// Parse YAML text into a configuration tree.
///
/// Empty input yields `null`.
///
/// # Errors
///
/// Returns a [`crate::RefConfigError::Parse`] when the text is not valid
/// YAML.
pub fn parse_yaml_str(text: &str) -> RefResult<Value> {
    parse_document(Path::new(INLINE_SOURCE), DocumentFormat::Yaml, text)
}
