//! Positions inside loaded documents.

use std::fmt;
use std::sync::Arc;

/// A document name and an RFC 6901 JSON pointer into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    document: Arc<str>,
    pointer: String,
}

impl Location {
    pub(crate) fn root(document: impl Into<Arc<str>>) -> Self {
        Self {
            document: document.into(),
            pointer: String::new(),
        }
    }

    pub(crate) fn child(&self, key: &str) -> Self {
        let escaped = key.replace('~', "~0").replace('/', "~1");
        self.extend(&escaped)
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        self.extend(&index.to_string())
    }

    fn extend(&self, token: &str) -> Self {
        Self {
            document: Arc::clone(&self.document),
            pointer: format!("{}/{token}", self.pointer),
        }
    }

    /// Key identifying this position on the reference stack.
    pub(crate) fn cycle_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.pointer)
    }
}
