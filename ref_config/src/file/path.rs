//! Path helpers for reference resolution.

use crate::RefResult;

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use super::error::file_error;

/// Canonicalise `p` using platform-specific rules.
///
/// Returns an absolute, normalised path with symlinks resolved. On Windows
/// the `dunce` crate avoids UNC prefixes in diagnostics.
///
/// # Errors
///
/// Returns a [`crate::RefConfigError::File`] if canonicalisation fails, for
/// example because the path does not exist.
pub fn canonicalise(p: &Path) -> RefResult<PathBuf> {
    #[cfg(windows)]
    {
        dunce::canonicalize(p).map_err(|e| file_error(p, e))
    }
    #[cfg(not(windows))]
    {
        std::fs::canonicalize(p).map_err(|e| file_error(p, e))
    }
}

/// Fold a canonical path into the key used for cycle detection.
///
/// Windows and macOS compare paths case-insensitively, so the key is
/// lower-cased there. Elsewhere the path is used unchanged.
pub(crate) fn normalise_cycle_key(path: &Path) -> String {
    let display = path.to_string_lossy();
    if cfg!(any(windows, target_os = "macos")) {
        display.to_lowercase()
    } else {
        display.into_owned()
    }
}

/// Directory containing `path`, or `"."` when it has no parent.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns `true` for strings written relative to their document, that is
/// starting with `./` or `../`.
#[must_use]
pub fn is_relative_specifier(value: &str) -> bool {
    value.starts_with("./") || value.starts_with("../")
}

/// Join `relative` onto `base` and normalise `.` and `..` lexically.
///
/// The filesystem is never consulted. `..` cannot climb above the root of an
/// absolute path.
///
/// # Examples
///
/// ```
/// use ref_config::file::join_lexical;
/// use std::path::{Path, PathBuf};
///
/// let joined = join_lexical(Path::new("/cfg/sub"), Path::new("../shared/./db.yaml"));
/// assert_eq!(joined, PathBuf::from("/cfg/shared/db.yaml"));
/// ```
#[must_use]
pub fn join_lexical(base: &Path, relative: &Path) -> PathBuf {
    let mut joined = PathBuf::new();
    for component in base.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match joined.components().next_back() {
                Some(Component::Normal(_)) => {
                    joined.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => joined.push(".."),
            },
            other => joined.push(other),
        }
    }
    joined
}

/// Rewrite a document-relative string into a path joined onto `base`.
///
/// Strings that do not start with `./` or `../` are returned unchanged, which
/// makes the expansion idempotent once a value is absolute.
///
/// # Examples
///
/// ```
/// use ref_config::file::expand_relative;
/// use std::path::Path;
///
/// assert_eq!(expand_relative("./data.txt", Path::new("/cfg")), "/cfg/data.txt");
/// assert_eq!(expand_relative("plain text", Path::new("/cfg")), "plain text");
/// ```
#[must_use]
pub fn expand_relative<'a>(value: &'a str, base: &Path) -> Cow<'a, str> {
    if is_relative_specifier(value) {
        Cow::Owned(
            join_lexical(base, Path::new(value))
                .to_string_lossy()
                .into_owned(),
        )
    } else {
        Cow::Borrowed(value)
    }
}
