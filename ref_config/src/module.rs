//! Module-style lookup of bare reference names.
//!
//! A `$ref` such as `"shared/database"` is neither absolute nor written
//! relative to its document. Before falling back to joining it onto the
//! document's directory, the resolver asks a [`ModuleResolver`] whether the
//! name identifies a shared configuration module.

use std::path::{Component, Path, PathBuf};

use crate::file::{is_relative_specifier, join_lexical};

/// Environment variable listing extra module search roots, separated like
/// `PATH`.
pub const MODULE_PATH_ENV: &str = "REF_CONFIG_PATH";

/// Directory name searched for modules in every ancestor of the base
/// directory.
pub const MODULES_DIR: &str = "config_modules";

const MODULE_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Locates shared configuration modules by name.
pub trait ModuleResolver: Send + Sync {
    /// Resolve `specifier` to an existing file, searching relative to
    /// `base` where the lookup strategy depends on it.
    ///
    /// Returns `None` when no module of that name exists.
    fn resolve_module(&self, specifier: &str, base: &Path) -> Option<PathBuf>;
}

/// Disables module lookup; every bare name is joined onto the base
/// directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModules;

impl ModuleResolver for NoModules {
    fn resolve_module(&self, _specifier: &str, _base: &Path) -> Option<PathBuf> {
        None
    }
}

/// Searches configured roots, then `config_modules` directories above the
/// base directory.
///
/// For each root the candidates are tried in order: the name itself, the
/// name with a `.yaml`, `.yml` or `.json` extension, then an `index` document
/// inside a directory of that name. The first regular file wins.
#[derive(Debug, Clone)]
pub struct SearchPathModules {
    roots: Vec<PathBuf>,
    search_ancestors: bool,
}

impl Default for SearchPathModules {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPathModules {
    /// Create a resolver with no explicit roots that searches ancestor
    /// `config_modules` directories.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roots: Vec::new(),
            search_ancestors: true,
        }
    }

    /// Create a resolver seeded with the roots listed in `REF_CONFIG_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let roots = std::env::var_os(MODULE_PATH_ENV)
            .map(|paths| {
                std::env::split_paths(&paths)
                    .filter(|root| !root.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            roots,
            search_ancestors: true,
        }
    }

    /// Append an explicit search root. Roots are searched in insertion order
    /// before any ancestor directories.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Enable or disable the ancestor `config_modules` walk.
    #[must_use]
    pub const fn search_ancestors(mut self, enabled: bool) -> Self {
        self.search_ancestors = enabled;
        self
    }

    /// Explicit search roots in lookup order.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn candidate_roots(&self, base: &Path) -> Vec<PathBuf> {
        let mut roots = self.roots.clone();
        if self.search_ancestors {
            roots.extend(base.ancestors().map(|dir| dir.join(MODULES_DIR)));
        }
        roots
    }
}

/// Files that may hold the module `specifier` below `root`.
fn module_candidates(root: &Path, specifier: &str) -> Vec<PathBuf> {
    let stem = root.join(specifier);
    let mut candidates = vec![stem.clone()];
    candidates.extend(MODULE_EXTENSIONS.iter().map(|ext| {
        let mut name = stem.clone().into_os_string();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }));
    candidates.extend(
        MODULE_EXTENSIONS
            .iter()
            .map(|ext| stem.join(format!("index.{ext}"))),
    );
    candidates
}

/// Module names must stay inside their root.
fn is_module_name(specifier: &str) -> bool {
    !specifier.is_empty()
        && Path::new(specifier)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

impl ModuleResolver for SearchPathModules {
    fn resolve_module(&self, specifier: &str, base: &Path) -> Option<PathBuf> {
        if !is_module_name(specifier) {
            return None;
        }
        self.candidate_roots(base)
            .iter()
            .flat_map(|root| module_candidates(root, specifier))
            .find(|candidate| {
                tracing::trace!(candidate = %candidate.display(), "probing module candidate");
                candidate.is_file()
            })
    }
}

/// Resolve a file reference to the path that should be loaded.
///
/// Absolute references are returned unchanged. References starting with
/// `./` or `../` are joined onto `base`. Any other name is first offered to
/// `modules`; when no module matches it is joined onto `base` as well.
///
/// # Examples
///
/// ```
/// use ref_config::{NoModules, resolve_reference_path};
/// use std::path::{Path, PathBuf};
///
/// let base = Path::new("/srv/app/config");
/// assert_eq!(
///     resolve_reference_path("../shared/db.yaml", base, &NoModules),
///     PathBuf::from("/srv/app/shared/db.yaml"),
/// );
/// assert_eq!(
///     resolve_reference_path("db.yaml", base, &NoModules),
///     PathBuf::from("/srv/app/config/db.yaml"),
/// );
/// ```
#[must_use]
pub fn resolve_reference_path(
    reference: &str,
    base: &Path,
    modules: &dyn ModuleResolver,
) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if !is_relative_specifier(reference)
        && let Some(found) = modules.resolve_module(reference, base)
    {
        tracing::debug!(reference, module = %found.display(), "resolved reference as module");
        return found;
    }
    join_lexical(base, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use std::fs;

    fn write(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    #[rstest]
    #[case("shared", true)]
    #[case("shared/db", true)]
    #[case("../escape", false)]
    #[case("./local", false)]
    #[case("", false)]
    fn module_names_stay_inside_roots(#[case] specifier: &str, #[case] expected: bool) {
        assert_eq!(is_module_name(specifier), expected);
    }

    #[test]
    fn candidates_try_extensions_then_index_documents() {
        let candidates = module_candidates(Path::new("/m"), "db");
        let expected: Vec<PathBuf> = [
            "/m/db",
            "/m/db.yaml",
            "/m/db.yml",
            "/m/db.json",
            "/m/db/index.yaml",
            "/m/db/index.yml",
            "/m/db/index.json",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn explicit_roots_resolve_modules() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let module = dir.path().join("shared").join("db.yaml");
        write(&module, "host: db")?;
        let modules = SearchPathModules::new()
            .search_ancestors(false)
            .with_root(dir.path().join("shared"));
        let found = modules.resolve_module("db", Path::new("/nowhere"));
        ensure!(found == Some(module), "unexpected module {found:?}");
        Ok(())
    }

    #[test]
    fn ancestors_are_searched_for_module_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let module = dir.path().join(MODULES_DIR).join("logging").join("index.json");
        write(&module, "{}")?;
        let base = dir.path().join("app").join("config");
        fs::create_dir_all(&base)?;
        let found = SearchPathModules::new().resolve_module("logging", &base);
        ensure!(found == Some(module), "unexpected module {found:?}");
        Ok(())
    }

    #[test]
    fn unresolved_names_fall_back_to_base_join() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let modules = SearchPathModules::new().search_ancestors(false);
        let resolved = resolve_reference_path("defaults.yaml", dir.path(), &modules);
        ensure!(
            resolved == dir.path().join("defaults.yaml"),
            "unexpected path {resolved:?}"
        );
        Ok(())
    }

    #[test]
    fn relative_references_skip_module_lookup() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write(&dir.path().join(MODULES_DIR).join("a.yaml"), "x: 1")?;
        let base = dir.path().join("cfg");
        let resolved = resolve_reference_path("./a.yaml", &base, &SearchPathModules::new());
        ensure!(resolved == base.join("a.yaml"), "unexpected path {resolved:?}");
        Ok(())
    }

    #[test]
    fn absolute_references_are_unchanged() {
        let absolute = if cfg!(windows) { "C:\\cfg\\a.yaml" } else { "/cfg/a.yaml" };
        let resolved = resolve_reference_path(absolute, Path::new("/elsewhere"), &NoModules);
        assert_eq!(resolved, PathBuf::from(absolute));
    }
}
