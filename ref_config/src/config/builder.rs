//! Step-by-step construction of a [`ResolvedConfig`].

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::env::EnvProvider;
use crate::file::{DocumentFormat, file_error, parse_json_str, parse_yaml_str};
use crate::merge::MergeStrategy;
use crate::module::ModuleResolver;
use crate::resolve::{ResolveOptions, Resolver};
use crate::RefResult;

use super::ResolvedConfig;

/// Configures and runs a resolution pass.
///
/// Starts from [`ResolveOptions::from_env`], so module roots listed in
/// `REF_CONFIG_PATH` are searched unless [`modules`](Self::modules) replaces
/// the lookup.
///
/// # Examples
///
/// ```
/// use ref_config::{MergeStrategy, NoModules, ResolvedConfig};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let env = HashMap::from([("DB_HOST".to_owned(), "db.internal".to_owned())]);
/// let config = ResolvedConfig::builder()
///     .env(env)
///     .modules(NoModules)
///     .merge_strategy(MergeStrategy::Deep)
///     .base_dir("/srv/app")
///     .from_yaml_str("db:\n  host: $env.DB_HOST\n  dump: ./dump.sql\n")?;
/// assert_eq!(config["db"], json!({"host": "db.internal", "dump": "/srv/app/dump.sql"}));
/// # Ok::<(), std::sync::Arc<ref_config::RefConfigError>>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct ResolvedConfigBuilder {
    options: ResolveOptions,
    base_dir: Option<PathBuf>,
}

impl Default for ResolvedConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[expect(
    clippy::wrong_self_convention,
    reason = "terminal calls mirror the ResolvedConfig constructors"
)]
impl ResolvedConfigBuilder {
    /// Create a builder with options read from the environment.
    pub fn new() -> Self {
        Self {
            options: ResolveOptions::from_env(),
            base_dir: None,
        }
    }

    /// Replace all resolution options at once.
    pub fn options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Source `$env.` values from `env` instead of the process environment.
    pub fn env(mut self, env: impl EnvProvider + 'static) -> Self {
        self.options = self.options.with_env(env);
        self
    }

    /// Replace the lookup used for bare reference names.
    pub fn modules(mut self, modules: impl ModuleResolver + 'static) -> Self {
        self.options = self.options.with_modules(modules);
        self
    }

    /// Choose how sibling keys merge over referenced mappings.
    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.options = self.options.with_merge_strategy(strategy);
        self
    }

    /// Enable or disable reference cycle detection.
    pub fn detect_cycles(mut self, enabled: bool) -> Self {
        self.options = self.options.with_cycle_detection(enabled);
        self
    }

    /// Limit how deeply references may nest.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_depth(depth);
        self
    }

    /// Directory that in-memory properties and text documents resolve
    /// against. Defaults to the current working directory. Documents loaded
    /// from files always resolve against their own directory.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolver(&self) -> Resolver {
        Resolver::new(self.options.clone())
    }

    fn base(&self) -> RefResult<PathBuf> {
        self.base_dir.clone().map_or_else(
            || std::env::current_dir().map_err(|e| file_error(Path::new("."), e)),
            Ok,
        )
    }

    fn resolve_tree(self, tree: Value, document: &str) -> RefResult<ResolvedConfig> {
        let base = self.base()?;
        let resolved = self.resolver().resolve(tree, &base)?;
        ResolvedConfig::from_root(resolved, document)
    }

    fn resolve_path(
        self,
        path: &Path,
        format: Option<DocumentFormat>,
        properties: Map<String, Value>,
    ) -> RefResult<ResolvedConfig> {
        let resolved = self.resolver().resolve_document(path, format, properties)?;
        ResolvedConfig::from_root(resolved, &path.display().to_string())
    }

    /// Resolve an in-memory mapping.
    ///
    /// # Errors
    ///
    /// Returns an error when a reference cannot be followed or the working
    /// directory cannot be determined.
    pub fn from_properties(self, properties: Map<String, Value>) -> RefResult<ResolvedConfig> {
        self.resolve_tree(Value::Object(properties), "<properties>")
    }

    /// Load and resolve the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document or anything it references cannot
    /// be read, parsed or resolved, or when its root is a scalar.
    pub fn from_file(self, path: impl AsRef<Path>) -> RefResult<ResolvedConfig> {
        self.resolve_path(path.as_ref(), None, Map::new())
    }

    /// Load `path`, let `properties` replace its top-level keys, then
    /// resolve.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfigBuilder::from_file`].
    pub fn from_properties_and_file(
        self,
        properties: Map<String, Value>,
        path: impl AsRef<Path>,
    ) -> RefResult<ResolvedConfig> {
        self.resolve_path(path.as_ref(), None, properties)
    }

    /// Parse and resolve JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is malformed or a reference cannot be
    /// followed.
    pub fn from_json_str(self, text: &str) -> RefResult<ResolvedConfig> {
        let tree = parse_json_str(text)?;
        self.resolve_tree(tree, "<inline>")
    }

    /// Parse and resolve YAML text.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfigBuilder::from_json_str`].
    pub fn from_yaml_str(self, text: &str) -> RefResult<ResolvedConfig> {
        let tree = parse_yaml_str(text)?;
        self.resolve_tree(tree, "<inline>")
    }

    /// Load `path` as JSON whatever its extension.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfigBuilder::from_file`].
    pub fn from_json_file(self, path: impl AsRef<Path>) -> RefResult<ResolvedConfig> {
        self.resolve_path(path.as_ref(), Some(DocumentFormat::Json), Map::new())
    }

    /// Load `path` as YAML whatever its extension.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfigBuilder::from_file`].
    pub fn from_yaml_file(self, path: impl AsRef<Path>) -> RefResult<ResolvedConfig> {
        self.resolve_path(path.as_ref(), Some(DocumentFormat::Yaml), Map::new())
    }
}
