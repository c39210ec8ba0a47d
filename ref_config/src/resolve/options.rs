//! Settings controlling a resolution pass.

use std::fmt;
use std::sync::Arc;

use crate::env::{EnvProvider, ProcessEnv};
use crate::merge::MergeStrategy;
use crate::module::{ModuleResolver, SearchPathModules};

/// Default limit on nested references.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for [`crate::Resolver`].
///
/// The default reads the process environment, searches ancestor
/// `config_modules` directories for bare reference names, merges sibling
/// overrides shallowly and fails fast on reference cycles.
///
/// # Examples
///
/// ```
/// use ref_config::{MergeStrategy, ResolveOptions};
/// use std::collections::HashMap;
///
/// let env = HashMap::from([("PORT".to_owned(), "8080".to_owned())]);
/// let options = ResolveOptions::default()
///     .with_env(env)
///     .with_merge_strategy(MergeStrategy::Deep)
///     .with_max_depth(16);
/// assert_eq!(options.max_depth(), 16);
/// assert!(options.detect_cycles());
/// ```
#[derive(Clone)]
pub struct ResolveOptions {
    env: Arc<dyn EnvProvider>,
    modules: Arc<dyn ModuleResolver>,
    merge_strategy: MergeStrategy,
    detect_cycles: bool,
    max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            env: Arc::new(ProcessEnv),
            modules: Arc::new(SearchPathModules::new()),
            merge_strategy: MergeStrategy::default(),
            detect_cycles: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("merge_strategy", &self.merge_strategy)
            .field("detect_cycles", &self.detect_cycles)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl ResolveOptions {
    /// Default options with module search roots taken from
    /// `REF_CONFIG_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_modules(SearchPathModules::from_env())
    }

    /// Replace the source of `$env.` values.
    #[must_use]
    pub fn with_env(mut self, env: impl EnvProvider + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Replace the module lookup used for bare reference names.
    #[must_use]
    pub fn with_modules(mut self, modules: impl ModuleResolver + 'static) -> Self {
        self.modules = Arc::new(modules);
        self
    }

    /// Choose how sibling overrides merge over referenced mappings.
    #[must_use]
    pub const fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    /// Enable or disable cycle detection.
    ///
    /// With detection disabled a cyclic reference recurses until
    /// [`max_depth`](Self::max_depth) is reached.
    #[must_use]
    pub const fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Limit how many references may be followed inside one another.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Environment provider consulted for `$env.` placeholders.
    #[must_use]
    pub fn env(&self) -> &dyn EnvProvider {
        self.env.as_ref()
    }

    /// Module resolver consulted for bare reference names.
    #[must_use]
    pub fn modules(&self) -> &dyn ModuleResolver {
        self.modules.as_ref()
    }

    /// Strategy used to merge sibling overrides.
    #[must_use]
    pub const fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }

    /// Whether reference cycles are reported.
    #[must_use]
    pub const fn detect_cycles(&self) -> bool {
        self.detect_cycles
    }

    /// Maximum number of nested references.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}
