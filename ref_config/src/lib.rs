//! Configuration trees with `$ref` and `$env.` resolution.
//!
//! `ref_config` reads YAML or JSON documents into a [`serde_json::Value`]
//! tree and flattens three constructs embedded in the data:
//!
//! - `{"$ref": "./other.yaml"}` loads another document and merges the
//!   sibling keys over it;
//! - `{"$ref": "$defaults"}` copies the value of another key from the
//!   enclosing mapping;
//! - `"$env.NAME"` is replaced by the value of the environment variable
//!   `NAME`.
//!
//! Any string starting with `./` or `../` is rewritten to an absolute path
//! relative to the directory of the document it was written in.
//!
//! ```rust,no_run
//! use ref_config::ResolvedConfig;
//!
//! # fn run() -> ref_config::RefResult<()> {
//! let config = ResolvedConfig::from_file("config/app.yaml")?;
//! let port: u16 = config.extract_inner("server.port")?;
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

mod config;
mod env;
mod error;
pub mod file;
mod merge;
mod module;
mod resolve;
mod result_ext;
mod tree;

pub use config::{ResolvedConfig, ResolvedConfigBuilder};
pub use env::{ENV_PREFIX, EnvProvider, ProcessEnv, expand_env_vars};
pub use error::RefConfigError;
pub use file::{DocumentFormat, parse_json_str, parse_yaml_str, read_document};
pub use merge::{MergeStrategy, merge_mappings};
pub use module::{
    MODULE_PATH_ENV, MODULES_DIR, ModuleResolver, NoModules, SearchPathModules,
    resolve_reference_path,
};
pub use resolve::{DEFAULT_MAX_DEPTH, ResolveOptions, Resolver, resolve_references};
pub use result_ext::RefResultExt;
pub use tree::{REF_KEY, is_scalar};

/// Re-export of the value type used for configuration trees.
pub use serde_json;

/// Result type returned by every fallible operation in this crate.
///
/// Errors are shared behind an [`Arc`] so a single failure can be reported
/// from several call sites without cloning the underlying sources.
pub type RefResult<T> = Result<T, Arc<RefConfigError>>;
