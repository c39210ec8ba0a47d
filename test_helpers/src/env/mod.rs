//! Guards for mutating process environment variables in tests.
//!
//! Every mutation takes a global re-entrant lock and returns an
//! [`EnvVarGuard`] that restores the previous value, or removes the variable
//! again, when dropped. Guards for the same key restore in LIFO order.
//! Hold [`lock`] across several mutations when a test needs them applied
//! atomically.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _token = env::set_var("REF_CONFIG_DOC_TOKEN", "secret");
//! assert_eq!(std::env::var("REF_CONFIG_DOC_TOKEN").ok().as_deref(), Some("secret"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, Result};

/// Variable listing extra module search roots for `$ref` lookups.
pub const MODULE_PATH_VAR: &str = "REF_CONFIG_PATH";

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores one environment variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        // SAFETY: ENV_MUTEX is held for the restoration.
        match self.original.take() {
            Some(value) => unsafe { env::set_var(&self.key, value) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Holds the global environment lock until dropped.
#[must_use = "dropping releases the environment lock"]
pub struct EnvLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnvLock")
    }
}

fn mutate<F>(key: String, mutation: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutation(&key);
    EnvVarGuard { key, original }
}

/// Set `key` to `value` until the returned guard is dropped.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds ENV_MUTEX while the closure runs.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Remove `key` until the returned guard is dropped.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: `mutate` holds ENV_MUTEX while the closure runs.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Point the module search path at `roots` until the guard is dropped.
///
/// # Errors
///
/// Fails when a root contains the platform path-list separator.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _path = env::set_module_path(["/opt/shared", "/srv/modules"])?;
/// assert!(std::env::var_os(env::MODULE_PATH_VAR).is_some());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn set_module_path<I, P>(roots: I) -> Result<EnvVarGuard>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let joined = env::join_paths(roots.into_iter().map(Into::into))
        .context("join module search roots")?;
    Ok(set_var(MODULE_PATH_VAR, joined))
}

/// Acquire the global environment lock for the lifetime of the guard.
pub fn lock() -> EnvLock {
    EnvLock {
        _guard: ENV_MUTEX.lock(),
    }
}
