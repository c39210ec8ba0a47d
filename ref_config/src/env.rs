//! `$env.` placeholder substitution.
//!
//! Environment lookups go through [`EnvProvider`] so resolution can run
//! against a fixed map in tests instead of the process environment.

use serde_json::{Map, Value};

use crate::tree::is_scalar;

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Prefix marking a string value as an environment-variable placeholder.
pub const ENV_PREFIX: &str = "$env.";

/// Source of environment variable values.
pub trait EnvProvider: Send + Sync {
    /// Value of the variable `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment.
///
/// Variables whose value is not valid Unicode are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S> EnvProvider for HashMap<String, String, S>
where
    S: BuildHasher + Send + Sync,
{
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvProvider for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Substitute a single value. `None` means the placeholder named an unset
/// variable and the value is absent.
fn expand_scalar<E>(value: Value, env: &E) -> Option<Value>
where
    E: EnvProvider + ?Sized,
{
    let Value::String(text) = &value else {
        return Some(value);
    };
    let Some(name) = text.strip_prefix(ENV_PREFIX) else {
        return Some(value);
    };
    let found = env.var(name);
    if found.is_none() {
        tracing::debug!(variable = name, "environment variable is unset");
    }
    found.map(Value::String)
}

/// Substitute placeholders among the direct entries of `map`. Entries naming
/// unset variables are removed.
pub(crate) fn expand_entries<E>(map: Map<String, Value>, env: &E) -> Map<String, Value>
where
    E: EnvProvider + ?Sized,
{
    map.into_iter()
        .filter_map(|(key, value)| expand_scalar(value, env).map(|v| (key, v)))
        .collect()
}

/// Substitute placeholders among the direct items of a sequence. Items naming
/// unset variables become `null` so positions are preserved.
pub(crate) fn expand_items<E>(items: Vec<Value>, env: &E) -> Vec<Value>
where
    E: EnvProvider + ?Sized,
{
    items
        .into_iter()
        .map(|item| expand_scalar(item, env).unwrap_or(Value::Null))
        .collect()
}

/// Recursively replace every `$env.NAME` string in `value`.
///
/// Unset variables never fail: a mapping entry is dropped, a sequence item
/// becomes `null` and a placeholder at the root becomes `null`. Substituted
/// values are not scanned again.
///
/// # Examples
///
/// ```
/// use ref_config::expand_env_vars;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let env = HashMap::from([("HOST".to_owned(), "db.internal".to_owned())]);
/// let tree = json!({"host": "$env.HOST", "user": "$env.DB_USER", "port": 5432});
/// assert_eq!(
///     expand_env_vars(tree, &env),
///     json!({"host": "db.internal", "port": 5432}),
/// );
/// ```
pub fn expand_env_vars<E>(value: Value, env: &E) -> Value
where
    E: EnvProvider + ?Sized,
{
    match value {
        Value::Object(map) => Value::Object(
            expand_entries(map, env)
                .into_iter()
                .map(|(key, child)| (key, expand_nested(child, env)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            expand_items(items, env)
                .into_iter()
                .map(|child| expand_nested(child, env))
                .collect(),
        ),
        scalar => expand_scalar(scalar, env).unwrap_or(Value::Null),
    }
}

/// Descend into composites whose direct entries were already substituted.
fn expand_nested<E>(value: Value, env: &E) -> Value
where
    E: EnvProvider + ?Sized,
{
    if is_scalar(&value) {
        value
    } else {
        expand_env_vars(value, env)
    }
}
