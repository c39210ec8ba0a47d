//! Key-override-wins merging of configuration mappings.

use serde_json::{Map, Value};

/// How overlay values combine with the values they override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Overlay values replace base values at the top level only.
    #[default]
    Shallow,
    /// Nested mappings are merged recursively; sequences and scalars in the
    /// overlay still replace the base value.
    Deep,
}

/// Merge `overlay` over `base`, returning the union of their keys.
///
/// Keys present in both take the overlay value, combined according to
/// `strategy`.
///
/// # Examples
///
/// ```
/// use ref_config::{MergeStrategy, merge_mappings};
/// use serde_json::json;
///
/// let base = json!({"db": {"host": "a", "port": 1}, "debug": false})
///     .as_object()
///     .cloned()
///     .unwrap_or_default();
/// let overlay = json!({"db": {"host": "b"}}).as_object().cloned().unwrap_or_default();
///
/// let shallow = merge_mappings(base.clone(), overlay.clone(), MergeStrategy::Shallow);
/// assert_eq!(shallow["db"], json!({"host": "b"}));
///
/// let deep = merge_mappings(base.clone(), overlay.clone(), MergeStrategy::Deep);
/// assert_eq!(deep["db"], json!({"host": "b", "port": 1}));
/// ```
#[must_use]
pub fn merge_mappings(
    mut base: Map<String, Value>,
    overlay: Map<String, Value>,
    strategy: MergeStrategy,
) -> Map<String, Value> {
    match strategy {
        MergeStrategy::Shallow => base.extend(overlay),
        MergeStrategy::Deep => deep_merge_into(&mut base, overlay),
    }
    base
}

fn deep_merge_into(target: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge_into(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
