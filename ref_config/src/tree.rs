//! Shape helpers for configuration trees.

use serde_json::Value;

/// Reserved key marking a mapping as a reference node.
pub const REF_KEY: &str = "$ref";

/// Returns `true` when `value` is terminal (string, number, boolean or null).
///
/// Mappings and sequences are composite and return `false`.
///
/// # Examples
///
/// ```
/// use ref_config::is_scalar;
/// use serde_json::json;
///
/// assert!(is_scalar(&json!("text")));
/// assert!(is_scalar(&json!(null)));
/// assert!(!is_scalar(&json!({"a": 1})));
/// assert!(!is_scalar(&json!([1, 2])));
/// ```
#[must_use]
pub const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Human-readable name of the value's type, used in diagnostics.
pub(crate) const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("text"), true)]
    #[case(json!(42), true)]
    #[case(json!(1.5), true)]
    #[case(json!(false), true)]
    #[case(json!(null), true)]
    #[case(json!([]), false)]
    #[case(json!({}), false)]
    fn classifies_nodes(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_scalar(&value), expected);
    }

    #[rstest]
    #[case(json!(1), "number")]
    #[case(json!([1]), "array")]
    #[case(json!({"a": 1}), "object")]
    fn names_value_kinds(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(kind_name(&value), expected);
    }
}
