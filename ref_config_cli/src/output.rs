//! Rendering of resolved configuration.

use std::io::Write;

use ref_config::ResolvedConfig;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Select the value to print: the whole configuration, or the value at
/// `key` when one is given.
pub fn select(config: ResolvedConfig, key: Option<&str>) -> Result<Value, CliError> {
    match key {
        None => Ok(config.into_value()),
        Some(path) => config
            .find(path)
            .cloned()
            .ok_or_else(|| CliError::MissingKey(path.to_owned())),
    }
}

/// Serialise `value` in `format`. The text always ends with a newline.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, CliError> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Write rendered text to `out`.
pub fn write_to(mut out: impl Write, text: &str) -> Result<(), CliError> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use serde_json::json;

    fn config() -> Result<ResolvedConfig> {
        ResolvedConfig::from_json_str(r#"{"db": {"host": "h", "ports": [1, 2]}}"#)
            .map_err(|e| anyhow!(e.to_string()))
    }

    #[rstest]
    #[case(None, json!({"db": {"host": "h", "ports": [1, 2]}}))]
    #[case(Some("db.host"), json!("h"))]
    #[case(Some("db.ports.1"), json!(2))]
    fn selects_values(#[case] key: Option<&str>, #[case] expected: Value) -> Result<()> {
        let selected = select(config()?, key)?;
        ensure!(selected == expected, "unexpected {selected}");
        Ok(())
    }

    #[test]
    fn missing_key_is_an_error() -> Result<()> {
        let err = select(config()?, Some("db.user"))
            .err()
            .ok_or_else(|| anyhow!("expected missing key"))?;
        ensure!(err.to_string() == "no value at 'db.user'", "unexpected {err}");
        Ok(())
    }

    #[rstest]
    #[case(OutputFormat::Json, "{\n  \"a\": 1\n}\n")]
    #[case(OutputFormat::Yaml, "a: 1\n")]
    fn renders_formats(#[case] format: OutputFormat, #[case] expected: &str) -> Result<()> {
        let text = render(&json!({"a": 1}), format)?;
        ensure!(text == expected, "unexpected {text:?}");
        Ok(())
    }

    #[test]
    fn writes_rendered_text() -> Result<()> {
        let mut buffer = Vec::new();
        write_to(&mut buffer, "a: 1\n")?;
        ensure!(buffer == b"a: 1\n", "unexpected output");
        Ok(())
    }
}
