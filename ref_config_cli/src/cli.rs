//! Command-line interface definitions for `ref-config`.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::Value;

/// Serialisation used when printing the resolved configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Parsed arguments for `ref-config`.
#[derive(Debug, Parser)]
#[command(name = "ref-config")]
#[command(about = "Resolve $ref and $env. references in a YAML or JSON document")]
#[command(version)]
pub struct Args {
    /// Document to load.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Top-level property overriding the document (repeatable). VALUE is
    /// parsed as JSON and falls back to a plain string.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, Value)>,
    /// Extra directory searched for bare reference names (repeatable).
    #[arg(long = "module-path", value_name = "DIR")]
    pub module_paths: Vec<Utf8PathBuf>,
    /// Do not detect reference cycles.
    #[arg(long = "no-cycle-check")]
    pub is_cycle_check_disabled: bool,
    /// Print only the value at this dotted path.
    #[arg(long, value_name = "PATH")]
    pub key: Option<String>,
    /// Raise log verbosity (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Split `KEY=VALUE`, reading VALUE as JSON where possible.
pub fn parse_property(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("property key is empty in '{raw}'"));
    }
    let parsed =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), parsed))
}
