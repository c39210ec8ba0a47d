//! CLI entrypoint for `ref-config`.
//!
//! Loads a YAML or JSON document, resolves its `$ref` and `$env.`
//! constructs and prints the result to stdout.

mod cli;
mod error;
mod logging;
mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use ref_config::{ResolvedConfig, SearchPathModules, serde_json::Map};

use crate::cli::Args;
use crate::error::CliError;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "resolution failed");
            let _ignored = writeln!(std::io::stderr(), "ref-config: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let modules = args
        .module_paths
        .iter()
        .fold(SearchPathModules::from_env(), |modules, root| {
            modules.with_root(root.as_std_path())
        });
    let properties: Map<String, _> = args.properties.into_iter().collect();
    tracing::info!(file = %args.file, overrides = properties.len(), "resolving document");

    let config = ResolvedConfig::builder()
        .modules(modules)
        .detect_cycles(!args.is_cycle_check_disabled)
        .from_properties_and_file(properties, args.file.as_std_path())?;

    let selected = output::select(config, args.key.as_deref())?;
    let text = output::render(&selected, args.format)?;
    output::write_to(std::io::stdout().lock(), &text)
}
