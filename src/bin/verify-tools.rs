//! Tool-registration smoke test for the packaged MCP server.
//!
//! Loads the registry manifest the server exports and reports, per expected
//! tool name, whether it is registered. Exits non-zero only when the
//! registry cannot be loaded or inspected.

use std::path::PathBuf;

use clap::Parser;

use shipwright::output;
use shipwright::registry::{self, ManifestSource, ToolCheckReport};
use shipwright::{config, paths};

#[derive(Parser)]
#[command(name = "verify-tools")]
#[command(version)]
#[command(about = "Check that the MCP server registers the expected tools")]
struct Args {
    /// Registry manifest (defaults to the configured `registry.manifest`)
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/shipwright.json when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn run(args: Args) -> shipwright::Result<(ToolCheckReport, i32)> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| {
            shipwright::Error::internal_io(e.to_string(), Some("resolve current dir".to_string()))
        })?,
    };
    let config = config::load(&root, args.config.as_deref())?;

    let manifest = args
        .manifest
        .unwrap_or_else(|| paths::resolve(&root, &config.registry.manifest));
    let source = ManifestSource::new(manifest);

    let report = registry::verify(
        &source,
        &config.registry.expected_tools,
        &config.registry.install_hint,
    )?;
    Ok((report, 0))
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(run(args));
    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
    }

    std::process::ExitCode::from(output::exit_code_to_u8(exit_code))
}
