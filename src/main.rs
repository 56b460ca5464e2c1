use std::path::PathBuf;

use clap::Parser;

use shipwright::output;
use shipwright::release::{Pipeline, StageOutput};
use shipwright::utils::command::SystemRunner;
use shipwright::{config, Stage};

mod tty;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "shipwright")]
#[command(version = VERSION)]
#[command(about = "Build, check, test-install and publish a Python package")]
struct Cli {
    /// Action to perform
    #[arg(value_enum)]
    action: Stage,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/shipwright.json when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> shipwright::Result<(StageOutput, i32)> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| {
            shipwright::Error::internal_io(e.to_string(), Some("resolve current dir".to_string()))
        })?,
    };
    let config = config::load(&root, cli.config.as_deref())?;

    let runner = SystemRunner;
    let mut confirmation = tty::TtyConfirmation;
    let mut pipeline = Pipeline::new(root, &config, &runner, &mut confirmation);

    let output = pipeline.run(cli.action)?;
    let exit_code = output.exit_code();
    Ok((output, exit_code))
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(run(cli));
    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
    }

    std::process::ExitCode::from(output::exit_code_to_u8(exit_code))
}
