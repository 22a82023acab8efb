use anyhow::{Context, Result};
use clap::Parser;
use stackform::{Outcome, RunArgs};
use std::path::PathBuf;
use std::process::ExitCode;

/// CloudFormation stack deployment driver
#[derive(Parser)]
#[command(name = "stackform")]
#[command(version)]
#[command(about = "Deploy CloudFormation stacks from a YAML configuration", long_about = None)]
struct Cli {
    /// Stack operation: create, update, or delete
    operation: String,

    /// Target stack: common, cognito, batch, cache, or author
    stack: String,

    /// YAML configuration file path
    config: PathBuf,

    /// Directory holding the stack templates (defaults to the executable's directory)
    #[arg(long, value_name = "DIR")]
    template_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    stackform::init_tracing(cli.log_level.as_deref());

    match run(cli) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::RolledBack) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    // One operation per invocation; a current-thread runtime is enough
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(stackform::run(RunArgs {
            operation: cli.operation,
            stack: cli.stack,
            config_path: cli.config,
            template_dir: cli.template_dir,
        }))
}
