// stackform - CloudFormation stack deployment driver
//
// Deploys, updates, and deletes the project's named stacks from a YAML
// configuration file and follows the operation to completion:
// load config -> map parameters -> dispatch one API call -> poll status.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub mod api;
pub mod client;
pub mod ops;
pub mod params;
pub mod progress;

pub use ops::{Operation, Outcome, StackType};

/// Invocation arguments as received from the command line.
pub struct RunArgs {
    pub operation: String,
    pub stack: String,
    pub config_path: PathBuf,
    pub template_dir: Option<PathBuf>,
}

/// Parse arguments, load configuration, and drive one stack operation.
///
/// Argument parsing and config loading both happen before the client is
/// constructed, so no remote call is made for an invalid invocation.
pub async fn run(args: RunArgs) -> Result<Outcome> {
    let operation: Operation = args.operation.parse()?;
    let stack: StackType = args.stack.parse()?;

    let config = stackform_config::DeployConfig::load(&args.config_path)?;

    let template_dir = match args.template_dir {
        Some(dir) => dir,
        None => default_template_dir()?,
    };

    let api = client::CfnStackApi::connect(&config.region, &config.profile).await;
    ops::deploy(
        &api,
        &progress::TokioDelay,
        operation,
        stack,
        &config,
        &template_dir,
    )
    .await
}

/// Templates live beside the installed binary unless overridden.
fn default_template_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to resolve executable path")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Initialize tracing with an env-filtered fmt layer on stderr.
///
/// Stdout is reserved for the progress protocol, so diagnostics go to
/// stderr. Level comes from the CLI flag when given, RUST_LOG otherwise.
pub fn init_tracing(level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // Ignore error if a subscriber is already set (idempotent)
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr)),
    );
}
