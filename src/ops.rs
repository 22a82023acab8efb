//! Stack operations: name derivation, template resolution, and dispatch.

use crate::api::{StackApi, StackLaunch};
use crate::params;
use crate::progress::{self, Delay};
use anyhow::{Context, Result};
use stackform_config::DeployConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Fixed interval between stack status queries.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The three supported stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            _ => anyhow::bail!("Operation \"{}\" is not implemented", s),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// The closed set of deployable stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackType {
    Common,
    Cognito,
    Batch,
    Cache,
    Author,
}

impl FromStr for StackType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "common" => Ok(StackType::Common),
            "cognito" => Ok(StackType::Cognito),
            "batch" => Ok(StackType::Batch),
            "cache" => Ok(StackType::Cache),
            "author" => Ok(StackType::Author),
            _ => anyhow::bail!(
                "Unknown stack \"{}\". Supported: common, cognito, batch, cache, author",
                s
            ),
        }
    }
}

impl fmt::Display for StackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackType::Common => write!(f, "common"),
            StackType::Cognito => write!(f, "cognito"),
            StackType::Batch => write!(f, "batch"),
            StackType::Cache => write!(f, "cache"),
            StackType::Author => write!(f, "author"),
        }
    }
}

/// Build the prefixed CloudFormation stack name.
pub fn stack_name(prefix: &str, stack: StackType) -> String {
    format!("{}-cf-{}", prefix, stack)
}

/// Path of the static template document for a stack.
pub fn template_path(template_dir: &Path, stack: StackType) -> PathBuf {
    template_dir.join(format!("{}.yml", stack))
}

/// Final result of a dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    RolledBack,
}

/// Dispatch one operation against the stack API and follow it to
/// completion.
///
/// Polling only starts when the dispatch response carries a stack id;
/// delete responses never do, so a delete returns right after the API
/// call. A rollback observed while polling turns into `RolledBack` after
/// the failure events have been printed.
pub async fn deploy(
    api: &dyn StackApi,
    delay: &dyn Delay,
    operation: Operation,
    stack: StackType,
    config: &DeployConfig,
    template_dir: &Path,
) -> Result<Outcome> {
    let name = stack_name(&config.stack_prefix, stack);
    info!(%name, %operation, "dispatching stack operation");

    let stack_id = match operation {
        Operation::Create => {
            api.create_stack(&launch(stack, config, template_dir, &name)?)
                .await?
        }
        Operation::Update => {
            api.update_stack(&launch(stack, config, template_dir, &name)?)
                .await?
        }
        Operation::Delete => api.delete_stack(&name).await?,
    };

    let Some(stack_id) = stack_id else {
        info!("response carries no stack id; skipping progress polling");
        return Ok(Outcome::Completed);
    };

    println!("Stack {} {} accepted: {}", stack, operation, stack_id);
    println!("Waiting for stack operation to complete");

    let report = progress::watch_stack(api, delay, &stack_id, POLL_INTERVAL, None).await?;
    println!();
    println!("Stack status: {}", report.final_status);

    if report.rolled_back {
        for event in progress::failed_events(api, &stack_id).await? {
            println!("{}", event.resource_status);
            if let Some(reason) = &event.resource_status_reason {
                println!("{}", reason);
            }
        }
        return Ok(Outcome::RolledBack);
    }

    Ok(Outcome::Completed)
}

fn launch(
    stack: StackType,
    config: &DeployConfig,
    template_dir: &Path,
    name: &str,
) -> Result<StackLaunch> {
    let path = template_path(template_dir, stack);
    let template_body = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read stack template {}", path.display()))?;

    let mut parameters = params::shared_parameters(config);
    parameters.extend(params::stack_parameters(stack, config));

    Ok(StackLaunch {
        name: name.to_string(),
        template_body,
        parameters,
        project_tag: config.project_tag.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_parses_known_values() {
        assert_eq!("create".parse::<Operation>().unwrap(), Operation::Create);
        assert_eq!("update".parse::<Operation>().unwrap(), Operation::Update);
        assert_eq!("delete".parse::<Operation>().unwrap(), Operation::Delete);
    }

    #[test]
    fn operation_rejects_unknown_values() {
        let err = "rename".parse::<Operation>().unwrap_err();
        assert_eq!(err.to_string(), "Operation \"rename\" is not implemented");
    }

    #[test]
    fn stack_type_parses_known_values() {
        assert_eq!("common".parse::<StackType>().unwrap(), StackType::Common);
        assert_eq!("cognito".parse::<StackType>().unwrap(), StackType::Cognito);
        assert_eq!("batch".parse::<StackType>().unwrap(), StackType::Batch);
        assert_eq!("cache".parse::<StackType>().unwrap(), StackType::Cache);
        assert_eq!("author".parse::<StackType>().unwrap(), StackType::Author);
    }

    #[test]
    fn stack_type_rejects_unknown_values() {
        assert!("network".parse::<StackType>().is_err());
    }

    #[test]
    fn stack_name_is_prefixed() {
        assert_eq!(stack_name("demo", StackType::Cache), "demo-cf-cache");
    }

    #[test]
    fn template_path_uses_stack_name() {
        let path = template_path(Path::new("/opt/stackform"), StackType::Batch);
        assert_eq!(path, PathBuf::from("/opt/stackform/batch.yml"));
    }
}
