//! The CloudFormation operation boundary.
//!
//! One trait covers the five remote calls the tool makes, so tests can
//! substitute a scripted implementation for the real client.

use crate::params::Parameter;
use anyhow::Result;
use async_trait::async_trait;

/// Inputs for a create or update dispatch.
#[derive(Debug, Clone)]
pub struct StackLaunch {
    /// Derived stack name, `{prefix}-cf-{stackType}`
    pub name: String,
    /// Full template document, read from the stack's template file
    pub template_body: String,
    /// Shared parameters followed by the stack-specific ones
    pub parameters: Vec<Parameter>,
    /// Value of the `project` tag attached to the stack
    pub project_tag: String,
}

/// One stack event, reduced to the fields the failure dump prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEventRecord {
    pub resource_status: String,
    pub resource_status_reason: Option<String>,
}

/// Remote stack operations, scoped to one region and credential profile.
///
/// Create and update return the stack id from the response when present;
/// delete responses never carry one, which is what makes the caller skip
/// progress polling after a delete.
#[async_trait]
pub trait StackApi: Send + Sync {
    async fn create_stack(&self, launch: &StackLaunch) -> Result<Option<String>>;

    async fn update_stack(&self, launch: &StackLaunch) -> Result<Option<String>>;

    async fn delete_stack(&self, name: &str) -> Result<Option<String>>;

    /// Current status string of the stack, if the API reports one for it.
    async fn stack_status(&self, stack_id: &str) -> Result<Option<String>>;

    /// All recorded events for the stack, most recent first.
    async fn stack_events(&self, stack_id: &str) -> Result<Vec<StackEventRecord>>;
}
