//! aws-sdk-cloudformation implementation of the stack API.

use crate::api::{StackApi, StackEventRecord, StackLaunch};
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::types::{Capability, Parameter, Tag};
use aws_sdk_cloudformation::Client;
use tracing::info;

/// CloudFormation client handle, constructed once per invocation and
/// passed to every operation.
pub struct CfnStackApi {
    client: Client,
}

impl CfnStackApi {
    /// Connect using the configured region and credential profile.
    ///
    /// Profile "default" maps to the ambient credential chain rather than
    /// a named profile, matching the AWS CLI convention.
    pub async fn connect(region: &str, profile: &str) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_owned()));
        if profile != "default" {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        info!(region, profile, "CloudFormation client ready");
        Self {
            client: Client::new(&sdk_config),
        }
    }

    fn sdk_parameters(launch: &StackLaunch) -> Vec<Parameter> {
        launch
            .parameters
            .iter()
            .map(|p| {
                Parameter::builder()
                    .parameter_key(&p.key)
                    .parameter_value(&p.value)
                    .build()
            })
            .collect()
    }

    fn project_tag(launch: &StackLaunch) -> Result<Tag> {
        Ok(Tag::builder()
            .key("project")
            .value(&launch.project_tag)
            .build())
    }
}

#[async_trait]
impl StackApi for CfnStackApi {
    async fn create_stack(&self, launch: &StackLaunch) -> Result<Option<String>> {
        let response = self
            .client
            .create_stack()
            .stack_name(&launch.name)
            .template_body(&launch.template_body)
            .set_parameters(Some(Self::sdk_parameters(launch)))
            .capabilities(Capability::CapabilityNamedIam)
            .tags(Self::project_tag(launch)?)
            .send()
            .await
            .context("create-stack request failed")?;

        println!("{:?}", response);
        Ok(response.stack_id().map(str::to_owned))
    }

    async fn update_stack(&self, launch: &StackLaunch) -> Result<Option<String>> {
        let response = self
            .client
            .update_stack()
            .stack_name(&launch.name)
            .template_body(&launch.template_body)
            .set_parameters(Some(Self::sdk_parameters(launch)))
            .capabilities(Capability::CapabilityNamedIam)
            .tags(Self::project_tag(launch)?)
            .send()
            .await
            .context("update-stack request failed")?;

        println!("{:?}", response);
        Ok(response.stack_id().map(str::to_owned))
    }

    async fn delete_stack(&self, name: &str) -> Result<Option<String>> {
        let response = self
            .client
            .delete_stack()
            .stack_name(name)
            .send()
            .await
            .context("delete-stack request failed")?;

        println!("{:?}", response);
        Ok(None)
    }

    async fn stack_status(&self, stack_id: &str) -> Result<Option<String>> {
        let response = self
            .client
            .describe_stacks()
            .stack_name(stack_id)
            .send()
            .await
            .context("describe-stacks request failed")?;

        Ok(response
            .stacks()
            .iter()
            .find(|stack| stack.stack_id() == Some(stack_id))
            .map(|stack| {
                stack
                    .stack_status()
                    .map(|status| status.as_str().to_owned())
                    .unwrap_or_default()
            }))
    }

    async fn stack_events(&self, stack_id: &str) -> Result<Vec<StackEventRecord>> {
        let response = self
            .client
            .describe_stack_events()
            .stack_name(stack_id)
            .send()
            .await
            .context("describe-stack-events request failed")?;

        Ok(response
            .stack_events()
            .iter()
            .map(|event| StackEventRecord {
                resource_status: event
                    .resource_status()
                    .map(|status| status.as_str().to_owned())
                    .unwrap_or_default(),
                resource_status_reason: event.resource_status_reason().map(str::to_owned),
            })
            .collect())
    }
}
