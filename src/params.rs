//! Parameter mapping from configuration fields to stack parameters.
//!
//! Pure projections: each stack type hardcodes the configuration fields it
//! forwards, on top of three parameters shared by every stack. Field
//! presence is guaranteed by the typed config, so mapping never fails.

use crate::ops::StackType;
use stackform_config::DeployConfig;

/// A single template parameter, stringified for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parameters supplied to every stack regardless of type, in fixed order.
pub fn shared_parameters(config: &DeployConfig) -> Vec<Parameter> {
    vec![
        Parameter::new("StackPrefix", config.stack_prefix.clone()),
        Parameter::new("Stage", config.stage.to_string()),
        Parameter::new("ProjectTag", config.project_tag.clone()),
    ]
}

/// Parameters specific to the requested stack.
///
/// Cognito and author stacks take nothing beyond the shared set; that is
/// an explicit arm, not a fall-through, so an unknown stack type cannot
/// silently map to an empty parameter list.
pub fn stack_parameters(stack: StackType, config: &DeployConfig) -> Vec<Parameter> {
    match stack {
        StackType::Common => common_parameters(config),
        StackType::Batch => batch_parameters(config),
        StackType::Cache => cache_parameters(config),
        StackType::Cognito | StackType::Author => Vec::new(),
    }
}

fn common_parameters(config: &DeployConfig) -> Vec<Parameter> {
    vec![
        Parameter::new("VpcId", config.vpc_id.clone()),
        Parameter::new("DatabasePassword", config.database_password.clone()),
        Parameter::new("EnableRenderedCache", config.enable_rendered_cache.to_string()),
        Parameter::new("EnableRawCache", config.enable_raw_cache.to_string()),
        subnets_parameter(config),
    ]
}

fn batch_parameters(config: &DeployConfig) -> Vec<Parameter> {
    vec![
        Parameter::new("BatchAMI", config.batch_ami.clone()),
        Parameter::new(
            "BatchClusterEC2MinCpus",
            config.batch_cluster_ec2_min_cpus.to_string(),
        ),
        Parameter::new(
            "BatchClusterEC2MaxCpus",
            config.batch_cluster_ec2_max_cpus.to_string(),
        ),
        Parameter::new(
            "BatchClusterEC2DesiredCpus",
            config.batch_cluster_ec2_desired_cpus.to_string(),
        ),
        Parameter::new(
            "BatchClusterSpotMinCpus",
            config.batch_cluster_spot_min_cpus.to_string(),
        ),
        Parameter::new(
            "BatchClusterSpotMaxCpus",
            config.batch_cluster_spot_max_cpus.to_string(),
        ),
        Parameter::new(
            "BatchClusterSpotDesiredCpus",
            config.batch_cluster_spot_desired_cpus.to_string(),
        ),
        Parameter::new(
            "BatchClusterSpotBidPercentage",
            config.batch_cluster_spot_bid_percentage.to_string(),
        ),
        subnets_parameter(config),
    ]
}

fn cache_parameters(config: &DeployConfig) -> Vec<Parameter> {
    vec![
        Parameter::new("DefaultSecurityGroup", config.default_security_group.clone()),
        Parameter::new("CacheNodeType", config.cache_node_type.clone()),
        Parameter::new("RawCacheNodeType", config.raw_cache_node_type.clone()),
    ]
}

/// The two public subnets collapse into one comma-joined value.
fn subnets_parameter(config: &DeployConfig) -> Parameter {
    Parameter::new("SubnetsPublic", config.subnets_public.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackform_config::DeployConfig;

    fn fixture() -> DeployConfig {
        DeployConfig::from_yaml(
            r#"
Region: eu-west-1
StackPrefix: demo
Stage: dev
ProjectTag: demo-project
Profile: default
VpcId: vpc-123
DatabasePassword: secret
EnableRenderedCache: true
EnableRawCache: false
SubnetsPublic: [a, b]
BatchAMI: ami-456
BatchClusterEC2MinCpus: 0
BatchClusterEC2MaxCpus: 16
BatchClusterEC2DesiredCpus: 0
BatchClusterSpotMinCpus: 0
BatchClusterSpotMaxCpus: 64
BatchClusterSpotDesiredCpus: 0
BatchClusterSpotBidPercentage: 60
DefaultSecurityGroup: sg-789
CacheNodeType: cache.t3.micro
RawCacheNodeType: cache.t3.small
"#,
        )
        .unwrap()
    }

    fn keys(parameters: &[Parameter]) -> Vec<&str> {
        parameters.iter().map(|p| p.key.as_str()).collect()
    }

    #[test]
    fn shared_keys_in_order() {
        let shared = shared_parameters(&fixture());
        assert_eq!(keys(&shared), vec!["StackPrefix", "Stage", "ProjectTag"]);
        assert_eq!(shared[1].value, "dev");
    }

    #[test]
    fn common_stack_keys() {
        let params = stack_parameters(StackType::Common, &fixture());
        assert_eq!(
            keys(&params),
            vec![
                "VpcId",
                "DatabasePassword",
                "EnableRenderedCache",
                "EnableRawCache",
                "SubnetsPublic",
            ]
        );
    }

    #[test]
    fn batch_stack_keys() {
        let params = stack_parameters(StackType::Batch, &fixture());
        assert_eq!(
            keys(&params),
            vec![
                "BatchAMI",
                "BatchClusterEC2MinCpus",
                "BatchClusterEC2MaxCpus",
                "BatchClusterEC2DesiredCpus",
                "BatchClusterSpotMinCpus",
                "BatchClusterSpotMaxCpus",
                "BatchClusterSpotDesiredCpus",
                "BatchClusterSpotBidPercentage",
                "SubnetsPublic",
            ]
        );
    }

    #[test]
    fn cache_stack_keys() {
        let params = stack_parameters(StackType::Cache, &fixture());
        assert_eq!(
            keys(&params),
            vec!["DefaultSecurityGroup", "CacheNodeType", "RawCacheNodeType"]
        );
    }

    #[test]
    fn cognito_and_author_have_no_specific_parameters() {
        assert!(stack_parameters(StackType::Cognito, &fixture()).is_empty());
        assert!(stack_parameters(StackType::Author, &fixture()).is_empty());
    }

    #[test]
    fn subnets_join_with_comma() {
        let params = stack_parameters(StackType::Common, &fixture());
        let subnets = params.iter().find(|p| p.key == "SubnetsPublic").unwrap();
        assert_eq!(subnets.value, "a,b");
    }

    #[test]
    fn booleans_stringify_lowercase() {
        let params = stack_parameters(StackType::Common, &fixture());
        let rendered = params
            .iter()
            .find(|p| p.key == "EnableRenderedCache")
            .unwrap();
        assert_eq!(rendered.value, "true");
    }
}
