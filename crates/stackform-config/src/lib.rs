// stackform-config - Typed deployment configuration
//
// Loads the YAML document that parameterizes every stack operation. The
// configuration is loaded once per invocation and immutable afterwards;
// the remote API is the sole source of truth for stack state.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

mod validation;

/// Errors raised while loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read at all
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML, or a required field is missing or has the wrong shape
    #[error("error reading configuration YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but violates a structural invariant
    #[error("{0}")]
    Validation(String),
}

/// A YAML scalar whose concrete type varies between deployments.
///
/// CloudFormation parameters are strings on the wire, so the only
/// operation these values support is stringification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{}", value),
            Scalar::Int(value) => write!(f, "{}", value),
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

/// Deployment configuration: one flat YAML mapping with PascalCase keys.
///
/// Every field is required; a missing field fails deserialization rather
/// than surfacing later as a missing stack parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployConfig {
    pub region: String,
    pub stack_prefix: String,
    pub stage: Scalar,
    pub project_tag: String,
    pub profile: String,

    pub vpc_id: String,
    pub database_password: String,
    pub enable_rendered_cache: Scalar,
    pub enable_raw_cache: Scalar,
    /// Exactly two entries, validated at load time
    pub subnets_public: Vec<String>,

    #[serde(rename = "BatchAMI")]
    pub batch_ami: String,
    #[serde(rename = "BatchClusterEC2MinCpus")]
    pub batch_cluster_ec2_min_cpus: Scalar,
    #[serde(rename = "BatchClusterEC2MaxCpus")]
    pub batch_cluster_ec2_max_cpus: Scalar,
    #[serde(rename = "BatchClusterEC2DesiredCpus")]
    pub batch_cluster_ec2_desired_cpus: Scalar,
    pub batch_cluster_spot_min_cpus: Scalar,
    pub batch_cluster_spot_max_cpus: Scalar,
    pub batch_cluster_spot_desired_cpus: Scalar,
    pub batch_cluster_spot_bid_percentage: Scalar,

    pub default_security_group: String,
    pub cache_node_type: String,
    pub raw_cache_node_type: String,
}

impl DeployConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration document and enforce structural invariants.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: DeployConfig = serde_yaml::from_str(content)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
Region: eu-west-1
StackPrefix: demo
Stage: dev
ProjectTag: demo-project
Profile: default
VpcId: vpc-123
DatabasePassword: secret
EnableRenderedCache: "true"
EnableRawCache: false
SubnetsPublic:
  - subnet-aaa
  - subnet-bbb
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
"#;

    #[test]
    fn parses_full_document() {
        let config = DeployConfig::from_yaml(FIXTURE).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.stack_prefix, "demo");
        assert_eq!(config.subnets_public, vec!["subnet-aaa", "subnet-bbb"]);
        assert_eq!(config.batch_ami, "ami-456");
        assert_eq!(config.enable_rendered_cache, Scalar::Text("true".into()));
        assert_eq!(config.enable_raw_cache, Scalar::Bool(false));
        assert_eq!(config.batch_cluster_spot_bid_percentage, Scalar::Int(60));
    }

    #[test]
    fn rejects_wrong_subnet_count() {
        let doc = FIXTURE.replace("  - subnet-bbb\n", "");
        let err = DeployConfig::from_yaml(&doc).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(err.to_string(), "exactly 2 public subnets required");
    }

    #[test]
    fn rejects_missing_required_field() {
        let doc = FIXTURE.replace("VpcId: vpc-123\n", "");
        let err = DeployConfig::from_yaml(&doc).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = DeployConfig::from_yaml("Region: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn scalar_stringification() {
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::Int(60).to_string(), "60");
        assert_eq!(Scalar::Text("cache.t3.micro".into()).to_string(), "cache.t3.micro");
    }
}
