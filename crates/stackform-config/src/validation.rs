// Structural validation beyond what deserialization enforces.

use crate::{ConfigError, DeployConfig};

pub(crate) fn validate(config: &DeployConfig) -> Result<(), ConfigError> {
    if config.subnets_public.len() != 2 {
        return Err(ConfigError::Validation(
            "exactly 2 public subnets required".to_string(),
        ));
    }

    Ok(())
}
