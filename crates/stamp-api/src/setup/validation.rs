//! Startup configuration checks

use anyhow::Result;
use stamp_core::Config;

/// Fail fast on invalid settings; warn about settings that only fail later.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.pinata.credential.is_none() {
        tracing::warn!(
            "PINATA_JWT is not set - every upload will fail until the credential is configured"
        );
    }

    if config.is_development() {
        tracing::warn!(
            environment = config.environment_name(),
            "Error responses include error source chains"
        );
    }

    Ok(())
}
