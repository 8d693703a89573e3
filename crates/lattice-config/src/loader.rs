use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the Bedrock backend is misconfigured
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bedrock.region.is_empty() {
            anyhow::bail!("bedrock.region must be set");
        }

        if self.bedrock.access_key_id.is_some() != self.bedrock.secret_access_key.is_some() {
            anyhow::bail!("bedrock.access_key_id and bedrock.secret_access_key must be set together");
        }

        if self.bedrock.default_max_output_tokens == 0 {
            anyhow::bail!("bedrock.default_max_output_tokens must be greater than 0");
        }

        Ok(())
    }
}
