use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// AWS Bedrock backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedrockConfig {
    /// AWS region
    #[serde(default)]
    pub region: String,
    /// Access key ID (optional, uses default credential chain if absent)
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
    /// Endpoint URL override, used to point at a local stand-in during testing
    #[serde(default)]
    pub endpoint_url: Option<Url>,
    /// Which Bedrock API to invoke models through
    #[serde(default)]
    pub protocol: BedrockProtocol,
    /// Output token cap applied when a request does not specify one
    #[serde(default = "default_max_output_tokens")]
    pub default_max_output_tokens: u32,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            protocol: BedrockProtocol::default(),
            default_max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Bedrock API flavor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedrockProtocol {
    /// Model-native `InvokeModel` with Anthropic Messages JSON bodies
    #[default]
    Invoke,
    /// Unified Converse API (not yet supported)
    Converse,
}

const fn default_max_output_tokens() -> u32 {
    4096
}
