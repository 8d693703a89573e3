//! Builder for test configurations

use lattice_config::{BedrockConfig, BedrockProtocol, Config, HealthConfig, ServerConfig};
use secrecy::SecretString;
use url::Url;

/// Builds a `Config` suitable for an in-process test server
pub struct ConfigBuilder {
    health_enabled: bool,
    protocol: BedrockProtocol,
    endpoint_url: Option<Url>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            health_enabled: true,
            protocol: BedrockProtocol::Invoke,
            endpoint_url: None,
        }
    }

    pub fn without_health(mut self) -> Self {
        self.health_enabled = false;
        self
    }

    pub fn with_converse_protocol(mut self) -> Self {
        self.protocol = BedrockProtocol::Converse;
        self
    }

    /// Point the Bedrock client at a local stand-in server
    pub fn with_endpoint(mut self, url: &str) -> Self {
        self.endpoint_url = Some(url.parse().expect("valid endpoint url"));
        self
    }

    pub fn build(self) -> Config {
        Config {
            server: ServerConfig {
                listen_address: None,
                health: HealthConfig {
                    enabled: self.health_enabled,
                    path: "/health".to_owned(),
                },
            },
            bedrock: BedrockConfig {
                region: "us-east-1".to_owned(),
                access_key_id: Some(SecretString::from("test-access-key")),
                secret_access_key: Some(SecretString::from("test-secret-key")),
                endpoint_url: self.endpoint_url,
                protocol: self.protocol,
                ..BedrockConfig::default()
            },
        }
    }
}
