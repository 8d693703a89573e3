#![allow(clippy::must_use_candidate)]

pub mod bedrock;
mod env;
pub mod health;
mod loader;
pub mod server;

use serde::Deserialize;

pub use bedrock::*;
pub use health::*;
pub use server::*;

/// Top-level Lattice configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// AWS Bedrock backend configuration
    #[serde(default)]
    pub bedrock: BedrockConfig,
}
