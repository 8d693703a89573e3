use std::path::PathBuf;

use clap::Parser;

/// Lattice protocol-translation gateway
#[derive(Debug, Parser)]
#[command(name = "lattice", about = "OpenAI-compatible gateway for Claude models on AWS Bedrock")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lattice.toml", env = "LATTICE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "LATTICE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
