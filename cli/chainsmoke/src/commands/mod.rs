//! CLI commands.

mod add_initiator;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::ChainlinkNode;
use crate::config::{
    Config, Credentials, DEFAULT_CHAINLINK_URL, DEFAULT_CREDENTIALS_FILE, DEFAULT_INITIATOR_URL,
};

/// chainsmoke - drive a node's integration test catalog end to end.
#[derive(Debug, Parser)]
#[command(name = "chainsmoke")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the node's control API.
    #[arg(long, global = true, env = "CHAINLINK_URL", default_value = DEFAULT_CHAINLINK_URL)]
    chainlink_url: String,

    /// Base URL the node should reach the external initiator on.
    #[arg(long, global = true, env = "EXTERNAL_INITIATOR_URL", default_value = DEFAULT_INITIATOR_URL)]
    initiator_url: String,

    /// Path to a two-line email/password credentials file.
    #[arg(long, global = true, env = "CHAINLINK_CREDENTIALS", default_value = DEFAULT_CREDENTIALS_FILE)]
    credentials: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Execute the integration test suite.
    Run(run::RunCommand),

    /// Register the external initiator on the node.
    AddInitiator(add_initiator::AddInitiatorCommand),
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let credentials = Credentials::from_file(&self.credentials)?;
        let ctx = CommandContext {
            config: Config {
                chainlink_url: self.chainlink_url,
                initiator_url: self.initiator_url,
                credentials,
            },
        };

        match self.command {
            Commands::Run(cmd) => cmd.run(ctx).await,
            Commands::AddInitiator(cmd) => cmd.run(ctx).await,
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    /// Get an authenticated API client.
    pub fn client(&self) -> Result<ChainlinkNode> {
        Ok(ChainlinkNode::new(&self.config)?)
    }
}
