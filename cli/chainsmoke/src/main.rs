//! chainsmoke - drive a node's integration test catalog end to end.
//!
//! The suite runner for CI and local verification of external initiator
//! integrations.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chainsmoke::commands::Cli;
use chainsmoke::error;

#[tokio::main]
async fn main() -> Result<()> {
    // Progress output goes to stdout; keep tracing on stderr and quiet by default.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
