//! Run the integration test suite.

use anyhow::Result;
use chainsmoke_harness::RetryPolicy;
use clap::Args;

use crate::catalog;
use crate::output;
use crate::runner;

use super::CommandContext;

/// Suite options.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Only run tests for these blockchains (case-insensitive; repeat the
    /// flag or comma-separate).
    #[arg(long = "blockchain", value_delimiter = ',')]
    blockchains: Vec<String>,
}

impl RunCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let tests = catalog::fetch_tests(&self.blockchains);
        if tests.is_empty() {
            anyhow::bail!("no tests matched the requested blockchains");
        }

        let node = ctx.client()?;
        let tally = runner::run_suite(&node, &tests, &RetryPolicy::default()).await;

        output::summary(&tally);

        // The exit code is the durable pass/fail signal for CI.
        if !tally.passed() {
            std::process::exit(1);
        }
        Ok(())
    }
}
