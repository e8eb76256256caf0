//! Register the external initiator with the node.

use anyhow::Result;
use clap::Args;

use crate::client::ExternalInitiatorSpec;
use crate::runner::INITIATOR_NAME;

use super::CommandContext;

/// Initiator registration options.
#[derive(Debug, Args)]
pub struct AddInitiatorCommand {
    /// Name to register the initiator under.
    #[arg(long, default_value = INITIATOR_NAME)]
    name: String,
}

impl AddInitiatorCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let url = format!("{}/jobs", ctx.config.initiator_url.trim_end_matches('/'));

        let node = ctx.client()?;
        let response = node
            .create_external_initiator(&ExternalInitiatorSpec {
                name: self.name,
                url,
            })
            .await?;

        let ei = &response.data;
        println!("EI incoming accesskey: {}", ei.attribute("incomingAccessKey"));
        println!("EI incoming secret: {}", ei.attribute("incomingSecret"));
        println!("EI outgoing token: {}", ei.attribute("outgoingToken"));
        println!("EI outgoing secret: {}", ei.attribute("outgoingSecret"));

        Ok(())
    }
}
