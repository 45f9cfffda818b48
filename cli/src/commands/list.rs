//! `nodedock list` command — show the fleet with live status.

use clap::Args;
use nodedock_core::Config;

use super::open_lifecycle;
use crate::output;

#[derive(Args)]
pub struct ListArgs {
    /// Only display node names
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn execute(config: Config, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = open_lifecycle(config)?;
    let nodes = lifecycle.list().await?;

    if args.quiet {
        for node in &nodes {
            println!("{}", node.name);
        }
        return Ok(());
    }

    output::render_nodes(&nodes);
    Ok(())
}
