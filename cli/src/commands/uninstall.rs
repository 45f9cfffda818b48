//! `nodedock uninstall` command — remove a node and its state.

use clap::Args;
use nodedock_core::Config;

use super::open_lifecycle;

#[derive(Args)]
pub struct UninstallArgs {
    /// Node name
    pub node: String,
}

pub async fn execute(config: Config, args: UninstallArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = open_lifecycle(config)?;
    lifecycle.uninstall(&args.node).await?;
    println!("Uninstalled node {}", args.node);
    Ok(())
}
