//! `nodedock install` command — provision a node for a reward address.

use clap::Args;
use nodedock_core::Config;

use super::open_lifecycle;

#[derive(Args)]
pub struct InstallArgs {
    /// Reward address the node earns to
    pub address: String,
}

pub async fn execute(config: Config, args: InstallArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = open_lifecycle(config)?;
    println!("Building worker image and starting node...");
    let name = lifecycle.install(&args.address).await?;
    println!("Installed node {name}");
    Ok(())
}
