//! `nodedock update` command — repoint a node at a new reward address.

use clap::Args;
use nodedock_core::Config;

use super::open_lifecycle;

#[derive(Args)]
pub struct UpdateArgs {
    /// Node name
    pub node: String,

    /// New reward address
    pub address: String,
}

pub async fn execute(config: Config, args: UpdateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = open_lifecycle(config)?;
    lifecycle.update_address(&args.node, &args.address).await?;
    println!("Node {} now earns to {}", args.node, args.address);
    Ok(())
}
