//! CLI command definitions and dispatch.

mod install;
mod list;
mod logs;
mod uninstall;
mod update;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nodedock_core::{Config, DockerClient, Lifecycle};

use crate::menu;

/// Nodedock — manage a fleet of containerized worker nodes.
#[derive(Parser)]
#[command(name = "nodedock", version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands. Running without one opens the interactive menu.
#[derive(Subcommand)]
pub enum Command {
    /// Install a node for a reward address
    Install(install::InstallArgs),
    /// List managed nodes
    List(list::ListArgs),
    /// Point an existing node at a new reward address
    Update(update::UpdateArgs),
    /// Tail a node's logs
    Logs(logs::LogsArgs),
    /// Remove a node's container and persisted state
    Uninstall(uninstall::UninstallArgs),
}

/// Open the lifecycle over the local container engine.
pub(crate) fn open_lifecycle(
    config: Config,
) -> Result<Lifecycle<DockerClient>, Box<dyn std::error::Error>> {
    let runtime = DockerClient::connect()?;
    Ok(Lifecycle::new(config, runtime))
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Install(args)) => install::execute(config, args).await,
        Some(Command::List(args)) => list::execute(config, args).await,
        Some(Command::Update(args)) => update::execute(config, args).await,
        Some(Command::Logs(args)) => logs::execute(config, args).await,
        Some(Command::Uninstall(args)) => uninstall::execute(config, args).await,
        None => menu::run(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install() {
        let cli = Cli::try_parse_from(["nodedock", "install", "0xABCDEF123456"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Install(_))));
    }

    #[test]
    fn test_parse_no_subcommand() {
        let cli = Cli::try_parse_from(["nodedock"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_global_config_flag() {
        let cli = Cli::try_parse_from(["nodedock", "list", "--config", "/tmp/c.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
    }
}
