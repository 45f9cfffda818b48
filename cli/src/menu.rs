//! Interactive operator menu, shown when the CLI runs without a
//! subcommand.
//!
//! A failure to reach the container engine aborts the session; every
//! other error is printed and the menu re-prompts.

use std::io::{self, Write};

use futures::StreamExt;
use nodedock_core::{Config, DockerClient, Lifecycle, NodeError, NodeInstance};

use crate::commands::open_lifecycle;
use crate::output;

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = open_lifecycle(config)?;

    loop {
        println!();
        println!("nodedock {}", nodedock_core::VERSION);
        println!("  1) Install a node");
        println!("  2) List nodes");
        println!("  3) Update a node's reward address");
        println!("  4) Tail node logs");
        println!("  5) Uninstall a node");
        println!("  q) Quit");

        let choice = prompt("> ")?;
        let result = match choice.as_str() {
            "1" => install(&lifecycle).await,
            "2" => list(&lifecycle).await,
            "3" => update(&lifecycle).await,
            "4" => logs(&lifecycle).await,
            "5" => uninstall(&lifecycle).await,
            "q" | "Q" => break,
            "" => continue,
            other => {
                println!("Unknown choice: {other}");
                continue;
            }
        };

        match result {
            Ok(()) => {}
            Err(e @ NodeError::EngineUnavailable(_)) => return Err(e.into()),
            Err(e) => println!("Error: {e}"),
        }
    }
    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{msg}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn install(lifecycle: &Lifecycle<DockerClient>) -> nodedock_core::Result<()> {
    let address = prompt("Reward address: ")?;
    println!("Building worker image and starting node...");
    let name = lifecycle.install(&address).await?;
    println!("Installed node {name}");
    Ok(())
}

async fn list(lifecycle: &Lifecycle<DockerClient>) -> nodedock_core::Result<()> {
    let nodes = lifecycle.list().await?;
    if nodes.is_empty() {
        println!("No nodes installed.");
    } else {
        output::render_nodes(&nodes);
    }
    Ok(())
}

/// List the fleet and let the operator pick one node by number.
async fn select_node(
    lifecycle: &Lifecycle<DockerClient>,
) -> nodedock_core::Result<Option<NodeInstance>> {
    let mut nodes = lifecycle.list().await?;
    if nodes.is_empty() {
        println!("No nodes installed.");
        return Ok(None);
    }

    for (i, node) in nodes.iter().enumerate() {
        println!("  {}) {} ({}, {})", i + 1, node.name, node.address, node.status);
    }

    let choice = prompt("Node number: ")?;
    match choice.parse::<usize>() {
        Ok(n) if n >= 1 && n <= nodes.len() => Ok(Some(nodes.remove(n - 1))),
        _ => {
            println!("Invalid selection: {choice}");
            Ok(None)
        }
    }
}

async fn update(lifecycle: &Lifecycle<DockerClient>) -> nodedock_core::Result<()> {
    let Some(node) = select_node(lifecycle).await? else {
        return Ok(());
    };
    let address = prompt("New reward address: ")?;
    lifecycle.update_address(&node.name, &address).await?;
    println!("Node {} now earns to {address}", node.name);
    Ok(())
}

async fn logs(lifecycle: &Lifecycle<DockerClient>) -> nodedock_core::Result<()> {
    let Some(node) = select_node(lifecycle).await? else {
        return Ok(());
    };

    println!("Tailing logs for {} (Ctrl-C to return)", node.name);
    let mut stream = lifecycle.logs(&node.name).await?;
    let mut stdout = io::stdout();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            chunk = stream.next() => match chunk {
                Some(Ok(line)) => {
                    stdout.write_all(line.as_bytes())?;
                    stdout.flush()?;
                }
                Some(Err(e)) => return Err(e),
                None => break,
            }
        }
    }
    println!();
    Ok(())
}

async fn uninstall(lifecycle: &Lifecycle<DockerClient>) -> nodedock_core::Result<()> {
    let Some(node) = select_node(lifecycle).await? else {
        return Ok(());
    };

    let answer = prompt(&format!(
        "Remove {} and all of its data? [y/N] ",
        node.name
    ))?;
    if !answer.eq_ignore_ascii_case("y") {
        println!("Aborted.");
        return Ok(());
    }

    lifecycle.uninstall(&node.name).await?;
    println!("Uninstalled node {}", node.name);
    Ok(())
}
