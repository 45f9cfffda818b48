//! `nodedock logs` command — tail a node's logs.

use std::io::Write;

use clap::Args;
use futures::StreamExt;
use nodedock_core::Config;

use super::open_lifecycle;

#[derive(Args)]
pub struct LogsArgs {
    /// Node name
    pub node: String,
}

pub async fn execute(config: Config, args: LogsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = open_lifecycle(config)?;
    let mut stream = lifecycle.logs(&args.node).await?;
    let mut stdout = std::io::stdout();

    // Follow until Ctrl-C or the engine closes the stream
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            chunk = stream.next() => match chunk {
                Some(Ok(line)) => {
                    stdout.write_all(line.as_bytes())?;
                    stdout.flush()?;
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }
    }
    Ok(())
}
