//! Table formatting helpers for CLI output.

use comfy_table::{ContentArrangement, Table};
use nodedock_core::NodeInstance;

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Print the fleet as a table. Usage columns show `--` for nodes
/// without a live resource sample.
pub fn render_nodes(nodes: &[NodeInstance]) {
    let mut table = new_table(&[
        "NAME",
        "ADDRESS",
        "STATUS",
        "INITIALIZED",
        "CPU %",
        "MEM USAGE / LIMIT",
    ]);

    for node in nodes {
        let (cpu, mem) = match &node.usage {
            Some(usage) => (
                format!("{:.1}", usage.cpu_percent),
                format!(
                    "{} / {}",
                    format_bytes(usage.memory_bytes),
                    format_bytes(usage.memory_limit_bytes)
                ),
            ),
            None => ("--".to_string(), "--".to_string()),
        };

        table.add_row([
            node.name.clone(),
            node.address.clone(),
            node.status.to_string(),
            if node.initialized { "yes" } else { "no" }.to_string(),
            cpu,
            mem,
        ]);
    }

    println!("{table}");
}
