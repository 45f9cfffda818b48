//! Declarative worker image specification.
//!
//! The image is shared by every node container and rebuilt on each
//! install (no cache reuse, last build wins). The embedded entrypoint
//! carries the first-run provisioning logic: registering the worker with
//! the reward address and writing the `initialized` marker.

use crate::config::ImageConfig;
use crate::error::Result;

/// Entrypoint script baked into the image.
///
/// Provisioning runs exactly once per data directory; the marker file is
/// the orchestration layer's signal that it happened.
const ENTRYPOINT: &str = r#"#!/bin/sh
set -e

: "${NODE_DATA_DIR:=/var/lib/worker}"
: "${NODE_LOG_DIR:=/var/log/worker}"

if [ -z "$REWARD_ADDRESS" ]; then
    echo "REWARD_ADDRESS is not set" >&2
    exit 1
fi

if [ ! -f "$NODE_DATA_DIR/initialized" ]; then
    worker-node register --address "$REWARD_ADDRESS" --data-dir "$NODE_DATA_DIR" \
        >> "$NODE_LOG_DIR/provision.log" 2>&1
    printf '%s\n' "$REWARD_ADDRESS" > "$NODE_DATA_DIR/reward_address"
    touch "$NODE_DATA_DIR/initialized"
fi

exec worker-node run --data-dir "$NODE_DATA_DIR" >> "$NODE_LOG_DIR/worker.log" 2>&1
"#;

/// Build input for the shared worker image.
#[derive(Debug, Clone)]
pub struct ImageSpec {
    /// Image tag
    pub tag: String,
    /// Base image
    pub base_image: String,
    /// Packages installed during the build
    pub packages: Vec<String>,
    /// Download URL for the worker binary
    pub worker_url: String,
    /// Container-side data directory
    pub data_path: String,
    /// Container-side log directory
    pub log_path: String,
}

impl ImageSpec {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            tag: config.tag.clone(),
            base_image: config.base_image.clone(),
            packages: config.packages.clone(),
            worker_url: config.worker_url.clone(),
            data_path: config.data_path.clone(),
            log_path: config.log_path.clone(),
        }
    }

    /// Render the Dockerfile for this spec.
    pub fn dockerfile(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("FROM {}\n", self.base_image));
        if !self.packages.is_empty() {
            out.push_str(&format!(
                "RUN apt-get update \\\n && apt-get install -y --no-install-recommends {} \\\n && rm -rf /var/lib/apt/lists/*\n",
                self.packages.join(" ")
            ));
        }
        out.push_str(&format!(
            "RUN curl -fsSL -o /usr/local/bin/worker-node {} \\\n && chmod +x /usr/local/bin/worker-node\n",
            self.worker_url
        ));
        out.push_str(&format!("ENV NODE_DATA_DIR={}\n", self.data_path));
        out.push_str(&format!("ENV NODE_LOG_DIR={}\n", self.log_path));
        out.push_str("COPY entrypoint.sh /usr/local/bin/entrypoint.sh\n");
        out.push_str("RUN chmod +x /usr/local/bin/entrypoint.sh\n");
        out.push_str("ENTRYPOINT [\"/usr/local/bin/entrypoint.sh\"]\n");
        out
    }

    /// Produce the in-memory tar build context (Dockerfile + entrypoint).
    pub fn build_context(&self) -> Result<Vec<u8>> {
        let mut builder = tar::Builder::new(Vec::new());
        append_entry(&mut builder, "Dockerfile", self.dockerfile().as_bytes())?;
        append_entry(&mut builder, "entrypoint.sh", ENTRYPOINT.as_bytes())?;
        Ok(builder.into_inner()?)
    }
}

fn append_entry(builder: &mut tar::Builder<Vec<u8>>, path: &str, data: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, data)?;
    Ok(())
}
