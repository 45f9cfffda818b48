//! The five operator workflows.
//!
//! Each workflow is a short deterministic sequence over the runtime
//! client and the state store. There is no partial-completion recovery
//! beyond re-running a workflow; every step is individually idempotent.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{NodeError, Result};
use crate::identity::derive_name;
use crate::image::ImageSpec;
use crate::registry::{NodeInstance, NodeRegistry};
use crate::runtime::{LogStream, NodeStatus, RunRequest, RuntimeClient};
use crate::store::NodeStateStore;

/// Lifecycle commands over a runtime client and the persisted node state.
pub struct Lifecycle<R> {
    config: Config,
    store: NodeStateStore,
    runtime: R,
}

impl<R: RuntimeClient> Lifecycle<R> {
    pub fn new(config: Config, runtime: R) -> Self {
        let store = NodeStateStore::from_config(&config);
        Self {
            config,
            store,
            runtime,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &NodeStateStore {
        &self.store
    }

    /// Validate an address and derive the node name it maps to.
    pub fn resolve_name(&self, address: &str) -> Result<String> {
        if address.trim().is_empty() {
            return Err(NodeError::InvalidAddress(
                "address must not be empty".to_string(),
            ));
        }
        Ok(derive_name(
            &self.config.node_prefix,
            address,
            self.config.suffix_len,
        ))
    }

    /// Install (or re-install) the node for a reward address.
    ///
    /// Builds the shared image, ensures the node's host directories, and
    /// runs a fresh container. Re-installing the same address replaces
    /// the prior container; the orchestration layer does not write the
    /// address file here — the image's first-run provisioning does.
    pub async fn install(&self, address: &str) -> Result<String> {
        let name = self.resolve_name(address)?;
        self.runtime.ping().await?;

        let spec = ImageSpec::from_config(&self.config.image);
        self.runtime.build_image(&spec).await?;

        let dirs = self.store.ensure(&name)?;
        let request = RunRequest {
            name: name.clone(),
            image: self.config.image.tag.clone(),
            address: address.trim().to_string(),
            data_dir: dirs.data_dir,
            log_dir: dirs.log_dir,
            data_path: self.config.image.data_path.clone(),
            log_path: self.config.image.log_path.clone(),
        };
        self.runtime.run(&request).await?;

        info!(node = %name, "node installed");
        Ok(name)
    }

    /// List all known nodes with reconciled status.
    pub async fn list(&self) -> Result<Vec<NodeInstance>> {
        NodeRegistry::new(&self.runtime, &self.store, &self.config.node_prefix)
            .list()
            .await
    }

    /// Repoint an existing node at a new reward address.
    ///
    /// Clears the initialized marker so the image re-provisions on the
    /// next start.
    pub async fn update_address(&self, name: &str, new_address: &str) -> Result<()> {
        if new_address.trim().is_empty() {
            return Err(NodeError::InvalidAddress(
                "address must not be empty".to_string(),
            ));
        }
        if !self.store.exists(name) {
            return Err(NodeError::NotFound(name.to_string()));
        }

        self.runtime.stop(name).await?;
        self.store.write_address(name, new_address)?;
        self.store.clear_initialized(name)?;
        self.runtime.start(name).await?;

        info!(node = name, "address updated");
        Ok(())
    }

    /// Open a log stream for a node. The container must exist in some
    /// status; the stream runs until the caller drops it.
    pub async fn logs(&self, name: &str) -> Result<LogStream> {
        match self.runtime.status(name).await? {
            NodeStatus::Absent => Err(NodeError::NotFound(name.to_string())),
            _ => self.runtime.stream_logs(name).await,
        }
    }

    /// Remove a node's container and persisted state.
    ///
    /// Both steps run even if one fails; failures are aggregated and
    /// reported at the end. Absence of either side is a non-fatal
    /// partial success.
    pub async fn uninstall(&self, name: &str) -> Result<()> {
        let mut failures = Vec::new();

        if let Err(e) = self.runtime.remove(name).await {
            warn!(node = name, "container removal failed: {e}");
            failures.push(format!("container: {e}"));
        }
        if let Err(e) = self.store.remove(name) {
            warn!(node = name, "state removal failed: {e}");
            failures.push(format!("state: {e}"));
        }

        if failures.is_empty() {
            info!(node = name, "node uninstalled");
            Ok(())
        } else {
            Err(NodeError::Uninstall(failures.join("; ")))
        }
    }
}
