//! Reconciled view of the node fleet.
//!
//! Joins live container state from the runtime with persisted identity
//! metadata from the state store. A node whose container was removed
//! out-of-band still appears (status `absent`) as long as its data
//! directory survives; a node whose address file is missing is listed
//! with a sentinel address. Nothing in the read path aborts the listing.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::runtime::{NodeStatus, ResourceUsage, RuntimeClient};
use crate::store::NodeStateStore;

/// Displayed when the persisted address file is missing or unreadable.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// One managed node: container state plus persisted identity.
#[derive(Debug, Clone)]
pub struct NodeInstance {
    pub name: String,
    pub address: String,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub initialized: bool,
    pub status: NodeStatus,
    pub usage: Option<ResourceUsage>,
}

/// Enumerates known node instances.
pub struct NodeRegistry<'a, R> {
    runtime: &'a R,
    store: &'a NodeStateStore,
    prefix: &'a str,
}

impl<'a, R: RuntimeClient> NodeRegistry<'a, R> {
    pub fn new(runtime: &'a R, store: &'a NodeStateStore, prefix: &'a str) -> Self {
        Self {
            runtime,
            store,
            prefix,
        }
    }

    /// List all known nodes, sorted by name.
    ///
    /// The name set is the union of containers matching the fleet prefix
    /// and node directories under the data root. Status and usage
    /// lookups degrade (`unknown` / `None`) instead of failing.
    pub async fn list(&self) -> Result<Vec<NodeInstance>> {
        let live = self.runtime.list_by_prefix(self.prefix).await?;

        let mut names: BTreeSet<String> = live.iter().cloned().collect();
        names.extend(self.store.list(self.prefix)?);

        let mut nodes = Vec::with_capacity(names.len());
        for name in names {
            let status = if live.contains(&name) {
                self.runtime
                    .status(&name)
                    .await
                    .unwrap_or(NodeStatus::Unknown)
            } else {
                NodeStatus::Absent
            };

            let usage = if status == NodeStatus::Running {
                self.runtime.resource_usage(&name).await.unwrap_or(None)
            } else {
                None
            };

            let address = self
                .store
                .read_address(&name)
                .unwrap_or_else(|_| UNKNOWN_ADDRESS.to_string());

            nodes.push(NodeInstance {
                address,
                data_dir: self.store.data_dir(&name),
                log_dir: self.store.log_dir(&name),
                initialized: self.store.is_initialized(&name),
                status,
                usage,
                name,
            });
        }
        Ok(nodes)
    }
}
