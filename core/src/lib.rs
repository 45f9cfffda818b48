//! Nodedock Core - Node Orchestration Primitives
//!
//! This crate provides the building blocks for managing a fleet of
//! containerized worker nodes: identity derivation, the persisted state
//! store, the container runtime abstraction and its Docker
//! implementation, and the lifecycle workflows on top of them.

pub mod config;
pub mod docker;
pub mod error;
pub mod identity;
pub mod image;
pub mod lifecycle;
pub mod registry;
pub mod runtime;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use config::{Config, ImageConfig};
pub use docker::DockerClient;
pub use error::{NodeError, Result};
pub use lifecycle::Lifecycle;
pub use registry::{NodeInstance, NodeRegistry, UNKNOWN_ADDRESS};
pub use runtime::{LogStream, NodeStatus, ResourceUsage, RunRequest, RuntimeClient};
pub use store::NodeStateStore;

/// Nodedock version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
