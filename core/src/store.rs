//! On-host persisted state for node instances.
//!
//! Each node owns one data directory and one log directory, keyed by the
//! derived name. The data directory holds two marker files:
//! `reward_address` (single-line text) and `initialized` (presence-only,
//! written by the container's first-run provisioning). The directories
//! outlive the container and are the durable source of truth for a
//! node's identity.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{NodeError, Result};

/// Persisted address file inside the data directory.
pub const ADDRESS_FILE: &str = "reward_address";

/// Presence-only marker signaling completed first-run provisioning.
pub const INITIALIZED_FILE: &str = "initialized";

/// Host directory pair for one node instance.
#[derive(Debug, Clone)]
pub struct NodeDirs {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

/// Manages the per-node directory layout under the two host roots.
///
/// No file locking: the tool assumes exclusive single-operator ownership
/// of the roots.
#[derive(Debug, Clone)]
pub struct NodeStateStore {
    data_root: PathBuf,
    log_root: PathBuf,
}

impl NodeStateStore {
    pub fn new(data_root: impl Into<PathBuf>, log_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            log_root: log_root.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.data_root, &config.log_root)
    }

    /// Host data directory for a node.
    pub fn data_dir(&self, name: &str) -> PathBuf {
        self.data_root.join(name)
    }

    /// Host log directory for a node.
    pub fn log_dir(&self, name: &str) -> PathBuf {
        self.log_root.join(name)
    }

    /// Whether the node has been installed at least once.
    pub fn exists(&self, name: &str) -> bool {
        self.data_dir(name).is_dir()
    }

    /// Create both directories if absent. Idempotent.
    ///
    /// Directories are made world-writable on unix because the container
    /// runs the worker as an arbitrary internal user.
    pub fn ensure(&self, name: &str) -> Result<NodeDirs> {
        let dirs = NodeDirs {
            data_dir: self.data_dir(name),
            log_dir: self.log_dir(name),
        };
        std::fs::create_dir_all(&dirs.data_dir)?;
        std::fs::create_dir_all(&dirs.log_dir)?;
        make_world_writable(&dirs.data_dir)?;
        make_world_writable(&dirs.log_dir)?;
        Ok(dirs)
    }

    /// Read the persisted reward address.
    pub fn read_address(&self, name: &str) -> Result<String> {
        let path = self.data_dir(name).join(ADDRESS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(s.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(NodeError::NotFound(
                format!("no persisted address for node {name}"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the persisted reward address.
    pub fn write_address(&self, name: &str, address: &str) -> Result<()> {
        let path = self.data_dir(name).join(ADDRESS_FILE);
        std::fs::write(&path, format!("{}\n", address.trim()))?;
        Ok(())
    }

    /// Remove the initialized marker, forcing the image's provisioning
    /// step to run again on next start. An absent marker is fine.
    pub fn clear_initialized(&self, name: &str) -> Result<()> {
        let path = self.data_dir(name).join(INITIALIZED_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether first-run provisioning has completed for this node.
    pub fn is_initialized(&self, name: &str) -> bool {
        self.data_dir(name).join(INITIALIZED_FILE).exists()
    }

    /// Delete both directories. Already-gone directories are fine.
    pub fn remove(&self, name: &str) -> Result<()> {
        remove_dir_if_present(&self.data_dir(name))?;
        remove_dir_if_present(&self.log_dir(name))?;
        Ok(())
    }

    /// Node names with a data directory under the data root, filtered to
    /// the fleet prefix, sorted.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.data_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(unix)]
fn make_world_writable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o777))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_world_writable(_path: &Path) -> Result<()> {
    Ok(())
}

fn remove_dir_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
