//! Explicit tool configuration.
//!
//! Built once at startup and passed into every component; no component
//! reads ambient environment settings on its own.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, Result};

/// Nodedock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host root for per-node data directories (<data_root>/<name>/)
    pub data_root: PathBuf,

    /// Host root for per-node log directories (<log_root>/<name>/)
    pub log_root: PathBuf,

    /// Base prefix for derived node names (<prefix>-<suffix>)
    #[serde(default = "default_node_prefix")]
    pub node_prefix: String,

    /// Number of trailing address characters used as the name suffix
    #[serde(default = "default_suffix_len")]
    pub suffix_len: usize,

    /// Worker image build configuration
    #[serde(default)]
    pub image: ImageConfig,
}

impl Default for Config {
    fn default() -> Self {
        let root = base_dir();
        Self {
            data_root: root.join("data"),
            log_root: root.join("logs"),
            node_prefix: default_node_prefix(),
            suffix_len: default_suffix_len(),
            image: ImageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))
    }

    /// Load from an explicit path, or from the default location
    /// (~/.nodedock/config.json) if it exists, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = base_dir().join("config.json");
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Worker image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Image tag shared by all node containers
    pub tag: String,

    /// Base image for the build
    pub base_image: String,

    /// Packages installed into the image
    pub packages: Vec<String>,

    /// Download URL for the worker binary
    pub worker_url: String,

    /// Data directory inside the container (bind target, env `NODE_DATA_DIR`)
    pub data_path: String,

    /// Log directory inside the container (bind target, env `NODE_LOG_DIR`)
    pub log_path: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            tag: "nodedock/worker:latest".to_string(),
            base_image: "ubuntu:22.04".to_string(),
            packages: vec!["ca-certificates".to_string(), "curl".to_string()],
            worker_url: "https://downloads.workernet.io/linux/worker-node".to_string(),
            data_path: "/var/lib/worker".to_string(),
            log_path: "/var/log/worker".to_string(),
        }
    }
}

fn default_node_prefix() -> String {
    "nodedock".to_string()
}

fn default_suffix_len() -> usize {
    6
}

/// Tool home directory (~/.nodedock).
fn base_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".nodedock"))
        .unwrap_or_else(|| PathBuf::from(".nodedock"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.node_prefix, "nodedock");
        assert_eq!(config.suffix_len, 6);
        assert!(config.data_root.ends_with("data"));
        assert!(config.log_root.ends_with("logs"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.node_prefix, config.node_prefix);
        assert_eq!(parsed.image.tag, config.image.tag);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let json = r#"{"data_root":"/srv/nodes/data","log_root":"/srv/nodes/logs"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.data_root, PathBuf::from("/srv/nodes/data"));
        assert_eq!(config.node_prefix, "nodedock");
        assert_eq!(config.suffix_len, 6);
        assert_eq!(config.image.tag, "nodedock/worker:latest");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json_is_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn test_load_or_default_with_explicit_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        let mut config = Config::default();
        config.node_prefix = "fleet".to_string();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded.node_prefix, "fleet");
    }
}
