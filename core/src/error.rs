use thiserror::Error;

/// Nodedock error types
#[derive(Error, Debug)]
pub enum NodeError {
    /// The container engine is missing or unreachable. Aborts the run.
    #[error("container engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Operator supplied an unusable reward address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Target node (container or persisted state) does not exist.
    #[error("no such node: {0}")]
    NotFound(String),

    /// Image build reported an error. Propagated, never retried.
    #[error("image build failed: {0}")]
    ImageBuild(String),

    /// Transport-level engine error.
    #[error("engine error: {0}")]
    Engine(#[from] bollard::errors::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Uninstall finished with one or more failed cleanup steps.
    #[error("uninstall incomplete: {0}")]
    Uninstall(String),
}

/// Result type alias for nodedock operations
pub type Result<T> = std::result::Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_unavailable_display() {
        let error = NodeError::EngineUnavailable("connection refused".to_string());
        assert_eq!(
            error.to_string(),
            "container engine unavailable: connection refused"
        );
    }

    #[test]
    fn test_invalid_address_display() {
        let error = NodeError::InvalidAddress("address must not be empty".to_string());
        assert_eq!(
            error.to_string(),
            "invalid address: address must not be empty"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = NodeError::NotFound("nodedock-123456".to_string());
        assert_eq!(error.to_string(), "no such node: nodedock-123456");
    }

    #[test]
    fn test_image_build_display() {
        let error = NodeError::ImageBuild("apt-get exited with 100".to_string());
        assert_eq!(error.to_string(), "image build failed: apt-get exited with 100");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let node_error: NodeError = io_error.into();
        assert!(matches!(node_error, NodeError::Io(_)));
        assert!(node_error.to_string().contains("file not found"));
    }

    #[test]
    fn test_config_error_display() {
        let error = NodeError::Config("data_root is not a directory".to_string());
        assert_eq!(
            error.to_string(),
            "configuration error: data_root is not a directory"
        );
    }

    #[test]
    fn test_uninstall_error_display() {
        let error = NodeError::Uninstall("state removal failed".to_string());
        assert_eq!(error.to_string(), "uninstall incomplete: state removal failed");
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(NodeError::NotFound("missing".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_is_debug() {
        let error = NodeError::InvalidAddress("test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidAddress"));
    }
}
