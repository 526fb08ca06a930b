use vkser_protocol::{ResourceId, SerialiseError, WireError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    #[error("serialisation error: {0}")]
    Serialise(#[from] SerialiseError),

    #[error("export error: {0}")]
    Export(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
