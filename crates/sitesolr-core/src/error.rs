use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteSolrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration path: '{0}'")]
    InvalidPath(String),

    #[error("Configuration path not found: {0}")]
    PathNotFound(String),

    #[error("Read-only: {0}")]
    ReadOnly(String),

    #[error("Record lookup failed: {0}")]
    Record(String),
}

pub type Result<T> = std::result::Result<T, SiteSolrError>;
