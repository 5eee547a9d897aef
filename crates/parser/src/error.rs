use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParserError>;

/// Errors that can occur around project parsing.
///
/// Malformed generator output is never an error: the parser always recovers
/// with a fallback project. These variants cover configuration and IO only.
#[derive(Error, Debug)]
pub enum ParserError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A virtual path that normalizes to nothing
    #[error("Invalid virtual path: {0:?}")]
    InvalidPath(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ParserError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }
}
