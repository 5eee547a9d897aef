use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("File not in project: {0}")]
    UnknownFile(String),

    #[error("No element selected")]
    NoSelection,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config {path}: {reason}")]
    ConfigFormat { path: PathBuf, reason: String },

    #[error("Parser error: {0}")]
    Parser(#[from] preview_parser::ParserError),

    #[error("Composer error: {0}")]
    Composer(#[from] preview_composer::ComposerError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] preview_protocol::ProtocolError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HostError {
    pub fn unknown_file(path: impl Into<String>) -> Self {
        Self::UnknownFile(path.into())
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
