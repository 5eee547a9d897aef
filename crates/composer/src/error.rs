use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Graph error: {0}")]
    Graph(#[from] preview_graph::GraphError),
}

pub type Result<T> = std::result::Result<T, ComposerError>;
