use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Module not found: {0}")]
    NodeNotFound(String),

    #[error("Not a markup module: {0}")]
    NotMarkup(String),
}
