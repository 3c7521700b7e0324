use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid context type: {0:?}")]
    InvalidContextType(String),

    #[error("failed to encode submission descriptor: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
