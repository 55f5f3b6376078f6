use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Scene parse error: {0}")]
    SceneParse(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
