use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClouvelError {
    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("{document} not found: run 'init_planning' first")]
    NotInitialized { document: String },

    #[error(".claude directory not found: run 'install_shovel' first")]
    ScaffoldMissing,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClouvelError>;
