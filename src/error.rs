use thiserror::Error;

#[derive(Error, Debug)]
pub enum SamGisError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Empty prompt: draw at least one point or rectangle before sending")]
    EmptyPrompt,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] samgis_prompt_common::Error),
}

pub type Result<T> = std::result::Result<T, SamGisError>;
