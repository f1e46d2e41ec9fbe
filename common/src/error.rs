//! Error types

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Envelope error: {0}")]
    Envelope(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Shape geometry error: {0}")]
    ShapeGeometry(String),

    #[error("Unknown shape kind: {0}")]
    UnknownShape(String),

    #[error("Map viewport is not available yet")]
    MissingViewport,
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
