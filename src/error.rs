/// Error types for the obsbench crate.
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a diagram.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Missing image asset: {}", path.display())]
    MissingAsset { path: PathBuf },

    #[error("Failed to read image asset {}: {source}", path.display())]
    AssetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid diagram: {0}")]
    InvalidGraph(String),

    #[error("Failed to write output file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
