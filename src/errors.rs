use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for the contouring pipeline
#[derive(Error, Debug)]
pub enum IsoContourError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Array component {component} out of range (image has {available} components)")]
    InvalidComponent {
        component: usize,
        available: usize,
    },

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("Window error: {0}")]
    Window(String),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, IsoContourError>;
