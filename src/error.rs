//! Error types for the conversion pipeline

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting an SVG to PNG files
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid user input (missing source file, no usable sizes)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable renderer location was configured
    #[error("Invalid renderer configuration: {0}")]
    ConfigError(String),

    /// The renderer process failed to start
    #[error("Failed to launch renderer: {0}")]
    LaunchError(String),

    /// The source SVG file could not be read
    #[error("Failed to read SVG source: {0}")]
    SourceError(String),

    /// The renderer rejected the document or a protocol call failed
    #[error("Renderer error: {0}")]
    EngineError(String),

    /// Capturing the rendered page failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// An output file could not be written
    #[error("Failed to write output: {0}")]
    WriteError(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::EngineError(err.to_string())
    }
}
