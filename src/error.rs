//! Error types for the finger calculator.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// File or pipe I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Detector reply could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Landmark data does not describe a single hand
    #[error("Invalid landmarks: {0}")]
    InvalidLandmarks(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hand detector subprocess failed or misbehaved
    #[error("Detector error: {0}")]
    DetectorError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
