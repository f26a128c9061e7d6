//! Error types for scene commands and document I/O.

use thiserror::Error;

/// Rejections raised by structural scene commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Unknown element: {0}")]
    UnknownElement(String),
    #[error("Element {element} has no port {port}")]
    UnknownPort { element: String, port: String },
    #[error("Wire would connect port {port} of {element} to itself")]
    SelfConnection { element: String, port: String },
}

/// Failures while reading a serialized document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Editor settings that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("min_zoom {min} is greater than max_zoom {max}")]
    InvertedZoomBounds { min: f64, max: f64 },
}

/// Result type for scene commands.
pub type SceneResult<T> = Result<T, SceneError>;
