//! Error types for the PlantCLIP classification service.
//!
//! Errors are organized by concern so the HTTP layer can map each one to a
//! status code without inspecting message text.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for PlantCLIP operations.
#[derive(Error, Debug)]
pub enum PlantClipError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Classification errors
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while classifying a single image.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// A required request field was absent or empty
    #[error("{0}")]
    MissingInput(String),

    /// The referenced image does not exist
    #[error("Image file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {} ({size_mb}MB > {max_mb}MB)", .path.display())]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image could not be read or decoded
    #[error("Decode error for {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// Model files missing or failed to load
    #[error("Model error: {message}")]
    Model { message: String },

    /// The encoders failed while running
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// The classifier answered with a shape we cannot interpret
    #[error("Unexpected results type: {0}. Expected a ranked result with a top-k accessor")]
    UnexpectedShape(String),

    /// A class index fell outside the label list
    #[error("Class index {index} out of range (max is {max})")]
    IndexOutOfRange { index: i64, max: usize },

    /// The classifier produced no ranked entries
    #[error("No predictions returned from model")]
    NoPredictions,

    /// No ranked entry survived the zero-shot prompt filter
    #[error("Unable to process classifier results or no matching predictions")]
    NoMatchingPredictions,
}

impl ClassifyError {
    pub(crate) fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    pub(crate) fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }
}

/// Errors a [`Classifier`](crate::model::Classifier) backend may return.
pub type ClassifierError = ClassifyError;

/// Convenience type alias for PlantCLIP results.
pub type Result<T> = std::result::Result<T, PlantClipError>;

/// Convenience type alias for classification results.
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
