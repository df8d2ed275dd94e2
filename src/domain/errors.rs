//! Domain error types
//!
//! This module defines the error hierarchy for Redactor.
//! Errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Redactor error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Text detection (OCR) service errors
    #[error("OCR service error: {0}")]
    Ocr(ServiceError),

    /// Entity tagging service errors
    #[error("Entity tagger error: {0}")]
    Tagger(ServiceError),

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(String),

    /// Redaction rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// PDF export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Document rasterization errors
    #[error("Rasterization error: {0}")]
    Raster(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// External service errors
///
/// Errors that occur when calling the OCR or entity-tagging services.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Failed to connect to the service
    #[error("Failed to connect to service: {0}")]
    ConnectionFailed(String),

    /// Invalid response from the service
    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Service not available (not configured or failed to initialize)
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Map an HTTP status and body into the matching variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            Self::ServerError { status, message }
        } else {
            Self::ClientError { status, message }
        }
    }
}

impl From<std::io::Error> for RedactorError {
    fn from(err: std::io::Error) -> Self {
        RedactorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RedactorError {
    fn from(err: serde_json::Error) -> Self {
        RedactorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RedactorError {
    fn from(err: toml::de::Error) -> Self {
        RedactorError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<image::ImageError> for RedactorError {
    fn from(err: image::ImageError) -> Self {
        RedactorError::Image(err.to_string())
    }
}
