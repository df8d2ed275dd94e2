//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an optional
//! rolling JSON file layer. Detected text never goes to the logs; only counts,
//! labels and line indices do.
//!
//! # Example
//!
//! ```no_run
//! use redactor::logging::init_logging;
//! use redactor::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(document_id = "scan-001.png", "Redaction started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of document processing
///
/// ```no_run
/// use redactor::log_document_start;
///
/// log_document_start!("scan-001.png", 8);
/// ```
#[macro_export]
macro_rules! log_document_start {
    ($document_id:expr, $category_count:expr) => {
        tracing::info!(
            document_id = %$document_id,
            category_count = $category_count,
            "Processing document"
        );
    };
}

/// Log the completion of document processing
///
/// ```no_run
/// use redactor::log_document_complete;
/// use std::time::Duration;
///
/// log_document_complete!("scan-001.png", 5, Duration::from_millis(420));
/// ```
#[macro_export]
macro_rules! log_document_complete {
    ($document_id:expr, $target_count:expr, $duration:expr) => {
        tracing::info!(
            document_id = %$document_id,
            target_count = $target_count,
            duration_ms = $duration.as_millis() as u64,
            "Document processed"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use redactor::log_error_with_context;
/// use redactor::domain::RedactorError;
///
/// let error = RedactorError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
