//! Configuration management for Redactor.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Redactor uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REDACTOR_<SECTION>_<KEY>` environment overrides
//! - Default values for every section
//! - Validation with descriptive messages
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use redactor::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("redactor.toml")?;
//!
//! println!("Categories: {}", config.detection.categories);
//! if let Some(endpoint) = &config.ner.endpoint {
//!     println!("Entity tagger: {endpoint}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`DetectionConfig`] - categories, rule library, block-list, address context words
//! - [`OcrConfig`] - text detection provider (HTTP service or sidecar JSON)
//! - [`NerConfig`] - entity-tagging service
//! - [`RenderConfig`] - label font, size, color and offset
//! - [`RasterConfig`] - text document canvas
//! - [`ExportConfig`] - PDF DPI
//! - [`AuditConfig`] - audit trail
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [detection]
//! categories = ["PERSON", "NRIC/FIN", "PHONE", "ADDRESS"]
//!
//! [ocr]
//! provider = "http"
//! endpoint = "http://localhost:8866/ocr"
//! api_key = "${REDACTOR_OCR_KEY}"
//!
//! [ner]
//! enabled = true
//! endpoint = "http://localhost:8867/entities"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, AuditConfig, DetectionConfig, ExportConfig, LoggingConfig, NerConfig,
    OcrConfig, OcrProvider, RasterConfig, RedactorConfig, RenderConfig,
};
pub use secret::{bearer_header, secret_string, secret_string_opt, SecretString, SecretValue};
