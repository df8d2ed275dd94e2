//! External system integrations for Redactor.
//!
//! This module provides adapters for the collaborators the redaction core consumes:
//!
//! - [`ocr`] - text detection (HTTP service or precomputed sidecar JSON)
//! - [`ner`] - entity tagging over HTTP
//! - [`raster`] - document to image conversion
//!
//! # Design Pattern
//!
//! Each boundary is a trait ([`ocr::TextDetector`], [`ner::EntityTagger`],
//! [`raster::Rasterizer`]) so the engine can be driven by fakes in tests.
//!
//! ```rust,no_run
//! use redactor::adapters::ner::{EntityTagger, HttpEntityTagger};
//! use redactor::config::NerConfig;
//!
//! # async fn example() -> redactor::domain::Result<()> {
//! let config = NerConfig {
//!     enabled: true,
//!     endpoint: Some("http://localhost:8867/entities".to_string()),
//!     ..NerConfig::default()
//! };
//!
//! let tagger = HttpEntityTagger::new(&config)?;
//! let entities = tagger.tag_entities("Seen by Jane Tan").await?;
//! # Ok(())
//! # }
//! ```

pub mod ner;
pub mod ocr;
pub mod raster;

use crate::domain::ServiceError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Build the shared HTTP client used by service adapters
pub(crate) fn build_http_client(timeout_seconds: u64) -> Result<Client, ServiceError> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(timeout_seconds.min(30)))
        .build()
        .map_err(|e| ServiceError::Unavailable(format!("Failed to build HTTP client: {e}")))
}

/// Classify a transport failure
pub(crate) fn map_request_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(err.to_string())
    } else {
        ServiceError::ConnectionFailed(err.to_string())
    }
}
