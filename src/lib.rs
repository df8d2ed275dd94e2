// Redactor - Sensitive Entity Redaction for Scanned Documents
// Copyright (c) 2025 Redactor Contributors
// Licensed under the MIT License

//! # Redactor - Sensitive Entity Redaction for Scanned Documents
//!
//! Redactor finds personal information in scanned documents and paints it out. It
//! takes a page image, reads its text lines through an OCR service, detects sensitive
//! spans in each line, projects them back to pixel boxes and draws a white box with a
//! category label over each one.
//!
//! ## Overview
//!
//! Detection combines three sources per OCR line:
//! - **Address heuristic**: everything after `address:` on a line
//! - **Entity tagger**: PERSON and place entities from an external model, filtered by
//!   a block-list and address context
//! - **Pattern rules**: context-gated regular expressions for NRIC/FIN, MCR no.,
//!   EMAIL, PHONE, DATE and ID_NUMBER
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`redaction`] - Detection, projection, rendering, export, audit
//! - [`adapters`] - External boundaries (OCR, entity tagging, rasterization)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redactor::adapters::ocr::SidecarTextDetector;
//! use redactor::adapters::raster::RasterizedPage;
//! use redactor::config::load_config;
//! use redactor::redaction::{ProcessOptions, RedactionEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("redactor.toml")?;
//!     let detector = Arc::new(SidecarTextDetector::new("scan.png.ocr.json"));
//!     let engine = RedactionEngine::from_config(&config, Some(detector))?;
//!
//!     let page = RasterizedPage { png_bytes: std::fs::read("scan.png")?, dpi: None };
//!     let outcome = engine
//!         .process_document("scan.png", page, None, ProcessOptions::default())
//!         .await;
//!
//!     if let Some(png) = outcome.redacted_png {
//!         std::fs::write("scan.redacted.png", png)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible library calls return [`domain::RedactorError`]. The engine's stage
//! methods are soft-fail: a failing OCR, render or export call is logged and comes
//! back as `None`, so earlier artifacts stay usable.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod redaction;
