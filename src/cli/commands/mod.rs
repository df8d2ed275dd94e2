//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod detect;
pub mod init;
pub mod redact;
pub mod validate;

use crate::adapters::raster::{DocumentType, ImageRasterizer, RasterizedPage, Rasterizer};
use crate::config::{load_config, RedactorConfig};
use crate::domain::CategorySet;
use crate::redaction::imaging::load_font;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load and validate configuration, printing the failure
///
/// Returns `None` when the command should exit with the configuration error code.
pub(crate) fn load_checked_config(config_path: &str) -> Option<RedactorConfig> {
    match load_config(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("❌ Failed to load configuration: {e}");
            None
        }
    }
}

/// Resolve `--categories`, falling back to the configured set
pub(crate) fn resolve_categories(
    cli_value: Option<&str>,
    config: &RedactorConfig,
) -> Option<CategorySet> {
    match cli_value {
        Some(list) => {
            let categories = CategorySet::parse_list(list);
            if categories.is_empty() {
                eprintln!("❌ --categories must name at least one category");
                None
            } else {
                tracing::info!(categories = %categories, "Overriding categories from CLI");
                Some(categories)
            }
        }
        None => Some(config.detection.categories.clone()),
    }
}

/// Read `input` and rasterize its first page
pub(crate) fn rasterize_input(input: &Path, config: &RedactorConfig) -> anyhow::Result<RasterizedPage> {
    let Some(doc_type) = DocumentType::from_path(input) else {
        bail!("Unrecognised document type: {}", input.display());
    };

    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read input document: {}", input.display()))?;

    let font = load_font(config.render.font_path.as_deref()).map(Arc::new);
    let rasterizer = ImageRasterizer::new(config.raster.clone(), font);
    let page = rasterizer.rasterize(&bytes, doc_type)?;

    tracing::debug!(
        input = %input.display(),
        doc_type = %doc_type,
        size = page.png_bytes.len(),
        "Rasterized input document"
    );
    Ok(page)
}

/// `<dir>/<stem>.<suffix>` next to `input`
pub(crate) fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{stem}.{suffix}"))
}

/// Identifier used in logs, reports and the audit trail
pub(crate) fn document_id(input: &Path) -> String {
    input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}
