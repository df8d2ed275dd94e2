//! Configuration schema types
//!
//! This module defines the configuration structure for Redactor.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use crate::domain::CategorySet;
use crate::redaction::lexicon::{DEFAULT_ADDRESS_CONTEXT_WORDS, DEFAULT_BLOCK_LIST};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Redactor configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Which categories to detect and the vocabulary the detectors use
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Text detection (OCR) service
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Entity-tagging service
    #[serde(default)]
    pub ner: NerConfig,

    /// Redaction drawing
    #[serde(default)]
    pub render: RenderConfig,

    /// Text document rasterization
    #[serde(default)]
    pub raster: RasterConfig,

    /// PDF export
    #[serde(default)]
    pub export: ExportConfig,

    /// Audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RedactorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection.validate()?;
        self.ocr.validate()?;
        self.ner.validate()?;
        self.render.validate()?;
        self.raster.validate()?;
        self.export.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Categories requested when the caller does not pass any
    #[serde(default = "CategorySet::all")]
    pub categories: CategorySet,

    /// Custom rule library (TOML); replaces the built-in rules
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Lowercased strings that veto model-sourced entities
    #[serde(default = "default_block_list")]
    pub block_list: Vec<String>,

    /// Words that mark a line as address-like
    #[serde(default = "default_address_context_words")]
    pub address_context_words: Vec<String>,
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err("detection.categories cannot be empty".to_string());
        }

        if let Some(ref path) = self.pattern_library {
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "detection.pattern_library must be a TOML file: {}",
                    path.display()
                ));
            }
        }

        if self.address_context_words.iter().any(|w| w.trim().is_empty()) {
            return Err("detection.address_context_words cannot contain empty entries".to_string());
        }

        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            categories: CategorySet::all(),
            pattern_library: None,
            block_list: default_block_list(),
            address_context_words: default_address_context_words(),
        }
    }
}

/// OCR provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Remote HTTP text detection service
    Http,
    /// Precomputed OCR JSON next to the input document
    #[default]
    Sidecar,
}

/// Text detection (OCR) service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default)]
    pub provider: OcrProvider,

    /// Endpoint URL for the HTTP provider
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer key for the HTTP provider
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Explicit OCR JSON file for the sidecar provider; defaults to `<input>.ocr.json`
    #[serde(default)]
    pub sidecar_path: Option<PathBuf>,
}

impl OcrConfig {
    fn validate(&self) -> Result<(), String> {
        if self.provider == OcrProvider::Http {
            match self.endpoint.as_deref() {
                None | Some("") => {
                    return Err("ocr.endpoint is required when ocr.provider = 'http'".to_string())
                }
                Some(endpoint) => validate_endpoint("ocr.endpoint", endpoint)?,
            }
        }

        if self.timeout_seconds == 0 {
            return Err("ocr.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: OcrProvider::Sidecar,
            endpoint: None,
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            sidecar_path: None,
        }
    }
}

/// Entity-tagging service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    /// When disabled, no detection runs at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub endpoint: Option<String>,

    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl NerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled {
            match self.endpoint.as_deref() {
                None | Some("") => {
                    return Err("ner.endpoint is required when ner.enabled = true".to_string())
                }
                Some(endpoint) => validate_endpoint("ner.endpoint", endpoint)?,
            }
        }

        if self.timeout_seconds == 0 {
            return Err("ner.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Redaction drawing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// TrueType/OpenType font for labels; a system font is searched when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    #[serde(default = "default_label_font_size")]
    pub font_size: f32,

    /// `#RRGGBB`
    #[serde(default = "default_label_color")]
    pub label_color: String,

    /// Pixel offset of the label from the box's top-left corner
    #[serde(default = "default_label_offset")]
    pub label_offset: i32,
}

impl RenderConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.font_size > 0.0) {
            return Err("render.font_size must be > 0".to_string());
        }

        let hex = self.label_color.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "Invalid render.label_color '{}'. Expected #RRGGBB",
                self.label_color
            ));
        }

        if self.label_offset < 0 {
            return Err("render.label_offset must be >= 0".to_string());
        }

        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: default_label_font_size(),
            label_color: default_label_color(),
            label_offset: default_label_offset(),
        }
    }
}

/// Text document rasterization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterConfig {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    #[serde(default = "default_padding")]
    pub padding: u32,

    #[serde(default = "default_raster_font_size")]
    pub font_size: f32,
}

impl RasterConfig {
    fn validate(&self) -> Result<(), String> {
        if self.canvas_width <= self.padding * 2 {
            return Err("raster.canvas_width must exceed twice raster.padding".to_string());
        }
        if !(self.font_size > 0.0) {
            return Err("raster.font_size must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            padding: default_padding(),
            font_size: default_raster_font_size(),
        }
    }
}

/// PDF export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// DPI used when the rasterized page carries none
    #[serde(default = "default_dpi")]
    pub default_dpi: f32,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.default_dpi > 0.0) {
            return Err("export.default_dpi must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_dpi: default_dpi(),
        }
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// JSON lines when true, one summary line per document otherwise
    #[serde(default = "default_true")]
    pub json_format: bool,

    /// HMAC key for fragment hashes; required when audit is enabled
    #[serde(default)]
    pub hash_key: Option<SecretString>,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        if self
            .hash_key
            .as_ref()
            .map_or(true, |key| key.expose_secret().is_empty())
        {
            return Err(
                "audit.hash_key is required when audit is enabled (or set REDACTOR_AUDIT_HASH_KEY)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
            hash_key: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_endpoint(field: &str, endpoint: &str) -> Result<(), String> {
    let parsed = url::Url::parse(endpoint).map_err(|e| format!("Invalid {field}: {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_block_list() -> Vec<String> {
    DEFAULT_BLOCK_LIST.iter().map(|s| s.to_string()).collect()
}

fn default_address_context_words() -> Vec<String> {
    DEFAULT_ADDRESS_CONTEXT_WORDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_label_font_size() -> f32 {
    18.0
}

fn default_label_color() -> String {
    "#FF0000".to_string()
}

fn default_label_offset() -> i32 {
    2
}

fn default_canvas_width() -> u32 {
    1200
}

fn default_padding() -> u32 {
    50
}

fn default_raster_font_size() -> f32 {
    24.0
}

fn default_dpi() -> f32 {
    200.0
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/redaction.log")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_default_values() {
        let config = RedactorConfig::default();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.detection.categories.len(), 8);
        assert_eq!(config.ocr.provider, OcrProvider::Sidecar);
        assert!(!config.ner.enabled);
        assert_eq!(config.render.font_size, 18.0);
        assert_eq!(config.render.label_color, "#FF0000");
        assert_eq!(config.render.label_offset, 2);
        assert_eq!(config.raster.canvas_width, 1200);
        assert_eq!(config.raster.padding, 50);
        assert_eq!(config.export.default_dpi, 200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_ocr_requires_endpoint() {
        let mut config = OcrConfig {
            provider: OcrProvider::Http,
            ..OcrConfig::default()
        };
        assert!(config.validate().is_err());

        config.endpoint = Some("ftp://ocr.local".to_string());
        assert!(config.validate().is_err());

        config.endpoint = Some("http://localhost:8866/ocr".to_string());
        config.api_key = Some(secret_string("k".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_ner_requires_endpoint() {
        let mut config = NerConfig {
            enabled: true,
            ..NerConfig::default()
        };
        assert!(config.validate().is_err());

        config.endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.endpoint = Some("https://ner.example.com/tag".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_render_config_validation() {
        let mut config = RenderConfig::default();
        config.label_color = "red".to_string();
        assert!(config.validate().is_err());

        config.label_color = "#00ff7f".to_string();
        assert!(config.validate().is_ok());

        config.font_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_raster_and_export_validation() {
        let raster = RasterConfig {
            canvas_width: 80,
            ..RasterConfig::default()
        };
        assert!(raster.validate().is_err());

        let export = ExportConfig { default_dpi: 0.0 };
        assert!(export.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
        config.local_rotation = "hourly".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_categories_rejected() {
        let config = DetectionConfig {
            categories: CategorySet::new(),
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RedactorConfig = toml::from_str(
            r#"
[detection]
categories = ["PHONE", "EMAIL"]

[render]
font_size = 14.0
"#,
        )
        .unwrap();
        assert_eq!(config.detection.categories.len(), 2);
        assert_eq!(config.render.font_size, 14.0);
        assert_eq!(config.render.label_offset, 2);
        assert_eq!(config.detection.block_list.len(), DEFAULT_BLOCK_LIST.len());
    }
}
