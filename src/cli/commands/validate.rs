//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Redactor configuration file.

use crate::config::{load_config, OcrProvider};
use crate::redaction::detector::patterns::RuleSet;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let rules = match config.detection.pattern_library.as_deref() {
            Some(path) => RuleSet::from_file(path),
            None => RuleSet::builtin(),
        };
        let rules = match rules {
            Ok(rules) => rules,
            Err(e) => {
                println!("❌ Rule library failed to load");
                println!("   Error: {e:#}");
                return Ok(2);
            }
        };

        let unknown = config.detection.categories.unrecognised(&rules.labels());
        if !unknown.is_empty() {
            println!("❌ Unknown detection categories: {}", unknown.join(", "));
            println!("   Use built-in category names or labels from the rule library");
            return Ok(2);
        }

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Categories: {}", config.detection.categories);
        println!(
            "  Rules: {} ({})",
            rules.len(),
            config
                .detection
                .pattern_library
                .as_ref()
                .map_or("built-in".to_string(), |p| p.display().to_string())
        );
        println!("  Block-list entries: {}", config.detection.block_list.len());
        match config.ocr.provider {
            OcrProvider::Http => println!(
                "  OCR: http {}",
                config.ocr.endpoint.as_deref().unwrap_or_default()
            ),
            OcrProvider::Sidecar => println!("  OCR: sidecar JSON"),
        }
        if config.ner.enabled {
            println!(
                "  Entity Tagger: {}",
                config.ner.endpoint.as_deref().unwrap_or_default()
            );
        } else {
            println!("  Entity Tagger: disabled (nothing will be detected)");
        }
        println!("  PDF DPI: {}", config.export.default_dpi);
        println!(
            "  Audit Log: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}
