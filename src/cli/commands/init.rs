//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "redactor.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Redactor configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point [ner] at your entity-tagging service");
                println!("  3. Choose an OCR provider: http service or sidecar JSON");
                println!("  4. Validate configuration: redactor validate-config");
                println!("  5. Preview findings: redactor detect scan.png");
                println!("  6. Redact: redactor redact scan.png --pdf");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r##"# Redactor Configuration File

[application]
log_level = "info"

[detection]
categories = ["PERSON", "NRIC/FIN", "MCR no.", "EMAIL", "PHONE", "ADDRESS", "DATE", "ID_NUMBER"]

[ocr]
provider = "sidecar"

[ner]
enabled = true
endpoint = "http://localhost:8867/entities"
# api_key = "${REDACTOR_NER_KEY}"

[render]
font_size = 18
label_color = "#FF0000"

[export]
default_dpi = 200

[audit]
enabled = false

[logging]
local_enabled = false
"##
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r##"# Redactor Configuration File
#
# This file contains all configuration options with examples and explanations.
# Values of the form ${VAR} are substituted from the environment, and any key can
# be overridden with REDACTOR_<SECTION>_<KEY> (e.g. REDACTOR_NER_ENDPOINT).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Detection
# ============================================================================
[detection]
# Categories redacted when --categories is not given
categories = ["PERSON", "NRIC/FIN", "MCR no.", "EMAIL", "PHONE", "ADDRESS", "DATE", "ID_NUMBER"]

# Optional custom rule library; replaces the built-in rules
# pattern_library = "patterns/custom_rules.toml"

# Lowercased words that veto entities reported by the tagger
# block_list = ["patient", "doctor", "medical", "report"]

# Words that mark a line as address-like
# address_context_words = ["address:", "road", "street", "avenue", "singapore"]

# ============================================================================
# Text Detection (OCR)
# ============================================================================
[ocr]
# "http" posts the page image to a service; "sidecar" reads <input>.ocr.json
provider = "sidecar"

# endpoint = "http://localhost:8866/ocr"
# api_key = "${REDACTOR_OCR_KEY}"
timeout_seconds = 60

# Fixed OCR JSON path for the sidecar provider
# sidecar_path = "scans/page.ocr.json"

# ============================================================================
# Entity Tagging
# ============================================================================
[ner]
# Without a tagger nothing is detected, pattern rules included
enabled = true
endpoint = "http://localhost:8867/entities"
# Sent as a bearer token when set
# api_key = "${REDACTOR_NER_KEY}"
timeout_seconds = 60

# ============================================================================
# Rendering
# ============================================================================
[render]
# TrueType/OpenType font for labels; a system font is used when unset
# font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
font_size = 18
label_color = "#FF0000"
label_offset = 2

# ============================================================================
# Text Document Rasterization
# ============================================================================
[raster]
canvas_width = 1200
padding = 50
font_size = 24

# ============================================================================
# PDF Export
# ============================================================================
[export]
# Used when the rasterized page carries no DPI
default_dpi = 200

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
# One entry per document; detected text is stored only as an HMAC-SHA256 digest
enabled = false
log_path = "./audit/redaction.log"
json_format = true
# Required when enabled
# hash_key = "${REDACTOR_AUDIT_HASH_KEY}"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"##
        .to_string()
    }
}
