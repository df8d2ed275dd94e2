//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Redactor using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Redactor - sensitive entity redaction for scanned documents
#[derive(Parser, Debug)]
#[command(name = "redactor")]
#[command(version, about, long_about = None)]
#[command(author = "Redactor Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "redactor.toml", env = "REDACTOR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REDACTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact a document and write the redacted page image
    Redact(commands::redact::RedactArgs),

    /// Report what would be redacted without writing any image
    Detect(commands::detect::DetectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
