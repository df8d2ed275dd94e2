//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{OcrProvider, RedactorConfig};
use super::secret::secret_string_opt;
use crate::domain::{CategorySet, RedactorError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RedactorConfig
/// 4. Applies environment variable overrides (REDACTOR_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RedactorError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, the TOML is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use redactor::config::load_config;
///
/// let config = load_config("redactor.toml")?;
/// println!("OCR provider: {:?}", config.ocr.provider);
/// # Ok::<(), redactor::domain::RedactorError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RedactorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RedactorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RedactorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Same as [`load_config`] for an in-memory document
pub fn load_config_from_str(contents: &str) -> Result<RedactorConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RedactorConfig = toml::from_str(&contents)
        .map_err(|e| RedactorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RedactorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RedactorError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RedactorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RedactorError::Configuration(format!("Invalid {name} value: '{value}'")))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Applies environment variable overrides using the REDACTOR_* prefix
///
/// Environment variables follow the pattern REDACTOR_<SECTION>_<KEY>,
/// for example REDACTOR_OCR_ENDPOINT or REDACTOR_RENDER_FONT_PATH.
fn apply_env_overrides(config: &mut RedactorConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("REDACTOR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Detection overrides
    if let Some(val) = env_var("REDACTOR_DETECTION_CATEGORIES") {
        config.detection.categories = CategorySet::parse_list(&val);
    }
    if let Some(val) = env_var("REDACTOR_DETECTION_PATTERN_LIBRARY") {
        config.detection.pattern_library = Some(PathBuf::from(val));
    }

    // OCR overrides
    if let Some(val) = env_var("REDACTOR_OCR_PROVIDER") {
        config.ocr.provider = match val.to_lowercase().as_str() {
            "http" => OcrProvider::Http,
            "sidecar" => OcrProvider::Sidecar,
            _ => {
                return Err(RedactorError::Configuration(format!(
                    "Invalid REDACTOR_OCR_PROVIDER: {val}"
                )))
            }
        };
    }
    if let Some(val) = env_var("REDACTOR_OCR_ENDPOINT") {
        config.ocr.endpoint = Some(val);
    }
    if let Some(val) = env_var("REDACTOR_OCR_API_KEY") {
        config.ocr.api_key = secret_string_opt(Some(val));
    }
    if let Some(val) = env_var("REDACTOR_OCR_TIMEOUT_SECONDS") {
        config.ocr.timeout_seconds = parse_env("REDACTOR_OCR_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env_var("REDACTOR_OCR_SIDECAR_PATH") {
        config.ocr.sidecar_path = Some(PathBuf::from(val));
    }

    // Entity tagger overrides
    if let Some(val) = env_var("REDACTOR_NER_ENABLED") {
        config.ner.enabled = parse_env("REDACTOR_NER_ENABLED", &val)?;
    }
    if let Some(val) = env_var("REDACTOR_NER_ENDPOINT") {
        config.ner.endpoint = Some(val);
    }
    if let Some(val) = env_var("REDACTOR_NER_API_KEY") {
        config.ner.api_key = secret_string_opt(Some(val));
    }
    if let Some(val) = env_var("REDACTOR_NER_TIMEOUT_SECONDS") {
        config.ner.timeout_seconds = parse_env("REDACTOR_NER_TIMEOUT_SECONDS", &val)?;
    }

    // Render overrides
    if let Some(val) = env_var("REDACTOR_RENDER_FONT_PATH") {
        config.render.font_path = Some(PathBuf::from(val));
    }
    if let Some(val) = env_var("REDACTOR_RENDER_FONT_SIZE") {
        config.render.font_size = parse_env("REDACTOR_RENDER_FONT_SIZE", &val)?;
    }
    if let Some(val) = env_var("REDACTOR_RENDER_LABEL_COLOR") {
        config.render.label_color = val;
    }

    // Export overrides
    if let Some(val) = env_var("REDACTOR_EXPORT_DEFAULT_DPI") {
        config.export.default_dpi = parse_env("REDACTOR_EXPORT_DEFAULT_DPI", &val)?;
    }

    // Audit overrides
    if let Some(val) = env_var("REDACTOR_AUDIT_ENABLED") {
        config.audit.enabled = parse_env("REDACTOR_AUDIT_ENABLED", &val)?;
    }
    if let Some(val) = env_var("REDACTOR_AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }
    if let Some(val) = env_var("REDACTOR_AUDIT_HASH_KEY") {
        config.audit.hash_key = secret_string_opt(Some(val));
    }

    // Logging overrides
    if let Some(val) = env_var("REDACTOR_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("REDACTOR_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_var("REDACTOR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
