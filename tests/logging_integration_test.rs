//! Integration tests for logging initialisation
//!
//! The global subscriber can only be installed once per process, so this file
//! holds a single test.

use redactor::config::LoggingConfig;
use redactor::logging::init_logging;
use tempfile::tempdir;

#[test]
fn test_file_logging_creates_directory() {
    let dir = tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_dir.to_string_lossy().into_owned(),
        local_rotation: "never".to_string(),
    };

    assert!(init_logging("verbose", &config).is_err());

    let guard = init_logging("debug", &config).unwrap();
    tracing::info!(document_id = "scan.png", "Logging smoke test");
    drop(guard);

    assert!(log_dir.is_dir());
    assert!(log_dir.join("redactor.log").exists());

    // A second global subscriber is refused
    assert!(init_logging("info", &config).is_err());
}
