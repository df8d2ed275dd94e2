//! Audit logger for redaction runs
//!
//! Fragments are recorded as HMAC-SHA256 digests under a configured key, so short
//! identifiers such as phone numbers cannot be recovered by hashing candidates.

use crate::redaction::models::{DetectedSpan, DetectionSource};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit log entry, one per processed document
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    document_id: &'a str,
    categories: Vec<&'a str>,
    line_count: usize,
    target_count: usize,
    processing_time_ms: u64,
    detections: Vec<AuditDetection<'a>>,
}

/// Audit detection entry (with hashed fragment)
#[derive(Debug, Serialize)]
struct AuditDetection<'a> {
    line_index: usize,
    label: &'a str,
    source: DetectionSource,
    /// Keyed digest of the redacted fragment; plaintext is never written
    value_hash: String,
}

/// What happened to one document
#[derive(Debug, Clone)]
pub struct DocumentAudit<'a> {
    pub document_id: &'a str,
    pub categories: Vec<&'a str>,
    pub line_count: usize,
    pub target_count: usize,
    pub processing_time_ms: u64,
    pub spans: &'a [DetectedSpan],
}

type HmacSha256 = Hmac<Sha256>;

/// Appends audit entries to a log file
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    mac: HmacSha256,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log directory if needed
    ///
    /// # Errors
    ///
    /// Fails when `hash_key` is empty or the log directory cannot be created.
    pub fn new(log_path: PathBuf, json_format: bool, hash_key: &[u8]) -> Result<Self> {
        if hash_key.is_empty() {
            bail!("Audit hash key cannot be empty");
        }
        let mac = HmacSha256::new_from_slice(hash_key)
            .map_err(|e| anyhow!("Invalid audit hash key: {e}"))?;

        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
            mac,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record one processed document
    pub fn log_document(&self, audit: &DocumentAudit<'_>) -> Result<()> {
        self.log_document_at(audit, Utc::now())
    }

    fn log_document_at(&self, audit: &DocumentAudit<'_>, timestamp: DateTime<Utc>) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: timestamp.to_rfc3339(),
            document_id: audit.document_id,
            categories: audit.categories.clone(),
            line_count: audit.line_count,
            target_count: audit.target_count,
            processing_time_ms: audit.processing_time_ms,
            detections: audit
                .spans
                .iter()
                .map(|span| AuditDetection {
                    line_index: span.line_index,
                    label: &span.label,
                    source: span.source,
                    value_hash: self.hash_value(&span.text),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Hex HMAC-SHA256 of a fragment
    fn hash_value(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }

    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Document: {} | Lines: {} | Targets: {} | Time: {}ms",
                entry.timestamp,
                entry.document_id,
                entry.line_count,
                entry.target_count,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use tempfile::tempdir;

    fn span(text: &str) -> DetectedSpan {
        DetectedSpan {
            line_index: 2,
            label: "<EMAIL>".to_string(),
            source: DetectionSource::Pattern,
            text: text.to_string(),
        }
    }

    const KEY: &[u8] = b"audit-test-key";

    #[test]
    fn test_hash_value_is_keyed() {
        let dir = tempdir().unwrap();
        let first = AuditLogger::new(dir.path().join("a.log"), true, KEY).unwrap();
        let second = AuditLogger::new(dir.path().join("b.log"), true, b"other-key").unwrap();

        assert_eq!(first.hash_value("91234567"), first.hash_value("91234567"));
        assert_ne!(first.hash_value("91234567"), first.hash_value("91234568"));
        assert_ne!(first.hash_value("91234567"), second.hash_value("91234567"));
        assert_eq!(first.hash_value("").len(), 64);

        // An unkeyed SHA-256 of the fragment must not appear
        use sha2::Digest;
        let plain = format!("{:x}", Sha256::digest(b"91234567"));
        assert_ne!(first.hash_value("91234567"), plain);
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(AuditLogger::new(dir.path().join("audit.log"), true, b"").is_err());
    }

    #[test]
    fn test_log_document_never_writes_plaintext() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, KEY).unwrap();

        let email: String = SafeEmail().fake();
        let spans = vec![span(&email)];
        logger
            .log_document(&DocumentAudit {
                document_id: "scan-001.png",
                categories: vec!["EMAIL"],
                line_count: 12,
                target_count: 1,
                processing_time_ms: 40,
                spans: &spans,
            })
            .unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("scan-001.png"));
        assert!(content.contains(&logger.hash_value(&email)));
        assert!(!content.contains(&email));

        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["detections"][0]["label"], "<EMAIL>");
        assert_eq!(entry["detections"][0]["source"], "pattern");
    }

    #[test]
    fn test_entries_are_appended() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false, KEY).unwrap();

        for id in ["a.png", "b.png"] {
            logger
                .log_document(&DocumentAudit {
                    document_id: id,
                    categories: vec![],
                    line_count: 0,
                    target_count: 0,
                    processing_time_ms: 1,
                    spans: &[],
                })
                .unwrap();
        }

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Document: b.png"));
    }
}
