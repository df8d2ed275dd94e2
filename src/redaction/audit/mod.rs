//! Audit logging module
//!
//! Provides a structured audit trail of redaction runs without recording plaintext.

pub mod logger;

pub use logger::AuditLogger;
