//! Service credentials held with the `secrecy` crate
//!
//! API keys for the OCR and entity-tagging services are wrapped in [`SecretString`],
//! which zeroes memory on drop and redacts itself in `Debug` output. Call
//! `expose_secret()` only at the point a request header is built.
//!
//! ```rust
//! use redactor::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("ocr-api-key".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "ocr-api-key");
//! assert!(!format!("{key:?}").contains("ocr-api-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype satisfying the `Secret` trait bounds
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A zeroize-on-drop, debug-redacted string
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional string
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

/// `Bearer <key>` header value for an optional, non-empty key
pub fn bearer_header(key: Option<&SecretString>) -> Option<String> {
    use secrecy::ExposeSecret;

    key.map(|k| k.expose_secret())
        .filter(|k| !k.is_empty())
        .map(|k| format!("Bearer {}", k.as_ref()))
}
