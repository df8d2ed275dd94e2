//! HTTP entity-tagging client
//!
//! Sends one line of text per request:
//!
//! ```json
//! { "text": "Seen by Jane Tan" }
//! ```
//!
//! and expects character-offset spans back:
//!
//! ```json
//! { "entities": [ { "start": 8, "end": 16, "label": "PERSON" } ] }
//! ```
//!
//! `start_char`/`end_char` are accepted in place of `start`/`end`.

use super::{EntityKind, EntityTagger, TaggedEntity};
use crate::adapters::{build_http_client, map_request_error};
use crate::config::{bearer_header, NerConfig, SecretString};
use crate::domain::{RedactorError, Result, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TagResponse {
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    #[serde(alias = "start_char")]
    start: usize,
    #[serde(alias = "end_char")]
    end: usize,
    #[serde(alias = "label_")]
    label: String,
}

/// Entity tagger backed by an HTTP service
pub struct HttpEntityTagger {
    endpoint: String,
    client: Client,
    api_key: Option<SecretString>,
}

impl HttpEntityTagger {
    /// Create a tagger from the `[ner]` section
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Tagger`] with [`ServiceError::Unavailable`] when no
    /// endpoint is configured or the HTTP client cannot be built.
    pub fn new(config: &NerConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                RedactorError::Tagger(ServiceError::Unavailable(
                    "ner.endpoint is not configured".to_string(),
                ))
            })?;

        let client = build_http_client(config.timeout_seconds).map_err(RedactorError::Tagger)?;

        Ok(Self {
            endpoint,
            client,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EntityTagger for HttpEntityTagger {
    async fn tag_entities(&self, text: &str) -> Result<Vec<TaggedEntity>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }));

        if let Some(auth) = bearer_header(self.api_key.as_ref()) {
            request = request.header("Authorization", auth);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RedactorError::Tagger(map_request_error(e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RedactorError::Tagger(ServiceError::from_status(
                status.as_u16(),
                body,
            )));
        }

        let parsed: TagResponse = resp.json().await.map_err(|e| {
            RedactorError::Tagger(ServiceError::InvalidResponse(e.to_string()))
        })?;

        tracing::trace!(count = parsed.entities.len(), "Entity tagger response");

        Ok(parsed
            .entities
            .into_iter()
            .map(|raw| TaggedEntity::new(raw.start, raw.end, EntityKind::from_label(&raw.label)))
            .collect())
    }

    fn name(&self) -> &str {
        "http"
    }
}
