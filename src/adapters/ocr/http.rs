//! HTTP text detection client
//!
//! Posts `{ "image": "<base64 PNG/JPEG>" }` and parses the response with
//! [`parse_ocr_json`](super::parse_ocr_json).

use super::{parse_ocr_json, TextDetector};
use crate::adapters::{build_http_client, map_request_error};
use crate::config::{bearer_header, OcrConfig, SecretString};
use crate::domain::{RedactorError, Result, ServiceError, TextLine};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

/// Text detector backed by an HTTP OCR service
pub struct HttpTextDetector {
    endpoint: String,
    client: Client,
    api_key: Option<SecretString>,
}

impl HttpTextDetector {
    /// Create a detector from the `[ocr]` section
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Ocr`] when no endpoint is configured or the HTTP
    /// client cannot be built.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                RedactorError::Ocr(ServiceError::Unavailable(
                    "ocr.endpoint is not configured".to_string(),
                ))
            })?;

        let client = build_http_client(config.timeout_seconds).map_err(RedactorError::Ocr)?;

        Ok(Self {
            endpoint,
            client,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl TextDetector for HttpTextDetector {
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextLine>> {
        let encoded = general_purpose::STANDARD.encode(image);

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "image": encoded }));

        if let Some(auth) = bearer_header(self.api_key.as_ref()) {
            request = request.header("Authorization", auth);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RedactorError::Ocr(map_request_error(e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RedactorError::Ocr(ServiceError::from_status(
                status.as_u16(),
                body,
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| RedactorError::Ocr(ServiceError::InvalidResponse(e.to_string())))?;

        let lines = parse_ocr_json(&body)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            line_count = lines.len(),
            "OCR service returned text lines"
        );
        Ok(lines)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrProvider;
    use mockito::Matcher;

    fn config(endpoint: String) -> OcrConfig {
        OcrConfig {
            provider: OcrProvider::Http,
            endpoint: Some(endpoint),
            ..OcrConfig::default()
        }
    }

    #[tokio::test]
    async fn test_detect_text_sends_base64_image() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ocr")
            .match_body(Matcher::Json(serde_json::json!({ "image": "AQID" })))
            .with_status(200)
            .with_body(r#"[[[[0,0],[80,0],[80,20],[0,20]],"Call 91234567 now",0.9]]"#)
            .create_async()
            .await;

        let detector = HttpTextDetector::new(&config(format!("{}/ocr", server.url()))).unwrap();
        let lines = detector.detect_text(&[1, 2, 3]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Call 91234567 now");
    }

    #[tokio::test]
    async fn test_client_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/ocr")
            .with_status(413)
            .with_body("image too large")
            .create_async()
            .await;

        let detector = HttpTextDetector::new(&config(format!("{}/ocr", server.url()))).unwrap();
        let err = detector.detect_text(&[0]).await.unwrap_err();
        match err {
            RedactorError::Ocr(ServiceError::ClientError { status, message }) => {
                assert_eq!(status, 413);
                assert_eq!(message, "image too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_failure() {
        let detector = HttpTextDetector::new(&config("http://127.0.0.1:1/ocr".to_string())).unwrap();
        let err = detector.detect_text(&[0]).await.unwrap_err();
        assert!(matches!(
            err,
            RedactorError::Ocr(ServiceError::ConnectionFailed(_))
        ));
    }
}
