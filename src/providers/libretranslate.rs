use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Client for a self-hosted LibreTranslate server.
///
/// One request is issued per cue body, each under the fixed per-request
/// timeout; there is no batching.
#[derive(Debug)]
pub struct LibreTranslate {
    /// HTTP client with the per-request timeout baked in
    client: Client,
    /// Base URL of the server, e.g. `http://localhost:5000`
    base_url: String,
    /// Timeout seconds, kept for error reporting
    timeout_secs: u64,
}

/// Translation request body
#[derive(Debug, Serialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub q: String,

    /// Source language code
    pub source: String,

    /// Target language code
    pub target: String,

    /// Payload format, always "text"
    pub format: String,
}

/// Translation response body
#[derive(Debug, Deserialize)]
pub struct TranslationResponse {
    /// The translated text; a well-formed error response omits it
    #[serde(rename = "translatedText")]
    pub translated_text: Option<String>,
}

impl LibreTranslate {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    /// Translate one text span.
    ///
    /// Success is HTTP 200 with a `translatedText` field; anything else is a
    /// typed error for the caller to absorb.
    async fn request_translation(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let url = format!("{}/translate", self.base_url.trim_end_matches('/'));

        let body = TranslationRequest {
            q: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            format: "text".to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let parsed: TranslationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        parsed.translated_text.ok_or(ProviderError::MissingField)
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslate {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        self.request_translation(text, source, target).await
    }

    /// Check the server is reachable by listing its language pairs
    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/languages", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "languages endpoint not available".to_string(),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "LibreTranslate"
    }
}
