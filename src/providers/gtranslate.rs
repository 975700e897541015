use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Client for the public Google translate web endpoint.
///
/// This is the fallback backend when no self-hosted server is available. The
/// `translate_a/single?client=gtx` endpoint is the one the unofficial
/// translation libraries use; it answers with a nested JSON array of
/// translated segments rather than an object.
///
/// The endpoint rejects over-long inputs, so anything beyond the chunk
/// threshold is split into sequential pieces translated independently and
/// joined with a single space. A failed piece degrades to its original text
/// without failing the whole span.
#[derive(Debug)]
pub struct GoogleWebTranslate {
    /// HTTP client with the per-request timeout baked in
    client: Client,
    /// Base URL, overridable for tests
    base_url: String,
    /// Timeout seconds, kept for error reporting
    timeout_secs: u64,
    /// Inputs longer than this many characters are chunked
    max_chunk_chars: usize,
}

impl GoogleWebTranslate {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, max_chunk_chars: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            timeout_secs,
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    /// Translate a single piece, without chunking
    async fn translate_piece(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
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

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_translation(&body)
    }

    /// Pull the translated text out of the nested segment array.
    ///
    /// The response shape is `[[["<translated>", "<original>", ...], ...], ...]`;
    /// the first elements of the inner segments concatenate to the full
    /// translation.
    fn extract_translation(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or(ProviderError::MissingField)?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(piece);
            }
        }

        if translated.is_empty() {
            return Err(ProviderError::MissingField);
        }

        Ok(translated)
    }
}

#[async_trait]
impl TranslationBackend for GoogleWebTranslate {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        if text.chars().count() <= self.max_chunk_chars {
            return self.translate_piece(text, source, target).await;
        }

        let chunks = chunk_text(text, self.max_chunk_chars);
        debug!("Splitting {} chars into {} chunks for translation", text.len(), chunks.len());

        let mut translated_chunks = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            match self.translate_piece(chunk, source, target).await {
                Ok(translated) => translated_chunks.push(translated),
                Err(e) => {
                    warn!("Chunk translation failed ({}), keeping original chunk", e);
                    translated_chunks.push(chunk.clone());
                }
            }
        }

        Ok(translated_chunks.join(" "))
    }

    fn name(&self) -> &'static str {
        "Google Web"
    }
}

/// Split text into pieces of at most `max_chars` characters, on character
/// boundaries, preserving order.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() || max_chars == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
