use anyhow::Result;
use futures::StreamExt;
use log::warn;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::providers::TranslationBackend;
use crate::providers::gtranslate::GoogleWebTranslate;
use crate::providers::libretranslate::LibreTranslate;
use crate::providers::mock::MockTranslate;

// @module: Translation of cue text with graceful degradation

/// Translation service over the configured backend.
///
/// The backend is chosen once at configuration time and only ever addressed
/// through the [`TranslationBackend`] capability interface. The service's
/// contract toward the pipeline is that translation never fails: any provider
/// error is logged and absorbed by returning the original input text, never
/// an empty string and never an error value.
pub struct TranslationService {
    // @field: Backend implementation
    backend: Box<dyn TranslationBackend>,

    // @field: Concurrent request bound per document
    concurrency: usize,
}

impl TranslationService {
    /// Create a service from the translation configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let endpoint = config.get_endpoint();
        let timeout_secs = config.get_timeout_secs();

        let backend: Box<dyn TranslationBackend> = match config.provider {
            TranslationProvider::LibreTranslate => {
                Box::new(LibreTranslate::new(endpoint, timeout_secs))
            }
            TranslationProvider::GoogleWeb => Box::new(GoogleWebTranslate::new(
                endpoint,
                timeout_secs,
                config.get_max_chars_per_chunk(),
            )),
            TranslationProvider::Mock => Box::new(MockTranslate::new()),
        };

        Ok(TranslationService {
            backend,
            concurrency: config.get_concurrent_requests().max(1),
        })
    }

    /// Create a service around a scripted mock backend
    pub fn with_mock(client: MockTranslate, config: TranslationConfig) -> Self {
        TranslationService {
            backend: Box::new(client),
            concurrency: config.get_concurrent_requests().max(1),
        }
    }

    /// Translate one text span, or return it unchanged on any failure.
    ///
    /// Empty input short-circuits without a backend call.
    pub async fn translate_or_original(&self, text: &str, source: &str, target: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self.backend.translate(text, source, target).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => {
                warn!("{} returned empty translation, keeping original text", self.backend.name());
                text.to_string()
            }
            Err(e) => {
                warn!("Translation failed ({}), keeping original text", e);
                text.to_string()
            }
        }
    }

    /// Translate a sequence of cue bodies, preserving their order.
    ///
    /// Distinct cues are translated concurrently up to the configured bound;
    /// `buffered` yields results in input order, so position `i` of the
    /// output always corresponds to position `i` of the input.
    pub async fn translate_all(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        futures::stream::iter(texts.iter())
            .map(|text| self.translate_or_original(text, source, target))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Check the backend is reachable
    pub async fn test_connection(&self) -> Result<(), crate::errors::ProviderError> {
        self.backend.test_connection().await
    }
}
