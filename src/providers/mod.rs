/*!
 * Client implementations for the translation backends.
 *
 * This module contains the backends the translation service can be
 * configured with:
 * - LibreTranslate: self-hosted HTTP translation server
 * - GoogleWeb: public Google translate web endpoint, used as fallback
 * - Mock: scripted in-process backend for tests
 *
 * Backends return `Result<_, ProviderError>` so every failure is an explicit
 * value; absorbing failures into original-text fallback happens in one place,
 * the translation service.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common interface for all translation backends.
///
/// The concrete backend is selected once at configuration time; the service
/// only ever talks through this trait.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate one text span from `source` to `target`.
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or a typed error
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError>;

    /// Test the connection to the backend
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the backend is reachable
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Short backend name for logging
    fn name(&self) -> &'static str;
}

pub mod gtranslate;
pub mod libretranslate;
pub mod mock;
