/*!
 * Scripted in-process translation backend for tests.
 *
 * The mock avoids external calls entirely: it prefixes input text so tests
 * can tell translated output from pass-through, counts every call, and can
 * be scripted to fail on demand to exercise the fallback paths.
 */

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Tracks calls made against a mock backend
#[derive(Debug, Default)]
pub struct CallTracker {
    /// Number of translate calls received
    pub call_count: usize,
    /// Text of the most recent call
    pub last_text: Option<String>,
    /// Fail the next call
    pub fail_next: bool,
    /// Fail every call
    pub fail_always: bool,
}

/// Scripted translation backend
#[derive(Debug, Clone)]
pub struct MockTranslate {
    tracker: Arc<Mutex<CallTracker>>,
    prefix: String,
}

impl MockTranslate {
    /// Create a mock that prefixes translated text with `[target]: `
    pub fn new() -> Self {
        Self {
            tracker: Arc::new(Mutex::new(CallTracker::default())),
            prefix: String::new(),
        }
    }

    /// Create a mock with a fixed prefix for translated output
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(CallTracker::default())),
            prefix: prefix.into(),
        }
    }

    /// Handle to the call tracker
    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }

    /// Script the next call to fail
    pub fn fail_next_call(&self) {
        self.tracker.lock().unwrap().fail_next = true;
    }

    /// Script every call to fail
    pub fn fail_all_calls(&self) {
        self.tracker.lock().unwrap().fail_always = true;
    }
}

#[async_trait]
impl TranslationBackend for MockTranslate {
    /// Translate one text span, honoring the scripted failures
    async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String, ProviderError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.call_count += 1;
        tracker.last_text = Some(text.to_string());

        if tracker.fail_always || tracker.fail_next {
            tracker.fail_next = false;
            return Err(ProviderError::RequestFailed("scripted failure".to_string()));
        }

        if self.prefix.is_empty() {
            Ok(format!("[{}] {}", target, text))
        } else {
            Ok(format!("{}{}", self.prefix, text))
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

impl Default for MockTranslate {
    fn default() -> Self {
        Self::new()
    }
}
