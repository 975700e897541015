use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), the language of the extracted track
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO) used for translation and output naming
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Whether hearing-impaired annotations are stripped from cue text
    #[serde(default = "default_true")]
    pub clean_hearing_impaired: bool,

    /// Maximum number of media files processed concurrently
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Self-hosted LibreTranslate server
    #[default]
    LibreTranslate,
    // @provider: Public Google translate web endpoint (fallback)
    GoogleWeb,
    // @provider: Scripted in-process backend for tests
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::LibreTranslate => "LibreTranslate",
            Self::GoogleWeb => "Google Web",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::LibreTranslate => "libretranslate".to_string(),
            Self::GoogleWeb => "googleweb".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "libretranslate" | "libre" => Ok(Self::LibreTranslate),
            "googleweb" | "google" => Ok(Self::GoogleWeb),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Per-request timeout seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max concurrent requests per document
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Max chars per chunk (chunking backends only)
    #[serde(default = "default_max_chars_per_chunk")]
    pub max_chars_per_chunk: usize,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::LibreTranslate => Self {
                provider_type: "libretranslate".to_string(),
                endpoint: default_libretranslate_endpoint(),
                timeout_secs: default_request_timeout_secs(),
                concurrent_requests: default_concurrent_requests(),
                max_chars_per_chunk: default_max_chars_per_chunk(),
            },
            TranslationProvider::GoogleWeb => Self {
                provider_type: "googleweb".to_string(),
                endpoint: default_googleweb_endpoint(),
                timeout_secs: default_request_timeout_secs(),
                concurrent_requests: default_concurrent_requests(),
                max_chars_per_chunk: default_max_chars_per_chunk(),
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                endpoint: String::new(),
                timeout_secs: default_request_timeout_secs(),
                concurrent_requests: default_concurrent_requests(),
                max_chars_per_chunk: default_max_chars_per_chunk(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::LibreTranslate => default_libretranslate_endpoint(),
            TranslationProvider::GoogleWeb => default_googleweb_endpoint(),
            TranslationProvider::Mock => String::new(),
        }
    }

    /// Get the per-request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_request_timeout_secs()
    }

    /// Get the concurrent request bound for the active provider
    pub fn get_concurrent_requests(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.concurrent_requests > 0 {
                return provider_config.concurrent_requests;
            }
        }

        default_concurrent_requests()
    }

    /// Get the chunk threshold for the active provider
    pub fn get_max_chars_per_chunk(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.max_chars_per_chunk > 0 {
                return provider_config.max_chars_per_chunk;
            }
        }

        default_max_chars_per_chunk()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
        };

        // Add default providers
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::LibreTranslate));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::GoogleWeb));

        config
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "nl".to_string()
}

fn default_concurrent_files() -> usize {
    2
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_chars_per_chunk() -> usize {
    5000
}

fn default_true() -> bool {
    true
}

fn default_libretranslate_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_googleweb_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.concurrent_files == 0 {
            return Err(anyhow!("concurrent_files must be at least 1"));
        }

        // The mock backend carries no endpoint; the HTTP backends need a valid one
        if self.translation.provider != TranslationProvider::Mock {
            let endpoint = self.translation.get_endpoint();
            Url::parse(&endpoint)
                .map_err(|e| anyhow!("Invalid endpoint '{}' for provider {}: {}", endpoint, self.translation.provider, e))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            clean_hearing_impaired: true,
            concurrent_files: default_concurrent_files(),
            log_level: LogLevel::default(),
        }
    }
}
