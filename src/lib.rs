/*!
 * # ondertitel
 *
 * A Rust library for acquiring Dutch subtitles for video files.
 *
 * ## Features
 *
 * - Probe video containers for embedded subtitle streams
 * - Extract an embedded Dutch track when one exists
 * - Fall back to extracting an English (or first-available) track through an
 *   ordered, timeout-bounded strategy chain
 * - Strip hearing-impaired annotations from cue text
 * - Machine-translate extracted subtitles with graceful degradation:
 *   - LibreTranslate (self-hosted server)
 *   - Google web endpoint (fallback)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `media_probe`: Read-only container stream inspection
 * - `extraction`: Ordered extraction strategy chain
 * - `subtitle_document`: Subtitle document model and hearing-impaired cleanup
 * - `translation_service`: Translation with original-text fallback
 * - `providers`: Clients for the translation backends
 * - `app_controller`: Per-file orchestration state machine
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod media_probe;
pub mod providers;
pub mod subtitle_document;
pub mod translation_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, PipelineOutcome, RunSummary};
pub use errors::{AppError, ExtractionError, ProbeError, ProviderError};
pub use subtitle_document::{Cue, SubtitleDocument};
pub use translation_service::TranslationService;
