/*!
 * Error types for the ondertitel application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * The types follow the pipeline's failure taxonomy: provider and probe errors
 * are soft failures absorbed near where they occur, an exhausted extraction
 * chain is a per-file failure counted by the orchestrator, and anything that
 * escapes to `main` is fatal.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an HTTP request fails
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a backend response fails
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// Error returned by the backend itself
    #[error("backend responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the backend
        message: String,
    },

    /// The response was well-formed but missing the translated field
    #[error("response missing translated text field")]
    MissingField,

    /// The request did not complete within the per-request timeout
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that can occur while probing a media container
#[derive(Error, Debug)]
pub enum ProbeError {
    /// ffprobe could not be spawned or exited abnormally
    #[error("ffprobe failed: {0}")]
    ToolFailed(String),

    /// The probe exceeded its time budget
    #[error("ffprobe timed out after {0} seconds")]
    Timeout(u64),

    /// ffprobe produced output that is not valid stream JSON
    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),
}

/// Errors that can occur during subtitle extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Every strategy in the chain failed to produce a usable file
    #[error("all {attempts} extraction strategies exhausted")]
    Exhausted {
        /// Number of strategies that were attempted
        attempts: usize,
    },

    /// The chain was asked to run with no strategies at all
    #[error("no extraction strategies applicable")]
    NoStrategies,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("file error: {0}")]
    File(String),

    /// Error from a translation backend
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from probing
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Error from extraction
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
