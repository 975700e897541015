/*!
 * Common test utilities for the ondertitel test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A clean three-cue subtitle document
pub const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nThis is a test subtitle.\n\n2\n00:00:05,000 --> 00:00:09,000\nIt contains multiple entries.\n\n3\n00:00:10,000 --> 00:00:14,000\nFor testing purposes.\n";

/// A subtitle document with hearing-impaired artifacts in every cue
pub const HEARING_IMPAIRED_SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nJOHN: (laughs) Hello [subtitle]\n\n2\n00:00:03,000 --> 00:00:04,000\nALL CAPS LINE\n\n3\n00:00:05,000 --> 00:00:06,000\n<i>Good evening</i> {behind door}\n";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}
