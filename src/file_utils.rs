use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

// @module: File and directory utilities

/// Video container extensions the pipeline will pick up
const VIDEO_EXTENSIONS: [&str; 8] = ["mp4", "mkv", "avi", "mov", "wmv", "m4v", "flv", "webm"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Whether a path looks like a video container by extension
    pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        if !path.is_file() {
            return false;
        }
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                VIDEO_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// The subtitle path adjacent to a media file: `{stem}.{lang}.srt`
    pub fn subtitle_path_for<P: AsRef<Path>>(media_file: P, lang_code: &str) -> PathBuf {
        let media_file = media_file.as_ref();
        let stem = media_file.file_stem().unwrap_or_default().to_string_lossy();
        let file_name = format!("{}.{}.srt", stem, lang_code);

        match media_file.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Find all video files under the given directories, recursively.
    ///
    /// With `max_age_hours` set, only files modified within that window are
    /// returned; zero means no age filter, matching the original tool's
    /// `--hours 0` behavior.
    pub fn find_media_files(directories: &[PathBuf], max_age_hours: Option<u64>) -> Result<Vec<PathBuf>> {
        let cutoff: Option<SystemTime> = match max_age_hours {
            Some(hours) if hours > 0 => {
                let cutoff_local = Local::now() - ChronoDuration::hours(hours as i64);
                Some(SystemTime::from(cutoff_local))
            }
            _ => None,
        };

        let mut found = Vec::new();
        for directory in directories {
            for entry in WalkDir::new(directory).follow_links(true).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if !Self::is_video_file(path) {
                    continue;
                }

                if let Some(cutoff) = cutoff {
                    let mtime = fs::metadata(path)
                        .and_then(|m| m.modified())
                        .unwrap_or(SystemTime::UNIX_EPOCH);
                    if mtime < cutoff {
                        continue;
                    }
                }

                found.push(path.to_path_buf());
            }
        }

        Ok(found)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)?;

        Ok(())
    }
}
