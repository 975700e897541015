/*!
 * Tests for file and directory utilities
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ondertitel::file_utils::FileManager;

use crate::common;

/// The output subtitle sits next to the media file as {stem}.{lang}.srt
#[test]
fn test_subtitle_path_for_withMediaFile_shouldNameAdjacentFile() {
    let path = FileManager::subtitle_path_for(Path::new("/media/films/movie.mkv"), "nl");
    assert_eq!(path, PathBuf::from("/media/films/movie.nl.srt"));

    let path = FileManager::subtitle_path_for(Path::new("episode.s01e02.mp4"), "nl");
    assert_eq!(path, PathBuf::from("episode.s01e02.nl.srt"));
}

/// Video detection is by extension, case-insensitive
#[test]
fn test_is_video_file_withVariousExtensions_shouldMatchVideosOnly() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();

    let video = common::create_test_file(&dir_path, "movie.MKV", "x")?;
    let text = common::create_test_file(&dir_path, "notes.txt", "x")?;
    let subtitle = common::create_test_file(&dir_path, "movie.srt", "x")?;

    assert!(FileManager::is_video_file(&video));
    assert!(!FileManager::is_video_file(&text));
    assert!(!FileManager::is_video_file(&subtitle));
    assert!(!FileManager::is_video_file(dir.path()));

    Ok(())
}

/// Discovery walks directories recursively and keeps only videos
#[test]
fn test_find_media_files_withNestedDirs_shouldFindVideosRecursively() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();

    fs::create_dir_all(dir.path().join("season1"))?;
    common::create_test_file(&dir_path, "movie.mkv", "x")?;
    common::create_test_file(&dir.path().join("season1").to_path_buf(), "ep1.mp4", "x")?;
    common::create_test_file(&dir_path, "cover.jpg", "x")?;

    let mut found = FileManager::find_media_files(&[dir_path.clone()], None)?;
    found.sort();

    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|p| p.ends_with("movie.mkv")));
    assert!(found.iter().any(|p| p.ends_with("ep1.mp4")));

    Ok(())
}

/// A recent-hours window keeps freshly written files
#[test]
fn test_find_media_files_withAgeWindow_shouldKeepFreshFiles() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();
    common::create_test_file(&dir_path, "fresh.mkv", "x")?;

    // The file was just created, so any non-zero window includes it
    let found = FileManager::find_media_files(&[dir_path.clone()], Some(24))?;
    assert_eq!(found.len(), 1);

    // Zero means no age filtering at all
    let found = FileManager::find_media_files(&[dir_path], Some(0))?;
    assert_eq!(found.len(), 1);

    Ok(())
}

/// Write/read helpers round trip and create parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldCreateParents() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let nested = dir.path().join("a/b/out.srt");

    FileManager::write_to_file(&nested, "inhoud")?;
    assert_eq!(FileManager::read_to_string(&nested)?, "inhoud");

    Ok(())
}

/// Copy refuses a missing source and creates the target directory
#[test]
fn test_copy_file_withMissingSource_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let missing = dir.path().join("missing.srt");
    let target = dir.path().join("out/copy.srt");

    assert!(FileManager::copy_file(&missing, &target).is_err());

    let source = common::create_test_file(&dir.path().to_path_buf(), "in.srt", "x")?;
    FileManager::copy_file(&source, &target)?;
    assert!(target.exists());

    Ok(())
}
