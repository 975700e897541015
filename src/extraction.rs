use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use tokio::process::Command;

use crate::errors::ExtractionError;
use crate::language_utils::DUTCH_IDENTIFIERS;
use crate::media_probe::ProbeReport;

// @module: Ordered fallback chain for pulling a subtitle file out of a container

/// Timeout for strategies that map a single tagged or indexed stream
const TARGETED_MAP_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for ASS extraction, which needs codec conversion
const ASS_CONVERT_TIMEOUT: Duration = Duration::from_secs(90);

/// Timeout for mapping all subtitle streams at once
const GENERIC_MAP_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for the last-resort attempt with no stream selection.
/// The most expensive attempts come last and get the most time, because a
/// failure there means total extraction failure for the file.
const FINAL_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(180);

/// One extraction attempt against a media container.
///
/// Strategies are built into an ordered list per mode and evaluated in
/// sequence; the first one that produces a non-empty output file wins.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Map a stream by metadata language tag (`-map 0:s:m:language:<tag>`)
    LanguageTagMap {
        /// The tag to select on
        tag: String,
    },

    /// Map an exact stream index discovered by probing
    ProbedStreamMap {
        /// Container-relative stream index
        index: usize,
    },

    /// Map an ASS-coded stream by index and convert it to SRT
    AssConvert {
        /// Container-relative stream index
        index: usize,
    },

    /// Map the English-tagged stream suggested by the probe text
    EnglishTagMap,

    /// Map the first subtitle stream by position, forcing conversion
    FirstStreamConvert,

    /// Map all subtitle streams generically, forcing conversion
    AllStreamsConvert,

    /// Let the tool pick a default stream, forcing conversion
    DefaultConvert,
}

impl Strategy {
    /// Time budget for this attempt
    pub fn timeout(&self) -> Duration {
        match self {
            Strategy::LanguageTagMap { .. }
            | Strategy::ProbedStreamMap { .. }
            | Strategy::EnglishTagMap
            | Strategy::FirstStreamConvert => TARGETED_MAP_TIMEOUT,
            Strategy::AssConvert { .. } => ASS_CONVERT_TIMEOUT,
            Strategy::AllStreamsConvert => GENERIC_MAP_TIMEOUT,
            Strategy::DefaultConvert => FINAL_ATTEMPT_TIMEOUT,
        }
    }

    /// Where this attempt writes its output.
    ///
    /// The positional first-stream attempt writes to a sibling temp name and
    /// is renamed onto the canonical path only after validation.
    pub fn attempt_output(&self, canonical: &Path) -> PathBuf {
        match self {
            Strategy::FirstStreamConvert => canonical.with_extension("first.srt"),
            _ => canonical.to_path_buf(),
        }
    }

    /// ffmpeg arguments for this attempt
    pub fn ffmpeg_args(&self, video: &Path, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
        ];

        match self {
            Strategy::LanguageTagMap { tag } => {
                args.push("-map".to_string());
                args.push(format!("0:s:m:language:{}", tag));
            }
            Strategy::ProbedStreamMap { index } | Strategy::AssConvert { index } => {
                args.push("-map".to_string());
                args.push(format!("0:{}", index));
            }
            Strategy::EnglishTagMap => {
                args.push("-map".to_string());
                args.push("0:s:m:language:eng".to_string());
            }
            Strategy::FirstStreamConvert => {
                args.push("-map".to_string());
                args.push("0:s:0".to_string());
            }
            Strategy::AllStreamsConvert => {
                args.push("-map".to_string());
                args.push("0:s".to_string());
            }
            Strategy::DefaultConvert => {}
        }

        args.push("-c:s".to_string());
        args.push("srt".to_string());
        args.push(output.to_string_lossy().to_string());
        args
    }

    /// Short label for logging
    pub fn describe(&self) -> String {
        match self {
            Strategy::LanguageTagMap { tag } => format!("language tag '{}'", tag),
            Strategy::ProbedStreamMap { index } => format!("probed stream {}", index),
            Strategy::AssConvert { index } => format!("ASS stream {} conversion", index),
            Strategy::EnglishTagMap => "English language tag".to_string(),
            Strategy::FirstStreamConvert => "first subtitle stream".to_string(),
            Strategy::AllStreamsConvert => "all subtitle streams".to_string(),
            Strategy::DefaultConvert => "default stream selection".to_string(),
        }
    }
}

/// How one attempt ended. The chain driver inspects each outcome explicitly
/// to decide whether to continue.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The output file exists with non-zero size
    Extracted,
    /// ffmpeg could not be run or exited with an error
    ToolFailed(String),
    /// The attempt hit its time budget and was killed
    TimedOut(u64),
    /// The tool reported success but the output file is empty
    EmptyOutput,
    /// The tool reported success but wrote nothing
    MissingOutput,
}

impl AttemptOutcome {
    fn succeeded(&self) -> bool {
        matches!(self, AttemptOutcome::Extracted)
    }
}

/// Build the targeted chain for extracting an embedded Dutch track.
///
/// Tag selectors come first, in the fixed identifier order, then exact
/// index maps for any probed stream carrying a Dutch tag.
pub fn dutch_chain(probe: &ProbeReport) -> Vec<Strategy> {
    let mut chain: Vec<Strategy> = DUTCH_IDENTIFIERS
        .iter()
        .map(|tag| Strategy::LanguageTagMap { tag: (*tag).to_string() })
        .collect();

    for stream in &probe.streams {
        if stream
            .language
            .as_deref()
            .is_some_and(crate::language_utils::is_dutch_tag)
        {
            chain.push(Strategy::ProbedStreamMap { index: stream.index });
        }
    }

    chain
}

/// Build the fallback chain for extracting an English or first-available track.
///
/// ASS conversion runs before generic English matching because ASS tracks
/// need explicit codec conversion. Probe-data strategies are only added when
/// the probe actually produced data; a timed-out probe carries no
/// information, so the chain goes straight to the positional attempts.
pub fn fallback_chain(probe: &ProbeReport) -> Vec<Strategy> {
    let mut chain = Vec::new();

    if let Some(stream) = probe.ass_stream() {
        chain.push(Strategy::AssConvert { index: stream.index });
    }

    if probe.has_english_hint() {
        chain.push(Strategy::EnglishTagMap);
    }

    chain.push(Strategy::FirstStreamConvert);
    chain.push(Strategy::AllStreamsConvert);
    chain.push(Strategy::DefaultConvert);

    chain
}

/// Run an ordered strategy chain against a media file.
///
/// Attempts run strictly in sequence, never concurrently; a timeout or tool
/// failure on one attempt is swallowed and the chain moves on. Only the
/// exhaustion of every strategy is reported as an error. The authoritative
/// success signal is the output file existing with non-zero size, not the
/// tool's exit code.
pub async fn run_chain(
    video: &Path,
    output: &Path,
    strategies: &[Strategy],
) -> Result<PathBuf, ExtractionError> {
    if strategies.is_empty() {
        return Err(ExtractionError::NoStrategies);
    }

    for strategy in strategies {
        let outcome = run_attempt(video, output, strategy).await;
        if outcome.succeeded() {
            info!("Extracted subtitles via {}", strategy.describe());
            return Ok(output.to_path_buf());
        }
        debug!(
            "Extraction attempt ({}) failed: {:?}, trying next strategy",
            strategy.describe(),
            outcome
        );
    }

    Err(ExtractionError::Exhausted {
        attempts: strategies.len(),
    })
}

/// Run one attempt and validate its output
async fn run_attempt(video: &Path, canonical: &Path, strategy: &Strategy) -> AttemptOutcome {
    let attempt_output = strategy.attempt_output(canonical);
    let args = strategy.ffmpeg_args(video, &attempt_output);

    let ffmpeg_future = Command::new("ffmpeg")
        .args(&args)
        .kill_on_drop(true)
        .output();

    let result = match tokio::time::timeout(strategy.timeout(), ffmpeg_future).await {
        Ok(result) => result,
        Err(_) => {
            // Dropping the future kills the hung ffmpeg process
            let _ = std::fs::remove_file(&attempt_output);
            return AttemptOutcome::TimedOut(strategy.timeout().as_secs());
        }
    };

    let output = match result {
        Ok(output) => output,
        Err(e) => return AttemptOutcome::ToolFailed(e.to_string()),
    };

    // Exit code is advisory only; the output file decides
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output_is_usable(&attempt_output) {
            let _ = std::fs::remove_file(&attempt_output);
            return AttemptOutcome::ToolFailed(filter_ffmpeg_stderr(&stderr));
        }
    }

    match std::fs::metadata(&attempt_output) {
        Ok(meta) if meta.len() > 0 => {
            if attempt_output != canonical {
                if let Err(e) = std::fs::rename(&attempt_output, canonical) {
                    let _ = std::fs::remove_file(&attempt_output);
                    return AttemptOutcome::ToolFailed(format!("rename failed: {}", e));
                }
            }
            AttemptOutcome::Extracted
        }
        Ok(_) => {
            let _ = std::fs::remove_file(&attempt_output);
            AttemptOutcome::EmptyOutput
        }
        Err(_) => AttemptOutcome::MissingOutput,
    }
}

/// Whether the attempt output exists with non-zero size
fn output_is_usable(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// Reduce ffmpeg stderr to its meaningful lines, stripping the version
/// banner, build configuration and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error".to_string()
    } else {
        meaningful.join("\n")
    }
}
