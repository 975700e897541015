use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};
use serde_json::{Value, from_str};
use tokio::process::Command;

use crate::errors::ProbeError;
use crate::language_utils;

// @module: Read-only inspection of a media container's subtitle streams

/// Time budget for one ffprobe invocation
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Descriptor for one subtitle stream found in a container
#[derive(Debug, Clone)]
pub struct SubtitleStream {
    // @field: Container-relative stream index
    pub index: usize,

    // @field: Codec name as reported by ffprobe
    pub codec_name: String,

    // @field: Language tag, often absent or unreliable
    pub language: Option<String>,
}

/// How a probe call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// ffprobe ran to completion; the stream list is trustworthy
    Complete,
    /// The probe hit its time budget; the stream list carries no information
    TimedOut,
    /// ffprobe failed to run or produced garbage; same as TimedOut for callers
    Failed,
}

/// Result of probing one media file
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Subtitle streams found in the container
    pub streams: Vec<SubtitleStream>,

    /// Raw ffprobe stdout, kept for textual hint matching
    pub raw: String,

    /// Whether the probe completed or was cut short
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    /// An empty report standing in for a probe that yielded no information
    pub fn empty(outcome: ProbeOutcome) -> Self {
        ProbeReport {
            streams: Vec::new(),
            raw: String::new(),
            outcome,
        }
    }

    /// Whether the probe completed and the container holds no subtitle streams
    pub fn confirmed_empty(&self) -> bool {
        self.outcome == ProbeOutcome::Complete && self.streams.is_empty()
    }

    /// Whether stream metadata can be trusted for targeted strategies
    pub fn has_stream_data(&self) -> bool {
        self.outcome == ProbeOutcome::Complete && !self.streams.is_empty()
    }

    /// First stream whose language tag denotes Dutch
    pub fn dutch_stream(&self) -> Option<&SubtitleStream> {
        self.streams.iter().find(|s| {
            s.language
                .as_deref()
                .is_some_and(language_utils::is_dutch_tag)
        })
    }

    /// Whether any stream carries a Dutch language tag
    pub fn has_dutch(&self) -> bool {
        self.dutch_stream().is_some()
    }

    /// First stream coded as ASS, which needs explicit conversion to SRT
    pub fn ass_stream(&self) -> Option<&SubtitleStream> {
        self.streams.iter().find(|s| s.codec_name == "ass")
    }

    /// Whether the raw probe text hints at an English subtitle track
    pub fn has_english_hint(&self) -> bool {
        language_utils::has_english_hint(&self.raw)
    }
}

/// Probe the subtitle streams of a media file.
///
/// Runs `ffprobe -select_streams s` with JSON output under [`PROBE_TIMEOUT`].
/// An empty container yields an empty stream list, not an error.
pub async fn probe_subtitle_streams<P: AsRef<Path>>(video_path: P) -> Result<ProbeReport, ProbeError> {
    let video_path = video_path.as_ref();

    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "s",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let output = match tokio::time::timeout(PROBE_TIMEOUT, ffprobe_future).await {
        Ok(result) => result.map_err(|e| ProbeError::ToolFailed(e.to_string()))?,
        Err(_) => return Err(ProbeError::Timeout(PROBE_TIMEOUT.as_secs())),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::ToolFailed(stderr.trim().to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();

    if stdout.trim().is_empty() {
        return Ok(ProbeReport {
            streams: Vec::new(),
            raw: stdout,
            outcome: ProbeOutcome::Complete,
        });
    }

    let json: Value = from_str(&stdout).map_err(|e| ProbeError::ParseError(e.to_string()))?;
    let streams = parse_streams(&json);

    Ok(ProbeReport {
        streams,
        raw: stdout,
        outcome: ProbeOutcome::Complete,
    })
}

/// Probe a media file, absorbing every failure into an empty report.
///
/// Probing failure is non-fatal throughout the pipeline: a timeout or tool
/// error is treated as "no information" and must never surface upward.
pub async fn probe_or_empty<P: AsRef<Path>>(video_path: P) -> ProbeReport {
    let video_path = video_path.as_ref();
    match probe_subtitle_streams(video_path).await {
        Ok(report) => {
            debug!(
                "Probe found {} subtitle stream(s) in {:?}",
                report.streams.len(),
                video_path.file_name().unwrap_or_default()
            );
            report
        }
        Err(ProbeError::Timeout(secs)) => {
            warn!("Timeout while probing subtitle streams ({}s), continuing without stream data", secs);
            ProbeReport::empty(ProbeOutcome::TimedOut)
        }
        Err(e) => {
            warn!("Probe failed ({}), continuing without stream data", e);
            ProbeReport::empty(ProbeOutcome::Failed)
        }
    }
}

/// Walk the ffprobe JSON and pull out the stream descriptors
fn parse_streams(json: &Value) -> Vec<SubtitleStream> {
    let mut streams = Vec::new();

    if let Some(entries) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in entries.iter() {
            let index = stream
                .get("index")
                .and_then(|v| v.as_u64())
                .map(|v| v as usize)
                .unwrap_or(0);

            let codec_name = stream
                .get("codec_name")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");

            let language = stream
                .get("tags")
                .and_then(|t| t.get("language"))
                .and_then(|l| l.as_str())
                .map(|s| s.to_string());

            streams.push(SubtitleStream {
                index,
                codec_name: codec_name.to_string(),
                language,
            });
        }
    }

    streams
}
