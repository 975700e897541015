use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use tempfile::TempDir;

use crate::app_config::Config;
use crate::extraction::{self, dutch_chain, fallback_chain};
use crate::file_utils::FileManager;
use crate::media_probe;
use crate::subtitle_document::SubtitleDocument;
use crate::translation_service::TranslationService;

// @module: Per-file orchestration of the subtitle acquisition pipeline

/// Terminal result for one media file. Used for reporting and counting only;
/// control flow beyond the orchestrator never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A subtitle file in the target language already sits next to the media file
    AlreadySatisfied,
    /// An embedded Dutch track was extracted and used directly
    EmbeddedDutch,
    /// A fallback track was extracted and machine-translated
    Translated,
    /// Every extraction strategy failed; the file was skipped
    ExtractionFailed,
    /// The container verifiably holds no subtitle streams
    NoSubtitles,
}

/// Aggregate counters for one run
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Total files considered
    pub total: usize,
    /// Files satisfied by an existing output
    pub already_satisfied: usize,
    /// Files served by an embedded Dutch track
    pub embedded_dutch: usize,
    /// Files served by extraction plus translation
    pub translated: usize,
    /// Files where the extraction chain was exhausted
    pub extraction_failed: usize,
    /// Files with no subtitle streams at all
    pub no_subtitles: usize,
    /// Files that hit an unexpected I/O error
    pub errors: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: PipelineOutcome) {
        match outcome {
            PipelineOutcome::AlreadySatisfied => self.already_satisfied += 1,
            PipelineOutcome::EmbeddedDutch => self.embedded_dutch += 1,
            PipelineOutcome::Translated => self.translated += 1,
            PipelineOutcome::ExtractionFailed => self.extraction_failed += 1,
            PipelineOutcome::NoSubtitles => self.no_subtitles += 1,
        }
    }

    /// Files that ended with a new subtitle file on disk
    pub fn processed(&self) -> usize {
        self.embedded_dutch + self.translated
    }
}

/// Main application controller for subtitle acquisition
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation service over the configured backend
    service: TranslationService,

    // @field: Caller-supplied working directory, kept after the run
    working_dir: Option<PathBuf>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(config.translation.clone())?;
        Ok(Self {
            config,
            service,
            working_dir: None,
        })
    }

    /// Create a controller with an explicit translation service, for tests
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            working_dir: None,
        }
    }

    /// Use a caller-supplied working directory instead of per-file temp dirs
    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Process a batch of media files through a bounded worker pool.
    ///
    /// Files are independent: extraction attempts for one file never overlap,
    /// and one file's failure never aborts the rest of the batch.
    pub async fn run_batch(&self, media_files: &[PathBuf], force: bool) -> Result<RunSummary> {
        let mut summary = RunSummary {
            total: media_files.len(),
            ..RunSummary::default()
        };

        // Probe the translation backend once per run, in the background;
        // failures surface later per-cue anyway
        static INIT_TEST: Once = Once::new();
        INIT_TEST.call_once(|| {
            let translation = self.config.translation.clone();
            tokio::spawn(async move {
                if let Ok(service) = TranslationService::new(translation) {
                    if let Err(e) = service.test_connection().await {
                        warn!("Translation backend not reachable yet: {}", e);
                    }
                }
            });
        });

        let progress = ProgressBar::new(media_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);

        let concurrency = self.config.concurrent_files.max(1);
        let mut results = futures::stream::iter(media_files.iter())
            .map(|media_file| {
                let progress = progress.clone();
                async move {
                    let file_name = media_file
                        .file_name()
                        .map(|f| f.to_string_lossy().to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    progress.set_message(file_name.clone());

                    let result = self.process_file(media_file, force).await;
                    progress.inc(1);
                    (file_name, result)
                }
            })
            .buffer_unordered(concurrency);

        while let Some((file_name, result)) = results.next().await {
            match result {
                Ok(outcome) => {
                    summary.record(outcome);
                    if outcome == PipelineOutcome::ExtractionFailed {
                        warn!("No suitable subtitles could be extracted from {}", file_name);
                    }
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }
        }

        progress.finish_and_clear();

        info!(
            "Summary: processed {} out of {} files ({} embedded Dutch, {} translated, {} already present, {} without subtitles, {} failed, {} errors)",
            summary.processed(),
            summary.total,
            summary.embedded_dutch,
            summary.translated,
            summary.already_satisfied,
            summary.no_subtitles,
            summary.extraction_failed,
            summary.errors,
        );

        Ok(summary)
    }

    /// Run one media file through the acquisition state machine.
    ///
    /// `Start -> AlreadySatisfied | ProbeForDutch -> DutchFound | NoDutch ->
    /// ExtractFallback -> Translate -> Write | ExtractFailed`
    pub async fn process_file(&self, media_file: &Path, force: bool) -> Result<PipelineOutcome> {
        let target_lang = &self.config.target_language;
        let output_path = FileManager::subtitle_path_for(media_file, target_lang);

        // Start: an existing output next to the media file ends the run
        // before any tool invocation
        if output_path.exists() && !force {
            info!(
                "Subtitles already exist ({}), skipping",
                output_path.file_name().unwrap_or_default().to_string_lossy()
            );
            return Ok(PipelineOutcome::AlreadySatisfied);
        }

        // Working directory for extraction artifacts; the TempDir guard
        // guarantees cleanup on every exit path below
        let _temp_guard: Option<TempDir>;
        let workdir: PathBuf = match &self.working_dir {
            Some(dir) => {
                FileManager::ensure_dir(dir)?;
                _temp_guard = None;
                dir.clone()
            }
            None => {
                let dir = TempDir::new().context("Failed to create working directory")?;
                let path = dir.path().to_path_buf();
                _temp_guard = Some(dir);
                path
            }
        };

        let stem = media_file.file_stem().unwrap_or_default().to_string_lossy();
        let probe = media_probe::probe_or_empty(media_file).await;

        // ProbeForDutch: targeted extraction only when a Dutch tag is visible
        if probe.has_dutch() {
            info!("Dutch subtitles found in container, extracting");
            let dutch_temp = workdir.join(format!("{}.{}.srt", stem, target_lang));
            let chain = dutch_chain(&probe);

            match extraction::run_chain(media_file, &dutch_temp, &chain).await {
                Ok(extracted) => {
                    self.finish_embedded_dutch(&extracted, &output_path)?;
                    return Ok(PipelineOutcome::EmbeddedDutch);
                }
                Err(e) => {
                    warn!("Could not extract Dutch subtitles despite finding them: {}", e);
                }
            }
        }

        // A probe that completed and saw nothing means there is genuinely
        // nothing to extract; a timed-out probe proves nothing and the
        // fallback chain still gets its positional attempts
        if probe.confirmed_empty() {
            info!("No subtitle streams in container, skipping");
            return Ok(PipelineOutcome::NoSubtitles);
        }

        // ExtractFallback: English/ASS/positional strategies
        let fallback_temp = workdir.join(format!("{}.{}.srt", stem, self.config.source_language));
        let chain = fallback_chain(&probe);

        let extracted = match extraction::run_chain(media_file, &fallback_temp, &chain).await {
            Ok(path) => path,
            Err(e) => {
                info!("Extraction chain exhausted: {}", e);
                return Ok(PipelineOutcome::ExtractionFailed);
            }
        };

        // Translate: per-cue, after optional cleanup
        self.translate_and_write(&extracted, &output_path).await?;
        Ok(PipelineOutcome::Translated)
    }

    /// DutchFound: clean if enabled, otherwise pass the file through verbatim
    fn finish_embedded_dutch(&self, extracted: &Path, output_path: &Path) -> Result<()> {
        if self.config.clean_hearing_impaired {
            let content = FileManager::read_to_string(extracted)?;
            let document = SubtitleDocument::parse(strip_bom(&content)).cleaned();
            FileManager::write_to_file(output_path, &document.serialize())?;
        } else {
            FileManager::copy_file(extracted, output_path)?;
        }

        info!("Saved Dutch subtitles: {}", output_path.display());
        Ok(())
    }

    /// Translate an extracted subtitle file cue by cue and write the result
    async fn translate_and_write(&self, extracted: &Path, output_path: &Path) -> Result<()> {
        let content = FileManager::read_to_string(extracted)?;
        let document = SubtitleDocument::parse(strip_bom(&content));

        // Dropping empty cues before translation avoids wasted backend calls
        let document = if self.config.clean_hearing_impaired {
            document.cleaned()
        } else {
            document
        };

        let source = &self.config.source_language;
        let target = &self.config.target_language;
        info!(
            "Translating {} cues to {} via {}",
            document.len(),
            target,
            self.config.translation.provider.display_name()
        );

        let texts: Vec<String> = document.cues.iter().map(|c| c.text.clone()).collect();
        let translated = self.service.translate_all(&texts, source, target).await;

        let mut result = document.clone();
        for (cue, text) in result.cues.iter_mut().zip(translated) {
            cue.text = text;
        }

        FileManager::write_to_file(output_path, &result.serialize())?;
        info!("Saved translated subtitles: {}", output_path.display());
        Ok(())
    }
}

/// Strip a UTF-8 byte order mark, which extracted SRT files often carry
fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
