/*!
 * Tests for the per-file orchestration state machine
 */

use anyhow::Result;
use ondertitel::app_config::{Config, TranslationProvider};
use ondertitel::app_controller::{Controller, PipelineOutcome};
use ondertitel::providers::mock::MockTranslate;
use ondertitel::subtitle_document::SubtitleDocument;
use ondertitel::translation_service::TranslationService;

use crate::common;

fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;
    config
}

fn controller_with_mock(mock: MockTranslate) -> Controller {
    let config = test_config();
    let service = TranslationService::with_mock(mock, config.translation.clone());
    Controller::with_service(config, service)
}

/// An adjacent target-language subtitle short-circuits the whole pipeline
#[tokio::test]
async fn test_process_file_withExistingSubtitle_shouldBeAlreadySatisfied() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();

    let media = common::create_test_file(&dir_path, "movie.mkv", "not a real container")?;
    common::create_test_file(&dir_path, "movie.nl.srt", common::SAMPLE_SRT)?;

    let mock = MockTranslate::new();
    let controller = controller_with_mock(mock.clone());

    let outcome = controller.process_file(&media, false).await?;

    assert_eq!(outcome, PipelineOutcome::AlreadySatisfied);
    // Zero tool invocations: nothing was translated either
    assert_eq!(mock.tracker().lock().unwrap().call_count, 0);

    Ok(())
}

/// A container no tool can open exhausts the chain and is skipped, not fatal
#[tokio::test]
async fn test_process_file_withUnreadableContainer_shouldReportExtractionFailed() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();

    let media = common::create_test_file(&dir_path, "broken.mkv", "not a real container")?;

    let controller = controller_with_mock(MockTranslate::new());
    let outcome = controller.process_file(&media, false).await?;

    assert_eq!(outcome, PipelineOutcome::ExtractionFailed);
    // No output file appeared
    assert!(!dir.path().join("broken.nl.srt").exists());

    Ok(())
}

/// Force mode ignores the existing output and reprocesses
#[tokio::test]
async fn test_process_file_withForce_shouldNotShortCircuit() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();

    let media = common::create_test_file(&dir_path, "movie.mkv", "not a real container")?;
    common::create_test_file(&dir_path, "movie.nl.srt", common::SAMPLE_SRT)?;

    let controller = controller_with_mock(MockTranslate::new());
    let outcome = controller.process_file(&media, true).await?;

    // The fake container cannot be probed or extracted, so forcing ends in
    // extraction failure instead of the short-circuit
    assert_eq!(outcome, PipelineOutcome::ExtractionFailed);

    Ok(())
}

/// Batch processing counts outcomes and never aborts on one bad file
#[tokio::test]
async fn test_run_batch_withMixedFiles_shouldCountOutcomes() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let dir_path = dir.path().to_path_buf();

    let satisfied = common::create_test_file(&dir_path, "done.mkv", "x")?;
    common::create_test_file(&dir_path, "done.nl.srt", common::SAMPLE_SRT)?;
    let broken = common::create_test_file(&dir_path, "broken.mkv", "x")?;

    let controller = controller_with_mock(MockTranslate::new());
    let summary = controller.run_batch(&[satisfied, broken], false).await?;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.already_satisfied, 1);
    assert_eq!(summary.extraction_failed, 1);
    assert_eq!(summary.processed(), 0);
    assert_eq!(summary.errors, 0);

    Ok(())
}

/// The translate stage: clean, translate per cue, reassemble in order.
/// This drives the same composition the orchestrator uses after a fallback
/// extraction, without needing a real container.
#[tokio::test]
async fn test_translate_stage_withHearingImpairedDoc_shouldCleanThenTranslate() -> Result<()> {
    let mock = MockTranslate::with_prefix("nl:");
    let service = TranslationService::with_mock(mock.clone(), test_config().translation);

    let document = SubtitleDocument::parse(common::HEARING_IMPAIRED_SRT).cleaned();
    assert_eq!(document.len(), 2);

    let texts: Vec<String> = document.cues.iter().map(|c| c.text.clone()).collect();
    let translated = service.translate_all(&texts, "en", "nl").await;

    let mut result = document.clone();
    for (cue, text) in result.cues.iter_mut().zip(translated) {
        cue.text = text;
    }

    // Indices survive verbatim, the dropped cue is not renumbered, and every
    // translated body went through the backend
    assert_eq!(result.cues[0].index, "1");
    assert_eq!(result.cues[0].text, "nl:Hello");
    assert_eq!(result.cues[1].index, "3");
    assert_eq!(result.cues[1].text, "nl:Good evening");
    assert_eq!(mock.tracker().lock().unwrap().call_count, 2);

    Ok(())
}
