/*!
 * Tests for the translation service: fallback contract, chunking and ordered
 * concurrent translation
 */

use ondertitel::app_config::TranslationConfig;
use ondertitel::providers::gtranslate::chunk_text;
use ondertitel::providers::mock::MockTranslate;
use ondertitel::translation_service::TranslationService;

fn mock_service(mock: MockTranslate) -> TranslationService {
    TranslationService::with_mock(mock, TranslationConfig::default())
}

/// A healthy backend translates the text
#[tokio::test]
async fn test_translate_or_original_withHealthyBackend_shouldTranslate() {
    let mock = MockTranslate::with_prefix("nl:");
    let service = mock_service(mock.clone());

    let result = service.translate_or_original("Hello", "en", "nl").await;
    assert_eq!(result, "nl:Hello");
}

/// A failing backend degrades to the original input, never an error
#[tokio::test]
async fn test_translate_or_original_withFailingBackend_shouldReturnOriginal() {
    let mock = MockTranslate::new();
    mock.fail_next_call();
    let service = mock_service(mock.clone());

    let result = service.translate_or_original("Hello there", "en", "nl").await;
    assert_eq!(result, "Hello there");
    assert_eq!(mock.tracker().lock().unwrap().call_count, 1);
}

/// The result is never empty for non-empty input
#[tokio::test]
async fn test_translate_or_original_withPersistentFailure_shouldNeverReturnEmpty() {
    let mock = MockTranslate::new();
    mock.fail_all_calls();
    let service = mock_service(mock);

    for text in ["Hello", "multi\nline\ncue", "punctuation!"] {
        let result = service.translate_or_original(text, "en", "nl").await;
        assert_eq!(result, text);
        assert!(!result.is_empty());
    }
}

/// Empty input short-circuits without touching the backend
#[tokio::test]
async fn test_translate_or_original_withEmptyInput_shouldSkipBackendCall() {
    let mock = MockTranslate::new();
    let service = mock_service(mock.clone());

    let result = service.translate_or_original("   ", "en", "nl").await;
    assert_eq!(result, "   ");
    assert_eq!(mock.tracker().lock().unwrap().call_count, 0);
}

/// Concurrent translation preserves cue order
#[tokio::test]
async fn test_translate_all_withManyCues_shouldPreserveOrder() {
    let mock = MockTranslate::with_prefix("nl:");
    let service = mock_service(mock);

    let texts: Vec<String> = (0..20).map(|i| format!("cue {}", i)).collect();
    let translated = service.translate_all(&texts, "en", "nl").await;

    assert_eq!(translated.len(), texts.len());
    for (i, text) in translated.iter().enumerate() {
        assert_eq!(text, &format!("nl:cue {}", i));
    }
}

/// One failed cue degrades only that cue
#[tokio::test]
async fn test_translate_all_withOneFailure_shouldDegradeOnlyThatCue() {
    let mock = MockTranslate::with_prefix("nl:");
    mock.fail_next_call();
    let service = mock_service(mock);

    let texts = vec!["first".to_string(), "second".to_string()];
    let translated = service.translate_all(&texts, "en", "nl").await;

    // The scripted failure hits exactly one call; the other goes through
    let originals = translated.iter().filter(|t| !t.starts_with("nl:")).count();
    assert_eq!(originals, 1);
    assert_eq!(translated.len(), 2);
}

/// Short input is one chunk
#[test]
fn test_chunk_text_withShortInput_shouldReturnSingleChunk() {
    let chunks = chunk_text("hello world", 5000);
    assert_eq!(chunks, vec!["hello world".to_string()]);
}

/// Long input splits into sequential pieces of at most the threshold
#[test]
fn test_chunk_text_withLongInput_shouldSplitSequentially() {
    let text = "a".repeat(12_000);
    let chunks = chunk_text(&text, 5000);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), 5000);
    assert_eq!(chunks[1].len(), 5000);
    assert_eq!(chunks[2].len(), 2000);
    assert_eq!(chunks.concat(), text);
}

/// Chunking counts characters, not bytes
#[test]
fn test_chunk_text_withMultibyteInput_shouldSplitOnCharBoundaries() {
    let text = "é".repeat(6000);
    let chunks = chunk_text(&text, 5000);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].chars().count(), 5000);
    assert_eq!(chunks[1].chars().count(), 1000);
}
