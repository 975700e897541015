/*!
 * Tests for the subtitle document model and hearing-impaired cleanup
 */

use ondertitel::subtitle_document::{SubtitleDocument, clean_cue_text};

use crate::common::{HEARING_IMPAIRED_SRT, SAMPLE_SRT};

/// Test basic parsing of a well-formed document
#[test]
fn test_parse_withWellFormedDocument_shouldKeepIndexAndTimingVerbatim() {
    let document = SubtitleDocument::parse(SAMPLE_SRT);

    assert_eq!(document.len(), 3);
    assert_eq!(document.cues[0].index, "1");
    assert_eq!(document.cues[0].timing, "00:00:01,000 --> 00:00:04,000");
    assert_eq!(document.cues[0].text, "This is a test subtitle.");
    assert_eq!(document.cues[2].index, "3");
}

/// Test that malformed blocks are discarded
#[test]
fn test_parse_withShortBlock_shouldDiscardIt() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\n\n3\n00:00:05,000 --> 00:00:06,000\nWorld\n";
    let document = SubtitleDocument::parse(content);

    // The middle block has only two lines and is dropped
    assert_eq!(document.len(), 2);
    assert_eq!(document.cues[0].index, "1");
    assert_eq!(document.cues[1].index, "3");
}

/// Test that multiple blank lines still separate blocks
#[test]
fn test_parse_withExtraBlankLines_shouldSplitBlocks() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n";
    let document = SubtitleDocument::parse(content);

    assert_eq!(document.len(), 2);
}

/// Test multi-line cue text survives a parse/serialize cycle
#[test]
fn test_parse_withMultiLineCue_shouldPreserveLines() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst line\nSecond line\n";
    let document = SubtitleDocument::parse(content);

    assert_eq!(document.cues[0].text, "First line\nSecond line");
    assert!(document.serialize().contains("First line\nSecond line"));
}

/// Round-trip is idempotent after the first parse
#[test]
fn test_serialize_afterFirstParse_shouldBeIdempotent() {
    for content in [SAMPLE_SRT, HEARING_IMPAIRED_SRT, "garbage\n\nno timing here"] {
        let once = SubtitleDocument::parse(content).serialize();
        let twice = SubtitleDocument::parse(&once).serialize();
        assert_eq!(once, twice);
    }
}

/// The spec scenario: speaker label, sound description and bracket span
#[test]
fn test_cleaned_withAnnotatedCue_shouldKeepOnlyDialogue() {
    let document = SubtitleDocument::parse("1\n00:00:01,000 --> 00:00:02,000\nJOHN: (laughs) Hello [subtitle]\n");
    let cleaned = document.cleaned();

    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned.cues[0].text, "Hello");
    assert_eq!(
        cleaned.serialize(),
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n"
    );
}

/// A cue that is only a speaker indication disappears entirely
#[test]
fn test_cleaned_withAllCapsCue_shouldDropCueWithoutRenumbering() {
    let document = SubtitleDocument::parse(HEARING_IMPAIRED_SRT);
    let cleaned = document.cleaned();

    // Cue 2 ("ALL CAPS LINE") is empty after cleaning and is dropped;
    // the surviving indices stay as they were in the source
    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned.cues[0].index, "1");
    assert_eq!(cleaned.cues[1].index, "3");
    assert_eq!(cleaned.cues[1].text, "Good evening");
}

/// The cleaner never emits a cue with an empty body
#[test]
fn test_cleaned_withAnyInput_shouldNeverEmitEmptyCue() {
    let inputs = [
        "1\n00:00:01,000 --> 00:00:02,000\n(door slams)\n",
        "1\n00:00:01,000 --> 00:00:02,000\n[MUSIC]\n",
        "1\n00:00:01,000 --> 00:00:02,000\n<i></i>\n",
        "1\n00:00:01,000 --> 00:00:02,000\nNARRATOR:\n",
    ];

    for input in inputs {
        let cleaned = SubtitleDocument::parse(input).cleaned();
        for cue in &cleaned.cues {
            assert!(!cue.text.trim().is_empty(), "empty cue leaked for input {:?}", input);
        }
    }
}

/// Individual cleaning rules
#[test]
fn test_clean_cue_text_withSpans_shouldRemoveAllSpanKinds() {
    assert_eq!(clean_cue_text("(sighs) fine"), "fine");
    assert_eq!(clean_cue_text("[thunder] run"), "run");
    assert_eq!(clean_cue_text("<b>bold</b> words"), "bold words");
    assert_eq!(clean_cue_text("{note} text"), "text");
}

/// Speaker labels are stripped per line
#[test]
fn test_clean_cue_text_withSpeakerLabels_shouldStripThem() {
    assert_eq!(clean_cue_text("MARY: How are you?"), "How are you?");
    assert_eq!(clean_cue_text("DR. SMITH: Sit down"), "Sit down");
    // Lowercase names are dialogue, not labels
    assert_eq!(clean_cue_text("Mary: hello"), "Mary: hello");
}

/// Mixed-case lines survive the uppercase filter
#[test]
fn test_clean_cue_text_withMixedCaseLine_shouldKeepLine() {
    assert_eq!(clean_cue_text("Not ALL caps"), "Not ALL caps");
    // Digits and punctuation alone are not a speaker indication
    assert_eq!(clean_cue_text("1234!"), "1234!");
}

/// Serializing an empty document yields empty output
#[test]
fn test_serialize_withNoCues_shouldReturnEmptyString() {
    let document = SubtitleDocument::parse("");
    assert!(document.is_empty());
    assert_eq!(document.serialize(), "");
}
