use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// @module: Subtitle document model and hearing-impaired cleanup

// @const: Block boundary - one or more blank lines
static BLOCK_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

// @const: Leading all-caps speaker label ending in a colon
static SPEAKER_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[A-Z][A-Z\s.]+:").unwrap());

// @const: Parenthesized sound descriptions
static PAREN_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

// @const: Bracketed annotations
static BRACKET_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

// @const: Angle-bracket formatting tags
static ANGLE_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// @const: Brace comments
static BRACE_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// One timed subtitle entry.
///
/// The index and timing line are carried verbatim from the source document:
/// indices are never renumbered (even after cues are dropped) and the timing
/// line is never parsed beyond being present.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Sequence index as taken from the source
    pub index: String,

    // @field: Timing line, passed through unmodified
    pub timing: String,

    // @field: Cue text, possibly multi-line
    pub text: String,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.index, self.timing, self.text)
    }
}

/// An ordered sequence of cues plus the original serialized text
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// Cues in source order
    pub cues: Vec<Cue>,

    /// The text the document was parsed from
    pub source_text: String,
}

impl SubtitleDocument {
    /// Parse raw subtitle text into a document.
    ///
    /// Blocks are split on one or more blank lines; a block with fewer than
    /// three lines (index, timing, at least one text line) is discarded as
    /// malformed.
    pub fn parse(content: &str) -> Self {
        let mut cues = Vec::new();

        for block in BLOCK_SPLIT_REGEX.split(content.trim()) {
            let lines: Vec<&str> = block.trim().lines().collect();
            if lines.len() < 3 {
                continue;
            }

            cues.push(Cue {
                index: lines[0].trim().to_string(),
                timing: lines[1].trim().to_string(),
                text: lines[2..].join("\n"),
            });
        }

        SubtitleDocument {
            cues,
            source_text: content.to_string(),
        }
    }

    /// Serialize the document back to subtitle text.
    ///
    /// Surviving cues are joined as `index\ntiming\ntext` blocks separated by
    /// a single blank line.
    pub fn serialize(&self) -> String {
        if self.cues.is_empty() {
            return String::new();
        }

        let blocks: Vec<String> = self.cues.iter().map(|c| c.to_string()).collect();
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }

    /// Produce a cleaned copy of the document.
    ///
    /// Each cue body goes through [`clean_cue_text`]; a cue whose cleaned body
    /// is empty is dropped entirely, without renumbering the survivors.
    pub fn cleaned(&self) -> Self {
        let cues: Vec<Cue> = self
            .cues
            .iter()
            .filter_map(|cue| {
                let text = clean_cue_text(&cue.text);
                if text.is_empty() {
                    None
                } else {
                    Some(Cue {
                        index: cue.index.clone(),
                        timing: cue.timing.clone(),
                        text,
                    })
                }
            })
            .collect();

        SubtitleDocument {
            cues,
            source_text: self.source_text.clone(),
        }
    }

    /// Whether the document holds no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Number of cues in the document
    pub fn len(&self) -> usize {
        self.cues.len()
    }
}

/// Strip hearing-impaired artifacts from one cue body.
///
/// Applies, in order: speaker labels, `(...)`, `[...]`, `<...>`, `{...}`
/// removal, dropping of all-uppercase speaker-indication lines, and a final
/// trim of the whole body.
pub fn clean_cue_text(text: &str) -> String {
    let text = SPEAKER_LABEL_REGEX.replace_all(text, "");
    let text = PAREN_SPAN_REGEX.replace_all(&text, "");
    let text = BRACKET_SPAN_REGEX.replace_all(&text, "");
    let text = ANGLE_SPAN_REGEX.replace_all(&text, "");
    let text = BRACE_SPAN_REGEX.replace_all(&text, "");

    let filtered: Vec<&str> = text
        .lines()
        .filter(|line| !is_speaker_indication_line(line))
        .collect();

    filtered.join("\n").trim().to_string()
}

/// A line that is entirely uppercase letters/punctuation, with at least one
/// letter, is a speaker indication and is dropped.
fn is_speaker_indication_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if !trimmed.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    trimmed == trimmed.to_uppercase()
}
