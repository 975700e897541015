use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating and matching ISO 639-1
/// (2-letter) and ISO 639-2 (3-letter) language codes, plus the permissive
/// tag sets used when inspecting container metadata. Container language tags
/// are inconsistently populated, so stream matching deliberately accepts
/// plain-name spellings alongside the ISO codes.

/// Identifiers accepted as meaning "Dutch" in container metadata, in the
/// fixed order the extraction chain tries them as stream-map selectors.
pub const DUTCH_IDENTIFIERS: [&str; 5] = ["nld", "dut", "nl", "dutch", "nederlands"];

/// Check whether a stream language tag denotes Dutch (case-insensitive)
pub fn is_dutch_tag(tag: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    DUTCH_IDENTIFIERS.contains(&tag.as_str())
}

/// Check whether probe output textually hints at an English subtitle track
pub fn has_english_hint(probe_text: &str) -> bool {
    let lower = probe_text.to_lowercase();
    lower.contains("eng") || lower.contains("english")
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // ISO 639-2/B codes that need converting to ISO 639-2/T
        match normalized_code.as_str() {
            "fre" => return Ok("fra".to_string()),
            "ger" => return Ok("deu".to_string()),
            "dut" => return Ok("nld".to_string()),
            "gre" => return Ok("ell".to_string()),
            "chi" => return Ok("zho".to_string()),
            "cze" => return Ok("ces".to_string()),
            "ice" => return Ok("isl".to_string()),
            "rum" => return Ok("ron".to_string()),
            "slo" => return Ok("slk".to_string()),
            "per" => return Ok("fas".to_string()),
            _ => {}
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let normalized1 = match normalize_to_part2t(code1) {
        Ok(n) => n,
        Err(_) => return false,
    };

    let normalized2 = match normalize_to_part2t(code2) {
        Ok(n) => n,
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
