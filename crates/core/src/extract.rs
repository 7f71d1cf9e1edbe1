//! Best-effort recovery of a JSON value from free-form model output.
//!
//! The model is instructed to answer with a single JSON object, but in
//! practice responses arrive wrapped in code fences, surrounded by prose, or
//! truncated. [`extract_json`] tries progressively looser readings and
//! reports "no structured result" as `None` instead of an error; the caller
//! stores the raw text either way, so nothing is lost.

use std::sync::OnceLock;

use regex::Regex;

/// Matches the first fenced code block, with an optional `json` label.
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fence regex must compile")
    })
}

/// Extract a well-formed JSON value from arbitrary model output.
///
/// In order of preference:
///
/// 1. The inner content of the first fenced code block, if any.
/// 2. The trimmed text with unmatched leading/trailing fence markers
///    stripped.
/// 3. Fallback: the substring from the first `{` to the last `}` of the
///    original text, inclusive.
///
/// Returns `None` when no reading parses. Multiple JSON-like fragments are
/// not disambiguated -- the first-to-last brace span may over- or
/// under-capture, which is an accepted limit of the heuristic.
pub fn extract_json(raw: &str) -> Option<serde_json::Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = match fence_regex().captures(trimmed) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
        None => trimmed
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim(),
    };

    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_labeled_fence_ignoring_prose() {
        let raw = "Here you go: ```json\n{\"condition\":\"Acne\"}\n```";
        assert_eq!(extract_json(raw), Some(json!({"condition": "Acne"})));
    }

    #[test]
    fn extracts_unlabeled_fence() {
        let raw = "```\n{\"condition\":\"Eczema\",\"confidence\":0.7}\n```";
        assert_eq!(
            extract_json(raw),
            Some(json!({"condition": "Eczema", "confidence": 0.7}))
        );
    }

    #[test]
    fn fence_label_is_case_insensitive() {
        let raw = "```JSON\n{\"condition\":\"Rosacea\"}\n```";
        assert_eq!(extract_json(raw), Some(json!({"condition": "Rosacea"})));
    }

    #[test]
    fn parses_bare_json() {
        let raw = "{\"condition\":\"Psoriasis\",\"confidence\":0.85}";
        assert_eq!(
            extract_json(raw),
            Some(json!({"condition": "Psoriasis", "confidence": 0.85}))
        );
    }

    #[test]
    fn unclosed_fence_recovers_via_brace_span() {
        let raw = "```json\n{\"condition\":\"Acne\"}";
        assert_eq!(extract_json(raw), Some(json!({"condition": "Acne"})));
    }

    #[test]
    fn trailing_fence_marker_is_stripped() {
        let raw = "{\"condition\":\"Acne\"}```";
        assert_eq!(extract_json(raw), Some(json!({"condition": "Acne"})));
    }

    #[test]
    fn falls_back_to_brace_span_in_prose() {
        let raw = "The assessment is {\"condition\":\"Melanoma\",\"urgency\":\"soon\"} -- see a doctor.";
        assert_eq!(
            extract_json(raw),
            Some(json!({"condition": "Melanoma", "urgency": "soon"}))
        );
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("   \n\t  "), None);
    }

    #[test]
    fn prose_without_json_yields_none() {
        assert_eq!(extract_json("I cannot assess this image."), None);
    }

    #[test]
    fn stray_braces_are_swallowed() {
        assert_eq!(extract_json("weird {not json} text"), None);
    }

    #[test]
    fn lone_open_brace_yields_none() {
        assert_eq!(extract_json("{"), None);
    }

    #[test]
    fn brace_span_over_captures_multiple_fragments() {
        // Two objects back to back: the first-to-last span is not valid JSON,
        // so the heuristic gives up rather than guessing.
        let raw = "{\"a\":1} and {\"b\":2}";
        assert_eq!(extract_json(raw), None);
    }

    #[test]
    fn fence_with_surrounding_whitespace() {
        let raw = "\n\n  ```json\n  {\"condition\": \"Acne\", \"confidence\": 0.9}\n  ```  \n";
        assert_eq!(
            extract_json(raw),
            Some(json!({"condition": "Acne", "confidence": 0.9}))
        );
    }
}
