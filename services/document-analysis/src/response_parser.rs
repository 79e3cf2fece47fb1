//! Tolerant parsing of model output.
//!
//! Models often wrap JSON in Markdown fences. Fence lines are removed before
//! parsing; nothing else about the text is guessed.

use doc_analyzer_models::ParsedAnalysis;
use doc_analyzer_utils::{AnalyzerError, AnalyzerResult};
use serde_json::{Map, Value};

pub const FENCE_MARKER: &str = "```";

const NOT_JSON: &str = "Gemini response not valid JSON";
const NOT_AN_OBJECT: &str = "Gemini response is not a JSON object";

/// Drop every line whose trimmed content starts with a fence marker, when the
/// text itself starts with one.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE_MARKER) {
        return trimmed.to_string();
    }

    trimmed
        .lines()
        .filter(|line| !line.trim().starts_with(FENCE_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse model output into a JSON object, keeping the raw text on failure.
pub fn parse_response(raw: &str) -> AnalyzerResult<Map<String, Value>> {
    let json_str = strip_code_fences(raw);

    match serde_json::from_str::<Value>(&json_str) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AnalyzerError::malformed_response(NOT_AN_OBJECT, raw)),
        Err(_) => Err(AnalyzerError::malformed_response(NOT_JSON, raw)),
    }
}

pub fn parse_analysis(raw: &str) -> AnalyzerResult<ParsedAnalysis> {
    parse_response(raw).map(|map| ParsedAnalysis::from_map(&map))
}
