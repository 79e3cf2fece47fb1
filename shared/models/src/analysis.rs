use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Confidence reported when the model omits one, and on every stored read.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Stored classification of a document.
///
/// `missing_fields` holds JSON text of a string list. Confidence is not part
/// of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnalysisResult {
    pub id: i64,
    pub document_id: i64,
    pub document_type: Option<String>,
    pub missing_fields: String,
    pub recommendations: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AnalysisResult {
    /// Decode the stored JSON list of missing field names.
    pub fn missing_fields_list(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.missing_fields)
    }

    pub fn encode_missing_fields(fields: &[String]) -> String {
        // A slice of strings always serializes.
        serde_json::to_string(fields).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Fields supplied by the orchestrator when storing an analysis.
#[derive(Debug, Clone)]
pub struct NewAnalysisResult {
    pub document_id: i64,
    pub document_type: Option<String>,
    pub missing_fields: Vec<String>,
    pub recommendations: Option<String>,
}

impl NewAnalysisResult {
    pub fn from_parsed(document_id: i64, parsed: &ParsedAnalysis) -> Self {
        Self {
            document_id,
            document_type: parsed.document_type.clone(),
            missing_fields: parsed.missing_fields.clone(),
            recommendations: parsed.recommendations.clone(),
        }
    }
}

/// Typed reading of the JSON object returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    pub document_type: Option<String>,
    pub missing_fields: Vec<String>,
    pub recommendations: Option<String>,
    pub confidence: f64,
}

impl ParsedAnalysis {
    /// Read the expected keys, falling back to defaults for anything absent
    /// or of an unexpected shape. Field names inside `missing_fields` are
    /// taken as given.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            document_type: map.get("document_type").and_then(read_document_type),
            missing_fields: map
                .get("missing_fields")
                .map(read_missing_fields)
                .unwrap_or_default(),
            recommendations: map.get("recommendations").and_then(read_recommendations),
            confidence: map
                .get("confidence")
                .and_then(read_confidence)
                .unwrap_or(DEFAULT_CONFIDENCE),
        }
    }
}

fn read_document_type(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn read_missing_fields(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn read_recommendations(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}

fn read_confidence(value: &Value) -> Option<f64> {
    let confidence = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    if confidence.is_finite() {
        Some(confidence.clamp(0.0, 1.0))
    } else {
        None
    }
}
