//! Analysis Handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Json,
};
use doc_analyzer_models::{AnalysisResult, DEFAULT_CONFIDENCE};
use doc_analyzer_utils::{validate_request, AnalyzerError, AnalyzerResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analysis::AnalysisOutcome;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(required(message = "Missing 'document_id' field in request body."))]
    pub document_id: Option<i64>,
}

impl AnalyzeRequest {
    /// Document ids start at 1, so zero counts as absent.
    pub fn document_id(&self) -> AnalyzerResult<i64> {
        match self.document_id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(AnalyzerError::validation(
                "document_id",
                "Missing 'document_id' field in request body.",
            )),
        }
    }
}

/// Stored analysis as exposed over HTTP.
///
/// Confidence is not stored, so reads always report the default.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub id: i64,
    pub document_id: i64,
    pub document_type: Option<String>,
    pub missing_fields: Vec<String>,
    pub recommendations: Option<String>,
    pub created_at: Option<String>,
    pub confidence: f64,
}

impl TryFrom<AnalysisResult> for AnalysisResponse {
    type Error = AnalyzerError;

    fn try_from(result: AnalysisResult) -> Result<Self, Self::Error> {
        let missing_fields = result.missing_fields_list().map_err(|e| {
            AnalyzerError::database(format!(
                "Stored missing_fields for analysis {} is not valid JSON: {}",
                result.id, e
            ))
        })?;

        Ok(Self {
            id: result.id,
            document_id: result.document_id,
            document_type: result.document_type,
            missing_fields,
            recommendations: result.recommendations,
            created_at: result.created_at.map(|at| at.to_rfc3339()),
            confidence: DEFAULT_CONFIDENCE,
        })
    }
}

/// Classify a stored document with the LLM
///
/// POST /analyze
pub async fn analyze_document(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AnalyzerResult<Json<AnalysisOutcome>> {
    let Json(request) = payload?;
    validate_request(&request)?;

    let document_id = request.document_id()?;

    let outcome = state.analyzer.analyze(document_id).await?;

    Ok(Json(outcome))
}

/// GET /analysis
pub async fn list_analyses(State(state): State<AppState>) -> AnalyzerResult<Json<Vec<AnalysisResponse>>> {
    let results = state.analyses.find_all().await.map_err(AnalyzerError::storage)?;

    let responses = results
        .into_iter()
        .map(AnalysisResponse::try_from)
        .collect::<AnalyzerResult<Vec<_>>>()?;

    Ok(Json(responses))
}

/// GET /analysis/:id
pub async fn get_analysis(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AnalyzerResult<Json<AnalysisResponse>> {
    let Path(id) = path?;
    let result = state
        .analyses
        .find_by_id(id)
        .await
        .map_err(AnalyzerError::storage)?
        .ok_or_else(|| AnalyzerError::not_found("Analysis result not found."))?;

    Ok(Json(result.try_into()?))
}
