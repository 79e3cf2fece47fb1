//! Document Upload and Read Handlers

use axum::{
    extract::{multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, State},
    response::Json,
};
use doc_analyzer_models::{Document, NewDocument};
use doc_analyzer_utils::{AnalyzerError, AnalyzerResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::handlers::analysis::AnalysisResponse;
use crate::AppState;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: i64,
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: i64,
    pub filename: String,
    pub created_at: Option<String>,
    pub content: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            filename: document.filename,
            created_at: document.created_at.map(|at| at.to_rfc3339()),
            content: document.content,
        }
    }
}

/// Upload a PDF and store its extracted text
///
/// POST /upload
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AnalyzerResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalyzerError::validation("file", format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // Checked before any bytes are read or parsed.
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AnalyzerError::validation("file", "File must be a PDF"));
        }

        let filename = field.file_name().unwrap_or("unknown.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AnalyzerError::validation("file", format!("Failed to read file data: {}", e)))?;

        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AnalyzerError::validation("file", "Missing 'file' field in upload."))?;

    let processor = state.pdf_processor.clone();
    let content = tokio::task::spawn_blocking(move || processor.extract(&data))
        .await
        .map_err(|e| AnalyzerError::internal(format!("PDF extraction task failed: {}", e)))??;

    let mut tx = state.pool.begin().await?;
    let document = state
        .documents
        .create(&mut tx, &NewDocument::new(filename, content.text))
        .await
        .map_err(AnalyzerError::storage)?;
    tx.commit().await?;

    info!(
        document_id = document.id,
        filename = %document.filename,
        pages = content.pages.len(),
        "Document uploaded"
    );

    Ok(Json(UploadResponse {
        id: document.id,
        filename: document.filename,
        text: document.content,
    }))
}

/// GET /documents
pub async fn list_documents(State(state): State<AppState>) -> AnalyzerResult<Json<Vec<DocumentResponse>>> {
    let documents = state.documents.find_all().await.map_err(AnalyzerError::storage)?;

    Ok(Json(documents.into_iter().map(DocumentResponse::from).collect()))
}

/// GET /documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AnalyzerResult<Json<DocumentResponse>> {
    let Path(id) = path?;
    let document = find_document(&state, id).await?;

    Ok(Json(document.into()))
}

/// Analyses recorded for one document.
///
/// GET /documents/:id/analysis
pub async fn list_document_analyses(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AnalyzerResult<Json<Vec<AnalysisResponse>>> {
    let Path(id) = path?;
    let document = find_document(&state, id).await?;

    let results = state
        .analyses
        .find_by_document(document.id)
        .await
        .map_err(AnalyzerError::storage)?;

    let responses = results
        .into_iter()
        .map(AnalysisResponse::try_from)
        .collect::<AnalyzerResult<Vec<_>>>()?;

    Ok(Json(responses))
}

async fn find_document(state: &AppState, id: i64) -> AnalyzerResult<Document> {
    state
        .documents
        .find_by_id(id)
        .await
        .map_err(AnalyzerError::storage)?
        .ok_or_else(|| AnalyzerError::not_found("Document not found."))
}
