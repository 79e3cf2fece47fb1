//! Document Analysis Service
//!
//! Orchestrates one analysis: load the document, prompt the model, parse the
//! answer, persist the result. A failure at any stage returns before anything
//! is written.

use std::fmt;
use std::sync::Arc;

use doc_analyzer_database::{AnalysisRepository, DocumentRepository, SqlitePool};
use doc_analyzer_models::{AnalysisResult, NewAnalysisResult, ParsedAnalysis};
use doc_analyzer_utils::{AnalyzerError, AnalyzerResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::llm_client::TextGenerator;
use crate::prompt::build_prompt;
use crate::response_parser::parse_analysis;

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Loaded,
    Prompted,
    Queried,
    Parsed,
    Persisted,
    Returned,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Prompted => write!(f, "prompted"),
            Self::Queried => write!(f, "queried"),
            Self::Parsed => write!(f, "parsed"),
            Self::Persisted => write!(f, "persisted"),
            Self::Returned => write!(f, "returned"),
        }
    }
}

/// Successful analysis, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub document_id: i64,
    pub analysis_id: i64,
    pub document_type: Option<String>,
    pub missing_fields: Vec<String>,
    pub recommendations: Option<String>,
    pub confidence: f64,
}

impl AnalysisOutcome {
    fn new(stored: &AnalysisResult, parsed: ParsedAnalysis) -> Self {
        Self {
            document_id: stored.document_id,
            analysis_id: stored.id,
            document_type: stored.document_type.clone(),
            missing_fields: parsed.missing_fields,
            recommendations: stored.recommendations.clone(),
            confidence: parsed.confidence,
        }
    }
}

#[derive(Clone)]
pub struct DocumentAnalyzer {
    pool: SqlitePool,
    documents: DocumentRepository,
    analyses: AnalysisRepository,
    generator: Arc<dyn TextGenerator>,
}

impl DocumentAnalyzer {
    pub fn new(pool: SqlitePool, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            documents: DocumentRepository::new(pool.clone()),
            analyses: AnalysisRepository::new(pool.clone()),
            pool,
            generator,
        }
    }

    #[instrument(skip(self))]
    pub async fn analyze(&self, document_id: i64) -> AnalyzerResult<AnalysisOutcome> {
        // Unknown ids stop here, before any model call.
        let document = self
            .documents
            .find_by_id(document_id)
            .await
            .map_err(AnalyzerError::storage)?
            .ok_or_else(|| AnalyzerError::not_found("Document not found."))?;
        debug!(stage = %AnalysisStage::Loaded, filename = %document.filename);

        let prompt = build_prompt(&document.content);
        debug!(stage = %AnalysisStage::Prompted, prompt_chars = prompt.len());

        let raw = self.generator.generate(&prompt).await?;
        debug!(stage = %AnalysisStage::Queried, response_chars = raw.len());

        let parsed = parse_analysis(&raw)?;
        debug!(stage = %AnalysisStage::Parsed, document_type = ?parsed.document_type);

        let mut tx = self.pool.begin().await?;
        let stored = self
            .analyses
            .create(&mut tx, &NewAnalysisResult::from_parsed(document_id, &parsed))
            .await
            .map_err(AnalyzerError::storage)?;
        tx.commit().await?;
        debug!(stage = %AnalysisStage::Persisted, analysis_id = stored.id);

        info!(
            stage = %AnalysisStage::Returned,
            analysis_id = stored.id,
            document_type = ?stored.document_type,
            missing = parsed.missing_fields.len(),
            "Document analyzed"
        );

        Ok(AnalysisOutcome::new(&stored, parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doc_analyzer_database::{create_sqlite_pool, migrations::run_sqlite_migrations};
    use doc_analyzer_models::NewDocument;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGenerator {
        response: AnalyzerResult<String>,
        calls: AtomicUsize,
    }

    impl FixedGenerator {
        fn new(response: AnalyzerResult<String>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> AnalyzerResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    async fn setup(generator: Arc<FixedGenerator>) -> (DocumentAnalyzer, i64) {
        let pool = create_sqlite_pool("sqlite::memory:", 1).await.unwrap();
        run_sqlite_migrations(&pool).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let document = DocumentRepository::new(pool.clone())
            .create(&mut tx, &NewDocument::new("invoice.pdf", "INVOICE #123 Amount: $50"))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        (DocumentAnalyzer::new(pool, generator), document.id)
    }

    #[tokio::test]
    async fn test_successful_analysis_is_persisted() {
        let generator = FixedGenerator::new(Ok(
            r#"{"document_type":"invoice","missing_fields":["due_date"],"confidence":0.9}"#.to_string(),
        ));
        let (analyzer, document_id) = setup(generator.clone()).await;

        let outcome = analyzer.analyze(document_id).await.unwrap();

        assert_eq!(outcome.analysis_id, 1);
        assert_eq!(outcome.document_type.as_deref(), Some("invoice"));
        assert_eq!(outcome.missing_fields, vec!["due_date"]);
        assert_eq!(outcome.recommendations, None);
        assert_eq!(outcome.confidence, 0.9);
        assert_eq!(analyzer.analyses.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_document_skips_model_call() {
        let generator = FixedGenerator::new(Ok("{}".to_string()));
        let (analyzer, document_id) = setup(generator.clone()).await;

        let error = analyzer.analyze(document_id + 1).await.unwrap_err();

        assert_eq!(error.http_status_code(), 404);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_writes_nothing() {
        let generator = FixedGenerator::new(Ok("not json".to_string()));
        let (analyzer, document_id) = setup(generator).await;

        let error = analyzer.analyze(document_id).await.unwrap_err();

        assert_eq!(error.error_code(), "MALFORMED_RESPONSE");
        assert!(analyzer.analyses.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_writes_nothing() {
        let generator = FixedGenerator::new(Err(AnalyzerError::analysis("Gemini API error (503)")));
        let (analyzer, document_id) = setup(generator).await;

        let error = analyzer.analyze(document_id).await.unwrap_err();

        assert_eq!(error.to_string(), "Gemini API error (503)");
        assert!(analyzer.analyses.find_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(AnalysisStage::Loaded.to_string(), "loaded");
        assert_eq!(AnalysisStage::Returned.to_string(), "returned");
    }
}
