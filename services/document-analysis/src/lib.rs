//! Doc Analyzer Service
//!
//! Uploads PDFs, extracts their text, and asks Gemini to classify each
//! document and list its missing required fields.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use doc_analyzer_database::{AnalysisRepository, DocumentRepository, SqlitePool};
use doc_analyzer_utils::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod analysis;
pub mod handlers;
pub mod llm_client;
pub mod middleware;
pub mod pdf_processor;
pub mod prompt;
pub mod response_parser;
pub mod routes;

use analysis::DocumentAnalyzer;
use llm_client::TextGenerator;
use pdf_processor::PdfProcessor;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub documents: DocumentRepository,
    pub analyses: AnalysisRepository,
    pub analyzer: DocumentAnalyzer,
    pub pdf_processor: Arc<PdfProcessor>,
}

impl AppState {
    pub fn new(pool: SqlitePool, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            documents: DocumentRepository::new(pool.clone()),
            analyses: AnalysisRepository::new(pool.clone()),
            analyzer: DocumentAnalyzer::new(pool.clone(), generator),
            pdf_processor: Arc::new(PdfProcessor::new()),
            pool,
        }
    }
}

pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                // Any origin, method and header, with credentials.
                .layer(CorsLayer::very_permissive())
                .layer(DefaultBodyLimit::max(server.max_request_size)),
        )
        .with_state(state)
}
