use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(detailed_health_check))
        .route("/upload", post(upload_document))
        .route("/documents", get(list_documents))
        .route("/documents/:id", get(get_document))
        .route("/documents/:id/analysis", get(list_document_analyses))
        .route("/analyze", post(analyze_document))
        .route("/analysis", get(list_analyses))
        .route("/analysis/:id", get(get_analysis))
}
