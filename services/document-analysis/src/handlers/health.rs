use axum::{extract::State, response::Json};
use doc_analyzer_database::health_check;
use serde_json::{json, Value};

use crate::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let database_status = match health_check(&state.pool).await {
        Ok(_) => json!({"status": "healthy", "message": "Connected"}),
        Err(e) => json!({"status": "unhealthy", "message": e.to_string()}),
    };

    let status = if database_status["status"] == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "service": "doc-analyzer",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "database": database_status
        }
    }))
}
