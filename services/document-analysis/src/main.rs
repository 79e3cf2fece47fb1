use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use doc_analyzer_database::{initialize_database, DatabaseConfig};
use doc_analyzer_service::{create_app, llm_client::GeminiClient, AppState};
use doc_analyzer_utils::{init_logging, AppConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_logging(&config.logging)?;
    info!("Starting Doc Analyzer");

    if !config.llm.has_api_key() {
        warn!("No Gemini API key configured; analysis requests will fail");
    }

    let pool = initialize_database(&DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
    })
    .await?;
    info!("Database ready");

    let generator = Arc::new(GeminiClient::new(&config.llm));
    let app = create_app(AppState::new(pool, generator), &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Doc Analyzer listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}
