//! Analysis Repository
//!
//! Append-only storage of analysis results. No update or delete.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use doc_analyzer_models::{AnalysisResult, NewAnalysisResult};

const SELECT_COLUMNS: &str =
    "SELECT id, document_id, document_type, missing_fields, recommendations, created_at FROM analysis_results";

#[derive(Clone)]
pub struct AnalysisRepository {
    pool: SqlitePool,
}

impl AnalysisRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an analysis inside the caller's transaction.
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        analysis: &NewAnalysisResult,
    ) -> Result<AnalysisResult> {
        let missing_fields = AnalysisResult::encode_missing_fields(&analysis.missing_fields);

        let row: AnalysisResult = sqlx::query_as(
            r#"
            INSERT INTO analysis_results
                (document_id, document_type, missing_fields, recommendations, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, document_id, document_type, missing_fields, recommendations, created_at
            "#,
        )
        .bind(analysis.document_id)
        .bind(&analysis.document_type)
        .bind(&missing_fields)
        .bind(&analysis.recommendations)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create analysis result")?;

        Ok(row)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AnalysisResult>> {
        let row: Option<AnalysisResult> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch analysis result")?;

        Ok(row)
    }

    pub async fn find_all(&self) -> Result<Vec<AnalysisResult>> {
        let rows: Vec<AnalysisResult> = sqlx::query_as(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch analysis results")?;

        Ok(rows)
    }

    pub async fn find_by_document(&self, document_id: i64) -> Result<Vec<AnalysisResult>> {
        let rows: Vec<AnalysisResult> =
            sqlx::query_as(&format!("{} WHERE document_id = ?1 ORDER BY id ASC", SELECT_COLUMNS))
                .bind(document_id)
                .fetch_all(&self.pool)
                .await
                .context("Failed to fetch analysis results by document")?;

        Ok(rows)
    }
}
