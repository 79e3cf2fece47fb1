//! Document Repository
//!
//! Append-only storage of uploaded documents.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use doc_analyzer_models::{Document, NewDocument};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a document inside the caller's transaction.
    pub async fn create(&self, conn: &mut SqliteConnection, document: &NewDocument) -> Result<Document> {
        let row: Document = sqlx::query_as(
            r#"
            INSERT INTO documents (filename, content, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, filename, content, created_at
            "#,
        )
        .bind(&document.filename)
        .bind(&document.content)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create document")?;

        Ok(row)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Document>> {
        let row: Option<Document> = sqlx::query_as(
            "SELECT id, filename, content, created_at FROM documents WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        Ok(row)
    }

    pub async fn find_all(&self) -> Result<Vec<Document>> {
        let rows: Vec<Document> = sqlx::query_as(
            "SELECT id, filename, content, created_at FROM documents ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch documents")?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_sqlite_pool, migrations::run_sqlite_migrations};

    async fn setup() -> DocumentRepository {
        let pool = create_sqlite_pool("sqlite::memory:", 1).await.unwrap();
        run_sqlite_migrations(&pool).await.unwrap();
        DocumentRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_fetch_document() {
        let repo = setup().await;

        let mut tx = repo.pool.begin().await.unwrap();
        let created = repo
            .create(&mut tx, &NewDocument::new("invoice.pdf", "INVOICE #123"))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(created.id, 1);
        assert!(created.created_at.is_some());

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_uncommitted_document_is_discarded() {
        let repo = setup().await;

        {
            let mut tx = repo.pool.begin().await.unwrap();
            repo.create(&mut tx, &NewDocument::new("draft.pdf", "draft"))
                .await
                .unwrap();
        }

        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let repo = setup().await;
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }
}
