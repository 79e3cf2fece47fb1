use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An uploaded PDF and its extracted text. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the caller when storing a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub content: String,
}

impl NewDocument {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}
