use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AnalyzerError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("{message}")]
    Decode { message: String },

    #[error("{reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("{message}")]
    Analysis { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AnalyzerError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn malformed_response(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap a repository failure, keeping its context chain.
    pub fn storage(error: anyhow::Error) -> Self {
        Self::database(format!("{:#}", error))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Self::Analysis { .. } => "ANALYSIS_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Decode { .. } => 500,
            Self::MalformedResponse { .. } => 500,
            Self::Analysis { .. } => 500,
            Self::Database { .. } => 500,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// Message placed in the `error` key of the response body.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::NotFound { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl From<&AnalyzerError> for ErrorResponse {
    fn from(error: &AnalyzerError) -> Self {
        let raw = match error {
            AnalyzerError::MalformedResponse { raw, .. } => Some(raw.clone()),
            _ => None,
        };

        Self {
            error: error.client_message(),
            raw,
        }
    }
}

impl IntoResponse for AnalyzerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.error_code(), error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

// Conversion from common error types
impl From<sqlx::Error> for AnalyzerError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string())
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(error: reqwest::Error) -> Self {
        Self::analysis(format!("Gemini API request failed: {}", error))
    }
}

// Extractor rejections become JSON error bodies like every other failure.
impl From<JsonRejection> for AnalyzerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("body", format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AnalyzerError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation("id", format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AnalyzerError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::validation("file", format!("Invalid upload: {}", rejection.body_text()))
    }
}

impl From<config::ConfigError> for AnalyzerError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(error: AnalyzerError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(AnalyzerError::not_found("Document not found.")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Document not found."}));
    }

    #[tokio::test]
    async fn test_malformed_response_keeps_raw_text() {
        let error = AnalyzerError::malformed_response("Gemini response not valid JSON", "not json");
        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Gemini response not valid JSON");
        assert_eq!(body["raw"], "not json");
    }

    #[tokio::test]
    async fn test_validation_body_uses_plain_message() {
        let error = AnalyzerError::validation("file", "File must be a PDF");
        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "File must be a PDF"}));
    }

    #[test]
    fn test_config_error_is_configuration() {
        let error = AnalyzerError::from(config::ConfigError::Message("invalid port".to_string()));

        assert_eq!(error.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(error.to_string(), "Configuration error: invalid port");
    }

    #[test]
    fn test_storage_error_is_database() {
        let error = AnalyzerError::storage(anyhow::anyhow!("disk full").context("Failed to create document"));

        assert_eq!(error.error_code(), "DATABASE_ERROR");
        assert!(error.to_string().contains("Failed to create document: disk full"));
    }
}
