use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::AnalyzerResult;

/// Environment variable consulted when `llm.api_key` is not configured.
pub const API_KEY_FALLBACK_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> AnalyzerResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("DOC_ANALYZER").separator("__"));

        let mut app_config: AppConfig = config.build()?.try_deserialize()?;
        app_config.llm.apply_key_fallback(env::var(API_KEY_FALLBACK_VAR).ok());

        Ok(app_config)
    }
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn apply_key_fallback(&mut self, fallback: Option<String>) {
        if self.has_api_key() {
            return;
        }
        if let Some(key) = fallback {
            self.api_key = key;
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_request_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://doc_analyzer.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_key_wins_over_fallback() {
        let mut llm = LlmConfig {
            api_key: "configured".to_string(),
            ..LlmConfig::default()
        };
        llm.apply_key_fallback(Some("from-env".to_string()));
        assert_eq!(llm.api_key, "configured");
    }

    #[test]
    fn test_fallback_fills_empty_key() {
        let mut llm = LlmConfig::default();
        assert!(!llm.has_api_key());

        llm.apply_key_fallback(Some("from-env".to_string()));
        assert_eq!(llm.api_key, "from-env");
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("server.port", 9100)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }
}
