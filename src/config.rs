use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::{ChunkingStrategy, QaSettings};
use crate::infrastructure::external_services::{CompletionClientConfig, EmbeddingsClientConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// `None` keeps the knowledge base in memory.
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    pub embeddings: EmbeddingsClientConfig,
    pub completion: CompletionClientConfig,
    pub chunk_strategy: ChunkingStrategy,
    pub chunk_size: usize,
    pub qa: QaSettings,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let embedding_defaults = EmbeddingsClientConfig::default();
        let completion_defaults = CompletionClientConfig::default();
        let qa_defaults = QaSettings::default();

        Ok(Self {
            port: parse(&get, "PORT", 8000)?,
            database_url: get("DATABASE_URL"),
            database_pool_size: parse(&get, "DATABASE_POOL_SIZE", 10)?,
            embeddings: EmbeddingsClientConfig {
                service_url: get("EMBEDDINGS_SERVICE_URL").unwrap_or(embedding_defaults.service_url),
                max_retries: parse(&get, "EMBEDDINGS_MAX_RETRIES", embedding_defaults.max_retries)?,
                timeout_secs: parse(&get, "EMBEDDINGS_TIMEOUT_SECS", embedding_defaults.timeout_secs)?,
                backoff_factor: embedding_defaults.backoff_factor,
                initial_backoff: Duration::from_secs(1),
            },
            completion: CompletionClientConfig {
                api_url: get("LLM_API_URL").unwrap_or(completion_defaults.api_url),
                api_key: get("LLM_API_KEY")
                    .or_else(|| get("GROQ_API_KEY"))
                    .unwrap_or_default(),
                model: get("LLM_MODEL").unwrap_or(completion_defaults.model),
                max_tokens: parse(&get, "LLM_MAX_TOKENS", completion_defaults.max_tokens)?,
                temperature: parse(&get, "LLM_TEMPERATURE", completion_defaults.temperature)?,
                timeout_secs: completion_defaults.timeout_secs,
            },
            chunk_strategy: parse(&get, "CHUNK_STRATEGY", ChunkingStrategy::FixedSize)?,
            chunk_size: parse(&get, "CHUNK_SIZE", 500)?,
            qa: QaSettings {
                text_top_k: parse(&get, "QA_TEXT_TOP_K", qa_defaults.text_top_k)?,
                table_top_k: parse(&get, "QA_TABLE_TOP_K", qa_defaults.table_top_k)?,
                context_text_chunks: parse(
                    &get,
                    "QA_CONTEXT_TEXT_CHUNKS",
                    qa_defaults.context_text_chunks,
                )?,
                context_tables: parse(&get, "QA_CONTEXT_TABLES", qa_defaults.context_tables)?,
                min_similarity: parse(&get, "QA_MIN_SIMILARITY", qa_defaults.min_similarity)?,
            },
            max_upload_bytes: parse(&get, "MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
        })
    }
}

fn parse<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                value,
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.port, 8000);
        assert!(config.database_url.is_none());
        assert_eq!(config.embeddings.service_url, "http://localhost:8080/embed");
        assert_eq!(config.embeddings.max_retries, 3);
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(config.chunk_strategy, ChunkingStrategy::FixedSize);
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.qa, QaSettings::default());
        assert_eq!(config.max_upload_bytes, 52_428_800);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/docqa"),
            ("GROQ_API_KEY", "gsk"),
            ("CHUNK_STRATEGY", "recursive"),
            ("QA_MIN_SIMILARITY", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/docqa"));
        assert_eq!(config.completion.api_key, "gsk");
        assert_eq!(config.chunk_strategy, ChunkingStrategy::Recursive);
        assert_eq!(config.qa.min_similarity, 0.25);
    }

    #[test]
    fn test_llm_key_wins_over_groq_key() {
        let config = config(&[("LLM_API_KEY", "primary"), ("GROQ_API_KEY", "fallback")]).unwrap();
        assert_eq!(config.completion.api_key, "primary");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("DATABASE_URL", "  "), ("PORT", "")]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_invalid_number() {
        let result = config(&[("CHUNK_SIZE", "lots")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "CHUNK_SIZE", .. })
        ));
    }
}
