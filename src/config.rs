//! Configuration types — everything comes from environment variables.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default number of recent messages to triage per run.
const DEFAULT_LIMIT: usize = 10;

/// Runtime configuration for the triage binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI-compatible chat-completions endpoint.
    pub model_endpoint: String,
    /// Model identifier sent in the request body.
    pub model_id: String,
    /// API key for the model endpoint.
    pub model_api_key: SecretString,
    /// Log raw prompts and responses at debug level.
    pub model_verbose: bool,
    /// OAuth bearer token for the Gmail REST API. Token acquisition and
    /// refresh are not this crate's concern.
    pub gmail_token: SecretString,
    /// Path to the cache database file.
    pub cache_path: String,
    /// How many recent messages to process per run.
    pub limit: usize,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// `MODEL_API_KEY` and `GMAIL_TOKEN` are required; everything else has a
    /// default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model_api_key = std::env::var("MODEL_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("MODEL_API_KEY".into()))?;
        let gmail_token = std::env::var("GMAIL_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("GMAIL_TOKEN".into()))?;

        let model_endpoint = std::env::var("MODEL_ENDPOINT")
            .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string());
        let model_id =
            std::env::var("MODEL_ID").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let model_verbose = std::env::var("MODEL_VERBOSE")
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let cache_path = std::env::var("TRIAGE_CACHE_PATH")
            .unwrap_or_else(|_| "./data/triage-cache.db".to_string());

        let limit = match std::env::var("TRIAGE_LIMIT") {
            Ok(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TRIAGE_LIMIT".into(),
                message: format!("expected a positive integer, got '{s}'"),
            })?,
            Err(_) => DEFAULT_LIMIT,
        };

        Ok(Self {
            model_endpoint,
            model_id,
            model_api_key: SecretString::from(model_api_key),
            model_verbose,
            gmail_token: SecretString::from(gmail_token),
            cache_path,
            limit,
        })
    }
}
