//! Error types for mail-triage.

use std::time::Duration;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail source error: {0}")]
    Source(#[from] SourceError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mail-source errors. The only failures that propagate out of
/// `Pipeline::run` — an unreachable provider is fatal for the batch.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to list messages: {0}")]
    List(String),

    #[error("Failed to fetch message {id}: {reason}")]
    Fetch { id: String, reason: String },

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Cache backing-store errors. Never surfaced to callers: the cache layer
/// swallows these and degrades to a miss / no-op.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to open cache store: {0}")]
    Open(String),

    #[error("Cache query failed: {0}")]
    Query(String),
}

/// Model collaborator errors. Recovered locally by the classifier via the
/// fallback analysis — never propagated.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model returned no usable output")]
    EmptyOutput,

    #[error("Invalid response from model endpoint: {0}")]
    InvalidResponse(String),
}

/// Pipeline-level errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Mail source error: {0}")]
    Source(#[from] SourceError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
