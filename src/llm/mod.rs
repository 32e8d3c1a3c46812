//! Model collaborator — a single text-generation call behind a trait.
//!
//! The classifier only ever needs `generate(prompt, max_tokens,
//! temperature) -> text`. Production uses [`HttpModel`] against any
//! OpenAI-compatible chat-completions endpoint; tests substitute counting
//! fakes.

pub mod http;

use async_trait::async_trait;

use crate::error::ModelError;

pub use http::HttpModel;

/// Trait for text-generation backends.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Model name, for logging.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`. The prompt is not echoed back.
    ///
    /// Blank output is a valid `Ok` — callers decide whether that counts as
    /// usable.
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError>;
}
