//! HTTP chat-completions implementation of [`TextModel`].

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ModelError;
use crate::llm::TextModel;

/// Wall-clock bound per model call. A timeout is treated by callers exactly
/// like any other failed call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI-compatible chat-completions client.
pub struct HttpModel {
    http: reqwest::Client,
    endpoint: String,
    model_id: String,
    api_key: SecretString,
    verbose: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl HttpModel {
    pub fn new(
        endpoint: String,
        model_id: String,
        api_key: SecretString,
        verbose: bool,
    ) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::RequestFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            model_id,
            api_key,
            verbose,
        })
    }
}

#[async_trait]
impl TextModel for HttpModel {
    fn name(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError> {
        if self.verbose {
            debug!(model = %self.model_id, prompt, "Sending model request");
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({
                "model": self.model_id,
                "temperature": temperature,
                "max_tokens": max_tokens,
                "messages": [
                    { "role": "user", "content": prompt }
                ],
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(REQUEST_TIMEOUT)
                } else {
                    ModelError::RequestFailed(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::RequestFailed(format!(
                "status {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ModelError::EmptyOutput)?;

        if self.verbose {
            debug!(model = %self.model_id, response = %content, "Model response");
        }

        Ok(content)
    }
}
