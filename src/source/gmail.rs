//! Gmail REST implementation of [`MailSource`].
//!
//! Thin glue over `users/me/messages` with a pre-provisioned OAuth bearer
//! token. Read-only; no token acquisition or refresh here.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::source::{MailSource, RawMessage};

const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// Gmail REST client.
pub struct GmailSource {
    http: reqwest::Client,
    token: SecretString,
    base_url: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Deserialize)]
struct MessageRef {
    id: String,
}

impl GmailSource {
    pub fn new(token: SecretString) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    /// Override the API base URL (for tests against a local stub).
    pub fn with_base_url(token: SecretString, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, SourceError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| SourceError::List(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| SourceError::List(format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl MailSource for GmailSource {
    async fn list_recent_ids(&self, limit: usize) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/users/me/messages?maxResults={limit}",
            self.base_url
        );
        let resp: ListResponse = self.get_json(&url).await?;
        debug!(count = resp.messages.len(), "Listed recent messages");
        Ok(resp.messages.into_iter().map(|m| m.id).collect())
    }

    async fn fetch_full(&self, id: &str) -> Result<RawMessage, SourceError> {
        let url = format!("{}/users/me/messages/{id}?format=full", self.base_url);
        self.get_json::<RawMessage>(&url)
            .await
            .map_err(|e| match e {
                SourceError::Status { status, body } => SourceError::Status { status, body },
                other => SourceError::Fetch {
                    id: id.to_string(),
                    reason: other.to_string(),
                },
            })
    }
}
