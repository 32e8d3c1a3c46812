//! Mail-source collaborator — pure I/O, no business logic.
//!
//! The pipeline only needs two capabilities: list recent message ids and
//! fetch one full message. Authentication and session lifecycle belong
//! entirely to the implementation (or to whoever provisions its token).

pub mod gmail;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SourceError;

pub use gmail::GmailSource;

/// A raw provider message in the Gmail "full" shape: headers plus a nested,
/// possibly multi-part payload carrying base64url body data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub payload: RawPart,
}

/// One payload node — either a leaf part with body data or a container with
/// child parts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<RawPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

impl RawMessage {
    /// Look up a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Trait for mail providers.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// List up to `limit` recent message ids, most recent first. An empty
    /// list is a valid result, not an error.
    async fn list_recent_ids(&self, limit: usize) -> Result<Vec<String>, SourceError>;

    /// Fetch one full message by id.
    async fn fetch_full(&self, id: &str) -> Result<RawMessage, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let msg: RawMessage = serde_json::from_str(
            r#"{
                "id": "m1",
                "payload": {
                    "mimeType": "text/plain",
                    "headers": [
                        {"name": "Subject", "value": "Hello"},
                        {"name": "From", "value": "alice@example.com"}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(msg.header("subject"), Some("Hello"));
        assert_eq!(msg.header("FROM"), Some("alice@example.com"));
        assert_eq!(msg.header("Date"), None);
    }

    #[test]
    fn deserializes_nested_multipart_payload() {
        let msg: RawMessage = serde_json::from_str(
            r#"{
                "id": "m2",
                "payload": {
                    "mimeType": "multipart/alternative",
                    "headers": [],
                    "parts": [
                        {"mimeType": "text/plain", "body": {"data": "aGk"}},
                        {"mimeType": "text/html", "body": {"data": "PGI-aGk8L2I-"}}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(msg.payload.parts.len(), 2);
        assert_eq!(msg.payload.parts[0].mime_type, "text/plain");
    }

    #[test]
    fn missing_payload_defaults_to_empty() {
        let msg: RawMessage = serde_json::from_str(r#"{"id": "m3"}"#).unwrap();
        assert!(msg.payload.parts.is_empty());
        assert!(msg.payload.body.is_none());
    }
}
