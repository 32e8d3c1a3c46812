//! Pipeline — composes the mail source, cache, and classifier into one
//! batch run.
//!
//! Only mail-source failures propagate. Cache trouble degrades to misses and
//! model trouble degrades to the fallback analysis, both inside their own
//! layers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CACHE_TTL, Cache};
use crate::error::PipelineError;
use crate::fingerprint;
use crate::pipeline::classifier::Classifier;
use crate::pipeline::types::{EnrichedMessage, Message};
use crate::source::MailSource;

/// Batch triage pipeline. Stateless across runs; all collaborators are
/// injected.
pub struct Pipeline {
    source: Arc<dyn MailSource>,
    cache: Arc<dyn Cache>,
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(source: Arc<dyn MailSource>, cache: Arc<dyn Cache>, classifier: Classifier) -> Self {
        Self {
            source,
            cache,
            classifier,
        }
    }

    /// Triage up to `limit` recent messages, most recent first.
    ///
    /// Two sequential phases: fetch every message (cache-or-provider), then
    /// classify every message, preserving listed order throughout. An empty
    /// listing is a valid terminal state and performs no model work.
    pub async fn run(&self, limit: usize) -> Result<Vec<EnrichedMessage>, PipelineError> {
        let ids = self.source.list_recent_ids(limit).await?;
        if ids.is_empty() {
            info!("No recent messages to triage");
            return Ok(Vec::new());
        }
        info!(count = ids.len(), "Fetching messages");

        let mut messages = Vec::with_capacity(ids.len());
        for id in &ids {
            messages.push(self.load_message(id).await?);
        }

        let mut enriched = Vec::with_capacity(messages.len());
        for message in messages {
            let analysis = self.classifier.classify(&message).await;
            enriched.push(EnrichedMessage { message, analysis });
        }

        info!(count = enriched.len(), "Batch triage complete");
        Ok(enriched)
    }

    /// Fetch one message, consulting the message cache first.
    async fn load_message(&self, id: &str) -> Result<Message, PipelineError> {
        let key = fingerprint::message_key(id);

        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<Message>(&cached) {
                Ok(message) => {
                    debug!(id, "Message cache hit, skipping fetch");
                    return Ok(message);
                }
                Err(e) => {
                    warn!(id, error = %e, "Cached message unreadable, re-fetching");
                }
            }
        }

        let raw = self.source.fetch_full(id).await?;
        let message = Message::from_raw(&raw);

        match serde_json::to_string(&message) {
            Ok(json) => self.cache.set(&key, &json, CACHE_TTL).await,
            Err(e) => warn!(id, error = %e, "Failed to serialize message for caching"),
        }

        Ok(message)
    }
}
