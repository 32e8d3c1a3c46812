//! Shared domain types for the classification pipeline.

use serde::{Deserialize, Serialize};

use crate::extract;
use crate::source::RawMessage;

// ── Message ─────────────────────────────────────────────────────────

/// A normalized email message — the pipeline's unit of work.
///
/// Built once from a raw provider payload, then immutable. `body` is the
/// extractor's bounded plain-text excerpt (≤ 500 chars). `date` is kept as
/// the provider's opaque header string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub date: String,
    pub body: String,
}

impl Message {
    /// Assemble a message from a raw provider payload. Missing headers
    /// become empty strings — the data model is opaque strings throughout.
    pub fn from_raw(raw: &RawMessage) -> Self {
        Self {
            id: raw.id.clone(),
            sender: raw.header("From").unwrap_or_default().to_string(),
            subject: raw.header("Subject").unwrap_or_default().to_string(),
            date: raw.header("Date").unwrap_or_default().to_string(),
            body: extract::extract(&raw.payload),
        }
    }
}

// ── Analysis ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Work,
    School,
    Shopping,
    Social,
    Finance,
    Newsletter,
    Spam,
    Personal,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    Important,
    Normal,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeedsResponse {
    Yes,
    No,
    Maybe,
}

/// Classification result: exactly these three fields.
///
/// `deny_unknown_fields` plus typed enums make the "no more, no fewer"
/// invariant structural — a model response with extra keys or out-of-enum
/// values fails the strict parse and takes the repair/fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Analysis {
    pub category: Category,
    pub priority: Priority,
    pub needs_response: NeedsResponse,
}

impl Analysis {
    /// The fixed fallback returned whenever classification cannot complete.
    pub fn fallback() -> Self {
        Self {
            category: Category::Other,
            priority: Priority::Normal,
            needs_response: NeedsResponse::Maybe,
        }
    }
}

// ── Enriched message ────────────────────────────────────────────────

/// A message paired with its analysis — the pipeline's output unit.
///
/// Exists only transiently; its two halves are cached separately, never the
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedMessage {
    pub message: Message,
    pub analysis: Analysis,
}
