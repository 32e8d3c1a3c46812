//! Classifier — invokes the model with a constrained prompt and coerces the
//! free-text output into an [`Analysis`] via the repair/parse procedure.
//!
//! `classify` is total: no model-response shape can make it fail. The only
//! nondeterminism is the model itself; with a warm cache the model is never
//! consulted.

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::cache::{CACHE_TTL, Cache};
use crate::fingerprint;
use crate::llm::TextModel;
use crate::pipeline::types::{Analysis, Message};

/// Output budget for a classification call — the answer is one small object.
const CLASSIFY_MAX_TOKENS: u32 = 200;

/// Low but nonzero temperature.
const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// How much of the body the prompt embeds.
const PROMPT_BODY_CHARS: usize = 300;

/// How much repaired text a parse-failure diagnostic carries.
const DIAGNOSTIC_CHARS: usize = 120;

/// The three required fields and the defaults used to patch them into
/// partially-complete objects.
const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("category", "Other"),
    ("priority", "Normal"),
    ("needs_response", "Maybe"),
];

/// Minimal brace-delimited spans, newlines included.
static SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

/// Cache-aware message classifier.
pub struct Classifier {
    model: Arc<dyn TextModel>,
    cache: Arc<dyn Cache>,
}

impl Classifier {
    pub fn new(model: Arc<dyn TextModel>, cache: Arc<dyn Cache>) -> Self {
        Self { model, cache }
    }

    /// Classify a message, consulting the analysis cache first.
    ///
    /// Failure policy (see DESIGN.md): a failed or blank model call caches
    /// the fallback (repeating the call within the TTL window would fail the
    /// same way); an unparseable response returns the fallback uncached (a
    /// fresh sample may parse).
    pub async fn classify(&self, message: &Message) -> Analysis {
        let key = fingerprint::analysis_key(&message.sender, &message.subject, &message.body);

        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<Analysis>(&cached) {
                Ok(analysis) => {
                    debug!(id = %message.id, "Analysis cache hit, skipping model call");
                    return analysis;
                }
                Err(e) => {
                    warn!(id = %message.id, error = %e, "Cached analysis unreadable, re-classifying");
                }
            }
        }

        let prompt = build_prompt(message);
        let raw = match self
            .model
            .generate(&prompt, CLASSIFY_MAX_TOKENS, CLASSIFY_TEMPERATURE)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(id = %message.id, "Model returned blank output, using fallback");
                return self.cached_fallback(&key).await;
            }
            Err(e) => {
                warn!(id = %message.id, error = %e, "Model call failed, using fallback");
                return self.cached_fallback(&key).await;
            }
        };

        let repaired = repair(&raw);
        match parse_candidates(&repaired) {
            Some(analysis) => {
                self.store(&key, analysis).await;
                analysis
            }
            None => {
                let excerpt: String = repaired.chars().take(DIAGNOSTIC_CHARS).collect();
                warn!(id = %message.id, %excerpt, "Unparseable model output, using fallback");
                Analysis::fallback()
            }
        }
    }

    /// Fallback for model-level failure — cached so the same fingerprint
    /// does not hammer a failing model within the TTL window.
    async fn cached_fallback(&self, key: &str) -> Analysis {
        let fallback = Analysis::fallback();
        self.store(key, fallback).await;
        fallback
    }

    async fn store(&self, key: &str, analysis: Analysis) {
        match serde_json::to_string(&analysis) {
            Ok(json) => self.cache.set(key, &json, CACHE_TTL).await,
            Err(e) => warn!(error = %e, "Failed to serialize analysis for caching"),
        }
    }
}

// ── Prompt construction ─────────────────────────────────────────────

fn build_prompt(message: &Message) -> String {
    let body_excerpt: String = message.body.chars().take(PROMPT_BODY_CHARS).collect();
    format!(
        "You are an email triage engine. Respond with ONLY a JSON object with exactly three keys:\n\
         {{\"category\": \"...\", \"priority\": \"...\", \"needs_response\": \"...\"}}\n\n\
         Allowed values:\n\
         - category: Work, School, Shopping, Social, Finance, Newsletter, Spam, Personal, Other\n\
         - priority: Urgent, Important, Normal, Low\n\
         - needs_response: Yes, No, Maybe\n\n\
         No explanations, no markdown, no extra keys.\n\n\
         From: {}\nSubject: {}\nBody: {}",
        message.sender, message.subject, body_excerpt
    )
}

// ── Repair and parse ────────────────────────────────────────────────

/// Heuristic text patching applied before structured parsing.
///
/// 1. Rebalance a truncated object by appending one `}` when `{` outnumbers
///    `}`.
/// 2. Patch in any missing required field with its default, so a partially
///    complete object parses without a re-generation.
fn repair(raw: &str) -> String {
    let mut text = raw.to_string();

    if text.matches('{').count() > text.matches('}').count() {
        text.push('}');
    }

    for (field, default) in REQUIRED_FIELDS {
        let quoted = format!("\"{field}\"");
        if !text.contains(&quoted) {
            let trimmed = text.trim_end();
            let without_brace = trimmed.strip_suffix('}').unwrap_or(trimmed);
            text = format!("{without_brace}, {quoted}: \"{default}\"}}");
        }
    }

    text
}

/// Strict-parse every brace-delimited span, last-occurring first.
///
/// Models that think out loud tend to put the authoritative answer last, so
/// the final span that parses wins.
fn parse_candidates(repaired: &str) -> Option<Analysis> {
    let candidates: Vec<&str> = SPAN_RE.find_iter(repaired).map(|m| m.as_str()).collect();
    candidates
        .iter()
        .rev()
        .find_map(|span| serde_json::from_str::<Analysis>(span).ok())
}
