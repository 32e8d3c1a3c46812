//! Cache key derivation.
//!
//! Raw messages and analyses share one key space, partitioned by namespace
//! prefix so the two can never collide.

/// Namespace prefix for cached raw messages.
const MESSAGE_NS: &str = "email:";

/// Namespace prefix for cached analyses.
const ANALYSIS_NS: &str = "analysis:";

/// How many leading body characters participate in the fingerprint.
const FINGERPRINT_BODY_CHARS: usize = 100;

/// Cache key for a raw message, keyed by provider id.
pub fn message_key(id: &str) -> String {
    format!("{MESSAGE_NS}{id}")
}

/// Cache key for an analysis — a content fingerprint over sender, subject,
/// and the first 100 body characters.
///
/// Two messages that agree on those three things map to the same key and
/// short-circuit re-classification. That is an intentional approximation,
/// not exact-content matching.
pub fn analysis_key(sender: &str, subject: &str, body: &str) -> String {
    let prefix: String = body.chars().take(FINGERPRINT_BODY_CHARS).collect();
    let mut hasher = blake3::Hasher::new();
    hasher.update(sender.as_bytes());
    hasher.update(b":");
    hasher.update(subject.as_bytes());
    hasher.update(b":");
    hasher.update(prefix.as_bytes());
    format!("{ANALYSIS_NS}{}", hasher.finalize().to_hex())
}
