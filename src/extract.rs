//! Content extraction — turns a raw provider payload into a bounded
//! plain-text excerpt.
//!
//! Pure functions only: no network, no cache. Anything missing or
//! undecodable yields an empty string, never an error.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use regex::Regex;

use crate::source::RawPart;

/// Hard cap on extracted body length, in characters.
pub const MAX_BODY_CHARS: usize = 500;

/// Permissive tag-removal rule: anything between `<` and `>`.
///
/// Deliberately not an HTML parser — malformed markup may leave artifacts
/// behind, and that is accepted rather than papered over.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Extract a normalized plain-text body from a message payload.
///
/// Multi-part payloads prefer the first `text/plain` part, falling back to
/// the first `text/html` part with tags stripped. Single-part payloads are
/// sniffed for an html/body marker. The result is whitespace-collapsed,
/// trimmed, and truncated to [`MAX_BODY_CHARS`] characters.
pub fn extract(payload: &RawPart) -> String {
    let text = if payload.parts.is_empty() {
        extract_single_part(payload)
    } else {
        extract_multipart(&payload.parts)
    };
    normalize(&text)
}

fn extract_multipart(parts: &[RawPart]) -> String {
    if let Some(plain) = parts.iter().find(|p| p.mime_type == "text/plain") {
        return decode_part(plain);
    }
    if let Some(html) = parts.iter().find(|p| p.mime_type == "text/html") {
        return strip_tags(&decode_part(html));
    }
    String::new()
}

fn extract_single_part(payload: &RawPart) -> String {
    let decoded = decode_part(payload);
    let lowered = decoded.to_lowercase();
    if lowered.contains("<html") || lowered.contains("<body") {
        strip_tags(&decoded)
    } else {
        decoded
    }
}

/// Decode a part's base64url body data. Absent or undecodable data is empty.
fn decode_part(part: &RawPart) -> String {
    let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) else {
        return String::new();
    };
    match URL_SAFE_NO_PAD.decode(data.trim_end_matches('=')) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

/// Remove everything between `<` and `>`.
fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, " ").into_owned()
}

/// Collapse whitespace runs to single spaces, trim, and truncate.
fn normalize(text: &str) -> String {
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    collapsed.join(" ").chars().take(MAX_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PartBody;

    fn encode(text: &str) -> String {
        URL_SAFE_NO_PAD.encode(text.as_bytes())
    }

    fn part(mime_type: &str, text: &str) -> RawPart {
        RawPart {
            mime_type: mime_type.into(),
            headers: vec![],
            body: Some(PartBody {
                data: Some(encode(text)),
            }),
            parts: vec![],
        }
    }

    #[test]
    fn single_part_plain_text() {
        let payload = part("text/plain", "Hello there, quick question about the invoice.");
        assert_eq!(
            extract(&payload),
            "Hello there, quick question about the invoice."
        );
    }

    #[test]
    fn single_part_html_marker_strips_tags() {
        let payload = part(
            "text/plain",
            "<html><body><p>Your order has <b>shipped</b>.</p></body></html>",
        );
        assert_eq!(extract(&payload), "Your order has shipped .");
    }

    #[test]
    fn multipart_prefers_first_plain_text() {
        let mut payload = part("multipart/alternative", "");
        payload.body = None;
        payload.parts = vec![
            part("text/html", "<p>html version</p>"),
            part("text/plain", "plain version"),
            part("text/plain", "second plain part"),
        ];
        assert_eq!(extract(&payload), "plain version");
    }

    #[test]
    fn multipart_falls_back_to_html() {
        let mut payload = part("multipart/alternative", "");
        payload.body = None;
        payload.parts = vec![part("text/html", "<div>Only <i>html</i> here</div>")];
        assert_eq!(extract(&payload), "Only html here");
    }

    #[test]
    fn multipart_with_no_text_parts_is_empty() {
        let mut payload = part("multipart/mixed", "");
        payload.body = None;
        payload.parts = vec![part("image/png", "not-text")];
        assert_eq!(extract(&payload), "");
    }

    #[test]
    fn missing_body_data_is_empty() {
        let payload = RawPart {
            mime_type: "text/plain".into(),
            headers: vec![],
            body: None,
            parts: vec![],
        };
        assert_eq!(extract(&payload), "");
    }

    #[test]
    fn undecodable_data_is_empty() {
        let payload = RawPart {
            mime_type: "text/plain".into(),
            headers: vec![],
            body: Some(PartBody {
                data: Some("!!! not base64 !!!".into()),
            }),
            parts: vec![],
        };
        assert_eq!(extract(&payload), "");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        let payload = part("text/plain", "  lots\n\nof\t\t  whitespace \r\n here  ");
        assert_eq!(extract(&payload), "lots of whitespace here");
    }

    #[test]
    fn truncation_law_holds_for_long_bodies() {
        let long = "word ".repeat(500);
        let payload = part("text/plain", &long);
        let body = extract(&payload);
        assert_eq!(body.chars().count(), MAX_BODY_CHARS);
        assert!(!body.starts_with(' '));
        assert!(!body.contains("  "));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let long = "é".repeat(600);
        let payload = part("text/plain", &long);
        assert_eq!(extract(&payload).chars().count(), MAX_BODY_CHARS);
    }

    #[test]
    fn malformed_markup_is_best_effort() {
        // Unclosed bracket: everything after `<` up to the next `>` goes,
        // the dangling tail stays. Documented limitation.
        let payload = part("text/plain", "<html>before <broken after");
        assert_eq!(extract(&payload), "before <broken after");
    }
}
