//! Title normalization for change detection.

/// Decode HTML entities and trim surrounding whitespace.
///
/// Feed and store can disagree on entity encoding for the same text
/// (`A &amp; B` vs `A & B`); comparing normalized forms keeps such
/// encoding-only differences from spawning phantom versions.
pub fn normalize_title(raw: &str) -> String {
    html_escape::decode_html_entities(raw).trim().to_string()
}
