//! Marker-anchored token search
//!
//! Summaries label their digests in many ways ("Wasm module hash:",
//! "sha256 of the arg", a bare table column). The search looks for a
//! labelled token first and only falls back to "any token" when no label
//! is present at all.

use regex::{Match, Regex};
use std::sync::LazyLock;

/// Characters searched before a marker occurrence by default
pub const DEFAULT_WINDOW_BEFORE: usize = 600;

/// Characters searched after a marker occurrence by default
pub const DEFAULT_WINDOW_AFTER: usize = 1200;

static HEX64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:0x)?[0-9a-fA-F]{64}\b").expect("valid digest regex"));

/// Search window around a marker occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Characters before the occurrence
    pub before: usize,
    /// Characters after the occurrence
    pub after: usize,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            before: DEFAULT_WINDOW_BEFORE,
            after: DEFAULT_WINDOW_AFTER,
        }
    }
}

/// Find a 64-hex digest near the highest-priority marker present
///
/// Markers are tried in the given order; for the first marker whose
/// case-insensitive occurrence has a digest in its window, that digest is
/// returned. If no marker occurs anywhere, the first digest in the text is
/// returned. Result is lower-case without `0x`.
///
/// # Examples
///
/// ```
/// use veritas_scanner::find_digest_near_markers;
///
/// let a = "a".repeat(64);
/// let b = "b".repeat(64);
/// let text = format!("hash: {a}\n...\nWasm module hash: {b}");
/// let found = find_digest_near_markers(&text, &["module hash", "hash"]);
/// assert_eq!(found, Some(b));
/// ```
pub fn find_digest_near_markers<S: AsRef<str>>(text: &str, markers: &[S]) -> Option<String> {
    find_digest_near_markers_in(text, markers, Window::default())
}

/// [`find_digest_near_markers`] with an explicit window
pub fn find_digest_near_markers_in<S: AsRef<str>>(
    text: &str,
    markers: &[S],
    window: Window,
) -> Option<String> {
    let mut any_marker_present = false;

    for marker in markers {
        let Some(at) = find_marker(text, marker.as_ref()) else {
            continue;
        };
        any_marker_present = true;
        if let Some(token) = token_in_window(&HEX64, text, at, window) {
            return Some(clean_digest(token.as_str()));
        }
    }

    if any_marker_present {
        return None;
    }
    first_digest(text)
}

/// First 64-hex digest anywhere in `text`
pub(crate) fn first_digest(text: &str) -> Option<String> {
    HEX64.find(text).map(|m| clean_digest(m.as_str()))
}

/// Like [`find_digest_near_markers_in`] but without the unlabelled fallback
pub fn find_labelled_digest<S: AsRef<str>>(
    text: &str,
    markers: &[S],
    window: Window,
) -> Option<String> {
    find_labelled_token(&HEX64, text, markers, window).map(|t| clean_digest(&t))
}

/// Find a `pattern` match in the window of the highest-priority marker
pub fn find_labelled_token<S: AsRef<str>>(
    pattern: &Regex,
    text: &str,
    markers: &[S],
    window: Window,
) -> Option<String> {
    markers.iter().find_map(|marker| {
        let at = find_marker(text, marker.as_ref())?;
        token_in_window(pattern, text, at, window).map(|m| m.as_str().to_string())
    })
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `marker`
fn find_marker(text: &str, marker: &str) -> Option<usize> {
    let marker = marker.trim();
    if marker.is_empty() {
        return None;
    }
    // ASCII lower-casing keeps byte offsets aligned with `text`.
    text.to_ascii_lowercase().find(&marker.to_ascii_lowercase())
}

/// Pick the token for a marker at byte offset `at`
///
/// Only tokens lying wholly inside the window count. Labels normally precede
/// their value, so the first token at or after the marker wins; otherwise the
/// closest token before it.
fn token_in_window<'t>(
    pattern: &Regex,
    text: &'t str,
    at: usize,
    window: Window,
) -> Option<Match<'t>> {
    let lo = if window.before == 0 {
        at
    } else {
        text[..at]
            .char_indices()
            .rev()
            .nth(window.before - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let hi = text[at..]
        .char_indices()
        .nth(window.after)
        .map(|(i, _)| at + i)
        .unwrap_or(text.len());

    let in_window: Vec<Match<'t>> = pattern
        .find_iter(text)
        .filter(|m| m.start() >= lo && m.end() <= hi)
        .collect();

    in_window
        .iter()
        .find(|m| m.start() >= at)
        .or_else(|| in_window.iter().rev().find(|m| m.end() <= at))
        .copied()
}

fn clean_digest(token: &str) -> String {
    token
        .strip_prefix("0x")
        .unwrap_or(token)
        .to_ascii_lowercase()
}
