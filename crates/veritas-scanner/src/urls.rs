//! URL extraction from free-form text

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'`]+"#).expect("valid URL regex"));

/// Characters that never end a URL in running text
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '\'', '"', ']', '}', '>'];

/// Find scheme-qualified URLs in `text`
///
/// Each match is sanitized (see [`sanitize_url`]); results are deduplicated
/// in first-seen order.
///
/// # Examples
///
/// ```
/// use veritas_scanner::find_urls;
///
/// assert_eq!(
///     find_urls("(see https://example.com/a.tar.zst)."),
///     vec!["https://example.com/a.tar.zst".to_string()]
/// );
/// ```
pub fn find_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    URL.find_iter(text)
        .filter_map(|m| sanitize_url(m.as_str()))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Byte offset just past the first match in `text` that sanitizes to `url`
///
/// Matches of a longer URL that merely starts with `url` are skipped.
pub(crate) fn url_end(text: &str, url: &str) -> Option<usize> {
    URL.find_iter(text)
        .find(|m| sanitize_url(m.as_str()).as_deref() == Some(url))
        .map(|m| m.start() + url.len())
}

/// Strip trailing punctuation picked up from the surrounding prose
///
/// Trailing `. , ; : ' " ] } >` are removed repeatedly; a trailing `)` is
/// removed only while the URL holds more `)` than `(`, so balanced
/// parentheses inside a path survive. Returns `None` if nothing but the
/// scheme remains.
pub fn sanitize_url(raw: &str) -> Option<String> {
    let mut url = raw.to_string();

    while let Some(last) = url.chars().last() {
        if TRAILING_PUNCTUATION.contains(&last) {
            url.pop();
        } else if last == ')' && url.matches(')').count() > url.matches('(').count() {
            url.pop();
        } else {
            break;
        }
    }

    let rest = url.split_once("://").map(|(_, rest)| rest)?;
    (!rest.is_empty()).then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesised_sentence() {
        assert_eq!(
            find_urls("(see https://example.com/a.tar.zst)."),
            vec!["https://example.com/a.tar.zst"]
        );
    }

    #[test]
    fn test_balanced_parentheses_kept() {
        assert_eq!(
            find_urls("ref https://en.wikipedia.org/wiki/Rust_(language), ok"),
            vec!["https://en.wikipedia.org/wiki/Rust_(language)"]
        );
    }

    #[test]
    fn test_markdown_link() {
        assert_eq!(
            find_urls("[release notes](https://github.com/dfinity/ic/releases/tag/v1)"),
            vec!["https://github.com/dfinity/ic/releases/tag/v1"]
        );
    }

    #[test]
    fn test_stacked_punctuation() {
        assert_eq!(
            find_urls("Download: https://example.com/x.wasm.gz]);:."),
            vec!["https://example.com/x.wasm.gz"]
        );
    }

    #[test]
    fn test_dedup_preserves_order() {
        let text = "https://b.example/1 https://a.example/2 https://b.example/1.";
        assert_eq!(find_urls(text), vec!["https://b.example/1", "https://a.example/2"]);
    }

    #[test]
    fn test_scheme_only_is_dropped() {
        assert!(find_urls("broken https://. link").is_empty());
    }

    #[test]
    fn test_no_urls() {
        assert!(find_urls("no links here, only text.").is_empty());
    }

    #[test]
    fn test_url_end_skips_longer_url() {
        let text = "sig https://x.org/a.pdf.sig, doc https://x.org/a.pdf.";
        let end = url_end(text, "https://x.org/a.pdf").unwrap();
        assert_eq!(&text[..end], "sig https://x.org/a.pdf.sig, doc https://x.org/a.pdf");
        assert_eq!(url_end(text, "https://x.org/b.pdf"), None);
    }
}
