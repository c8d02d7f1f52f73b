//! Body normalization.
//!
//! Turns a decoded message body into the text that lands in a content
//! record: allow-listed markup only, the phone-delimiter convention
//! applied, and an embedded title picked up when the sender supplied one.
//!
//! Two [`ContentFilter`] hook points let an embedding application rewrite
//! the content -- one before the delimiter split (e.g. keep only the first
//! quoted section of a reply chain), one after. Both pass through
//! unchanged by default.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::headers::PHONE_DELIMITER;

/// Markup that survives normalization. Everything else is stripped,
/// keeping its inner text.
pub const ALLOWED_TAGS: &[&str] = &[
    "img", "p", "br", "i", "b", "u", "em", "strong", "strike", "font", "span", "div",
];

/// External rewrite hook over body content.
pub trait ContentFilter: Send + Sync {
    /// Rewrite the content. Identity for the default pipeline.
    fn apply(&self, content: String) -> String;
}

/// Result of normalizing a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBody {
    /// The body text destined for the content record.
    pub body: String,
    /// Title from an embedded `<title>` marker, when present.
    pub title: Option<String>,
}

/// The body-normalization pipeline. Cheap to construct, reusable across
/// messages.
#[derive(Default)]
pub struct BodyNormalizer {
    raw_filter: Option<Arc<dyn ContentFilter>>,
    content_filter: Option<Arc<dyn ContentFilter>>,
}

impl BodyNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the pre-split hook. Sees the stripped, trimmed content
    /// before the phone delimiter is applied.
    pub fn with_raw_filter(mut self, filter: Arc<dyn ContentFilter>) -> Self {
        self.raw_filter = Some(filter);
        self
    }

    /// Install the post-split hook. Sees the selected body segment.
    pub fn with_content_filter(mut self, filter: Arc<dyn ContentFilter>) -> Self {
        self.content_filter = Some(filter);
        self
    }

    /// Run the full normalization pipeline.
    pub fn normalize(&self, input: &str) -> NormalizedBody {
        let content = strip_tags(input, ALLOWED_TAGS);
        let content = content.trim().to_string();

        let content = match &self.raw_filter {
            Some(filter) => filter.apply(content),
            None => content,
        };

        let content = select_body_segment(&content).to_string();
        let content = content.trim().to_string();

        let content = match &self.content_filter {
            Some(filter) => filter.apply(content),
            None => content,
        };

        let title = extract_embedded_title(&content);
        NormalizedBody { body: content, title }
    }
}

/// Apply the phone-delimiter convention: the segment between the first
/// and second delimiter when non-empty, segment zero otherwise.
fn select_body_segment(content: &str) -> &str {
    let mut segments = content.split(PHONE_DELIMITER);
    let first = segments.next().unwrap_or(content);
    match segments.next() {
        Some(second) if !second.is_empty() => second,
        _ => first,
    }
}

/// Strip markup not in `allowed`, keeping inner text. Allowed tags pass
/// through with their attributes. HTML comments are removed entirely;
/// an unterminated tag swallows the rest of the input.
pub fn strip_tags(input: &str, allowed: &[&str]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(comment) = tail.strip_prefix("<!--") {
            match comment.find("-->") {
                Some(end) => {
                    rest = &comment[end + 3..];
                    continue;
                }
                None => return out,
            }
        }
        match tail.find('>') {
            Some(close) => {
                let tag = &tail[..=close];
                if is_allowed_tag(tag, allowed) {
                    out.push_str(tag);
                }
                rest = &tail[close + 1..];
            }
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn is_allowed_tag(tag: &str, allowed: &[&str]) -> bool {
    let inner = tag.trim_start_matches('<').trim_end_matches('>');
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let name_len = inner
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return false;
    }
    let name = &inner[..name_len];
    allowed.iter().any(|a| a.eq_ignore_ascii_case(name))
}

/// Pick up an embedded `<title>...</title>` marker. The marker is left
/// in place; only the candidate is extracted.
pub fn extract_embedded_title(content: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"(?is)<title>(.+?)</title>").expect("static pattern"));
    pattern
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_tags_are_stripped_keeping_text() {
        let stripped = strip_tags("<script>alert(1)</script><p>hi</p>", ALLOWED_TAGS);
        assert_eq!(stripped, "alert(1)<p>hi</p>");
    }

    #[test]
    fn allowed_tags_keep_attributes() {
        let input = r#"<img src="cat.jpg" alt="cat"><table><tr><td>x</td></tr></table>"#;
        let stripped = strip_tags(input, ALLOWED_TAGS);
        assert_eq!(stripped, r#"<img src="cat.jpg" alt="cat">x"#);
    }

    #[test]
    fn closing_and_self_closing_forms_follow_the_tag_name() {
        let stripped = strip_tags("<DIV>a</DIV><br/><a href=\"x\">link</a>", ALLOWED_TAGS);
        assert_eq!(stripped, "<DIV>a</DIV><br/>link");
    }

    #[test]
    fn comments_are_removed() {
        assert_eq!(strip_tags("a<!-- hidden -->b", ALLOWED_TAGS), "ab");
    }

    #[test]
    fn unterminated_markup_swallows_the_rest() {
        assert_eq!(strip_tags("before<div unfinished", ALLOWED_TAGS), "before");
    }

    #[test]
    fn body_after_delimiter_wins() {
        let normalized = BodyNormalizer::new().normalize("quoted reply::my actual post");
        assert_eq!(normalized.body, "my actual post");
    }

    #[test]
    fn empty_tail_falls_back_to_segment_zero() {
        let normalized = BodyNormalizer::new().normalize("just text::");
        assert_eq!(normalized.body, "just text");
    }

    #[test]
    fn no_delimiter_keeps_whole_trimmed_body() {
        let normalized = BodyNormalizer::new().normalize("  plain body  ");
        assert_eq!(normalized.body, "plain body");
    }

    #[test]
    fn second_delimiter_bounds_the_segment() {
        let normalized = BodyNormalizer::new().normalize("sig::the post::footer");
        assert_eq!(normalized.body, "the post");
    }

    #[test]
    fn raw_filter_runs_before_the_split() {
        struct KeepFirstLine;
        impl ContentFilter for KeepFirstLine {
            fn apply(&self, content: String) -> String {
                content.lines().next().unwrap_or("").to_string()
            }
        }

        let normalizer = BodyNormalizer::new().with_raw_filter(Arc::new(KeepFirstLine));
        let normalized = normalizer.normalize("sig::kept\ndropped::tail");
        // The filter sees the whole content, so the split still applies.
        assert_eq!(normalized.body, "kept");
    }

    #[test]
    fn content_filter_runs_after_the_split() {
        struct Upper;
        impl ContentFilter for Upper {
            fn apply(&self, content: String) -> String {
                content.to_uppercase()
            }
        }

        let normalizer = BodyNormalizer::new().with_content_filter(Arc::new(Upper));
        let normalized = normalizer.normalize("quoted::post");
        assert_eq!(normalized.body, "POST");
    }

    #[test]
    fn embedded_title_is_extracted_case_insensitively() {
        assert_eq!(
            extract_embedded_title("<TITLE>My Post</TITLE>body"),
            Some("My Post".to_string())
        );
        assert_eq!(extract_embedded_title("no marker here"), None);
        assert_eq!(extract_embedded_title("<title>  </title>"), None);
    }

    #[test]
    fn selected_segment_is_trimmed() {
        let normalized = BodyNormalizer::new().normalize("quoted::  the post  ::x");
        assert_eq!(normalized.body, "the post");
    }
}
