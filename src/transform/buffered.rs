//! Buffered fallback removal.
//!
//! Used when the streaming rewriter is unavailable. The whole body is
//! materialized and matched with text patterns, which bounds this path by
//! `max_buffer_bytes` and makes it unsuitable for very large documents.
//!
//! Matching is deliberately non-recursive: a matched element is removed up
//! to the *first* closing tag with the same name, so nested elements of the
//! same tag name close the match early and can leave a trailing closer in
//! the output. Only class selectors (leading `.`) are honored here; other
//! selectors are ignored and surfaced through a warning and the
//! ignored-selector counter.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::response::Response;
use futures_util::stream;
use regex::{Regex, RegexBuilder};

use crate::observability::metrics;
use crate::transform::remover::{ElementRemover, RemovalRules};

/// A compiled class-selector removal rule.
#[derive(Debug, Clone)]
struct RemovalPattern {
    /// Opening tag carrying the class token; capture 1 is the tag name.
    open_tag: Regex,
}

impl RemovalPattern {
    fn for_class(class_name: &str) -> Self {
        let class_token = regex::escape(class_name);
        let pattern = format!(
            r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*\bclass\s*=\s*["'][^"']*\b{class_token}\b[^"']*["'][^>]*>"#
        );
        let open_tag = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .expect("escaped class name always compiles");
        Self { open_tag }
    }

    /// Remove every occurrence of the rule from `html`.
    fn apply(&self, html: &str) -> String {
        let mut result = String::with_capacity(html.len());
        let mut pos = 0;

        while let Some(caps) = self.open_tag.captures(&html[pos..]) {
            let open = caps.get(0).unwrap();
            let open_start = pos + open.start();
            let open_end = pos + open.end();
            result.push_str(&html[pos..open_start]);

            if open.as_str().ends_with("/>") {
                pos = open_end;
                continue;
            }

            let tag_name = caps.get(1).unwrap().as_str();
            match find_closing_tag(&html[open_end..], tag_name) {
                // Non-recursive: the first same-tag closer wins, even if it
                // belongs to a nested element.
                Some(after_close) => pos = open_end + after_close,
                None => {
                    // No closer in sight: leave the fragment untouched.
                    result.push_str(open.as_str());
                    pos = open_end;
                }
            }
        }

        result.push_str(&html[pos..]);
        result
    }
}

/// Find the end offset (exclusive) of the first `</tag>` closer, ignoring
/// ASCII case.
fn find_closing_tag(html: &str, tag_name: &str) -> Option<usize> {
    let needle = format!("</{}>", tag_name);
    let needle = needle.as_bytes();
    html.as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|start| start + needle.len())
}

/// Whole-body fallback remover.
pub struct BufferedRemover {
    patterns: Arc<Vec<RemovalPattern>>,
    max_buffer_bytes: usize,
}

impl BufferedRemover {
    /// Compile removal rules from the configured selectors.
    pub fn new(rules: &RemovalRules, max_buffer_bytes: usize) -> Self {
        let mut patterns = Vec::new();
        for selector in rules.selectors() {
            match selector.strip_prefix('.') {
                Some(class_name) => patterns.push(RemovalPattern::for_class(class_name)),
                None => {
                    tracing::warn!(
                        selector = %selector,
                        "Selector is not a class selector, buffered matching ignores it"
                    );
                    metrics::record_ignored_selector(selector);
                }
            }
        }
        Self {
            patterns: Arc::new(patterns),
            max_buffer_bytes,
        }
    }
}

impl ElementRemover for BufferedRemover {
    fn rewrite(&self, response: Response) -> Response {
        let (parts, body) = response.into_parts();
        let patterns = self.patterns.clone();
        let limit = self.max_buffer_bytes;

        // The read happens inside the body so a failure stays a
        // transport-level error on the stream, same as the streaming path.
        let rewritten = stream::once(async move {
            let bytes = axum::body::to_bytes(body, limit).await?;
            let mut cleaned = String::from_utf8_lossy(&bytes).into_owned();
            for pattern in patterns.iter() {
                cleaned = pattern.apply(&cleaned);
            }
            Ok::<Bytes, axum::Error>(Bytes::from(cleaned.into_bytes()))
        });

        Response::from_parts(parts, Body::from_stream(rewritten))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remover(selectors: &[&str]) -> BufferedRemover {
        let rules = RemovalRules::new(selectors.iter().map(|s| s.to_string()).collect());
        BufferedRemover::new(&rules, 16 * 1024 * 1024)
    }

    fn html_response(body: String) -> Response {
        Response::builder()
            .header("content-type", "text/html")
            .body(Body::from(body))
            .unwrap()
    }

    async fn rewrite(selectors: &[&str], body: &str) -> String {
        let response = remover(selectors).rewrite(html_response(body.to_string()));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn removes_paired_element_with_content() {
        assert_eq!(
            rewrite(
                &[".hide"],
                "<div><p class=\"hide\">secret</p><p>visible</p></div>"
            )
            .await,
            "<div><p>visible</p></div>"
        );
    }

    #[tokio::test]
    async fn removes_self_closing_variant() {
        assert_eq!(
            rewrite(&[".hide"], "<img class=\"hide\" src=\"x\"/><img src=\"y\"/>").await,
            "<img src=\"y\"/>"
        );
    }

    #[tokio::test]
    async fn nested_same_tag_closes_at_the_first_closer() {
        // Documented limitation: matching is non-recursive, so the inner
        // </div> terminates the match and the outer closer survives.
        assert_eq!(
            rewrite(&[".hide"], "<div class=\"hide\"><div>nested</div></div>").await,
            "</div>"
        );
    }

    #[tokio::test]
    async fn non_class_selector_is_ignored() {
        let body = "<div class=\"x\">kept</div>";
        assert_eq!(rewrite(&["div"], body).await, body);
    }

    #[tokio::test]
    async fn class_token_matches_any_attribute_order() {
        assert_eq!(
            rewrite(
                &[".hide"],
                "<span id='a' class='left hide right' data-x>gone</span>ok"
            )
            .await,
            "ok"
        );
    }

    #[tokio::test]
    async fn matching_is_case_insensitive() {
        assert_eq!(
            rewrite(&[".hide"], "<DIV CLASS=\"hide\">gone</DIV>rest").await,
            "rest"
        );
    }

    #[tokio::test]
    async fn unclosed_match_is_left_untouched() {
        let body = "<p class=\"hide\">never closed";
        assert_eq!(rewrite(&[".hide"], body).await, body);
    }

    #[tokio::test]
    async fn no_match_preserves_input_exactly() {
        let body = "  <p id=\"a\">kept</p>\n\t<!-- note -->";
        assert_eq!(rewrite(&[".hide"], body).await, body);
    }

    #[tokio::test]
    async fn rewriting_is_idempotent() {
        let input = "<div><p class=\"hide\">secret</p><p>visible</p></div>";
        let once = rewrite(&[".hide"], input).await;
        assert_eq!(rewrite(&[".hide"], &once).await, once);
    }

    #[test]
    fn finds_first_closer_ignoring_case() {
        assert_eq!(find_closing_tag("abc</DIV>rest", "div"), Some(9));
        assert_eq!(find_closing_tag("abc", "div"), None);
    }
}
