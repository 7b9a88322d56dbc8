//! HTML body composition helpers.
//!
//! Outbound notification mails are composed by appending extra content
//! (typically the author's signature) to an existing HTML body. Plain text
//! content is escaped and wrapped before insertion; HTML content is stripped
//! of any document-level tags so the result stays a single document.

use once_cell::sync::Lazy;
use regex::Regex;

static DOCUMENT_TAGS: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)</?html[^>]*>|</?body[^>]*>|<!\s*DOCTYPE[^>]*>").unwrap()
});

/// Escape a plain text fragment for inclusion in an HTML document.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Convert plain text to an HTML fragment: escape, split paragraphs on blank
/// lines, keep single newlines as `<br/>`, and wrap the whole fragment in
/// `container_tag` when given.
#[must_use]
pub fn plaintext_to_html(text: &str, container_tag: Option<&str>) -> String {
    let escaped = escape_html(text);

    let paragraphs: Vec<String> = escaped
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>", p.trim().replace('\n', "<br/>")))
        .collect();
    let body = paragraphs.join("");

    match container_tag {
        Some(tag) => format!("<{tag}>{body}</{tag}>"),
        None => body,
    }
}

/// Append `content` to an HTML document `html`.
///
/// When `plaintext` is true the content is escaped and converted via
/// [`plaintext_to_html`]; otherwise it is inserted as-is after stripping
/// `<html>`, `<body>` and doctype tags. The content is inserted just before
/// `</body>` (falling back to `</html>`, then to plain concatenation).
#[must_use]
pub fn append_content_to_html(
    html: &str,
    content: &str,
    plaintext: bool,
    container_tag: Option<&str>,
) -> String {
    let fragment = if plaintext {
        format!("\n{}\n", plaintext_to_html(content, container_tag))
    } else {
        format!("\n{}\n", DOCUMENT_TAGS.replace_all(content, ""))
    };

    let insert_at = html.find("</body>").or_else(|| html.find("</html>"));
    match insert_at {
        Some(idx) => format!("{}{}{}", &html[..idx], fragment, &html[idx..]),
        None => format!("{html}{fragment}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("a < b & c > \"d\""),
            "a &lt; b &amp; c &gt; &quot;d&quot;"
        );
    }

    #[test]
    fn test_plaintext_to_html_paragraphs() {
        let html = plaintext_to_html("first\nline\n\nsecond", None);
        assert_eq!(html, "<p>first<br/>line</p><p>second</p>");
    }

    #[test]
    fn test_plaintext_to_html_container() {
        let html = plaintext_to_html("--\nAlice", Some("div"));
        assert_eq!(html, "<div><p>--<br/>Alice</p></div>");
    }

    #[test]
    fn test_append_plaintext_no_body_tag() {
        let out = append_content_to_html("<p>hello</p>", "sig", true, Some("div"));
        assert_eq!(out, "<p>hello</p>\n<div><p>sig</p></div>\n");
    }

    #[test]
    fn test_append_before_closing_body() {
        let out = append_content_to_html(
            "<html><body><p>hello</p></body></html>",
            "sig",
            true,
            Some("div"),
        );
        assert_eq!(
            out,
            "<html><body><p>hello</p>\n<div><p>sig</p></div>\n</body></html>"
        );
    }

    #[test]
    fn test_append_html_strips_document_tags() {
        let out = append_content_to_html(
            "<p>hello</p>",
            "<html><body><em>quoted</em></body></html>",
            false,
            None,
        );
        assert_eq!(out, "<p>hello</p>\n<em>quoted</em>\n");
    }

    #[test]
    fn test_escaped_content_is_not_interpreted() {
        let out = append_content_to_html("<p>x</p>", "<script>evil()</script>", true, Some("div"));
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
