//! HTML parser for extracting outlinks and body text
//!
//! Outlinks are the `href` targets of `<a>` elements that start with `http`.
//! They are yielded exactly as written in the page: no resolution against the
//! page URL, no normalization, and no deduplication.

use crate::url::is_crawlable;
use scraper::{ElementRef, Html, Node};

/// Elements whose text is never part of the page text
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Visible text of the `<body>`, one text node per line
    pub text: String,

    /// Crawlable outlinks in document order (may contain duplicates)
    pub outlinks: Vec<String>,
}

/// Parses HTML content and extracts body text and outlinks
///
/// # Example
///
/// ```
/// use txtcrawl::crawler::parse_html;
///
/// let html = r#"<html><body><p>Hello</p><a href="http://a.test/">a</a><a href="/b">b</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.text, "Hello\na");
/// assert_eq!(parsed.outlinks, vec!["http://a.test/".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_body_text(&document),
        outlinks: outlinks(&document).map(str::to_string).collect(),
    }
}

/// Lazily yields the crawlable `<a href>` targets of a document
pub fn outlinks(document: &Html) -> impl Iterator<Item = &str> + '_ {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| is_crawlable(href))
}

/// Collects the text of the document's `<body>`
///
/// Text inside scripts, styles and templates is skipped. Each non-blank text
/// node is trimmed and put on its own line.
pub fn extract_body_text(document: &Html) -> String {
    let root = document
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "body")
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_TEXT_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let line = text.trim();
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}
