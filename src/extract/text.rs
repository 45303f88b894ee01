//! Text helpers shared by the field extractors

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

static BRACKET_QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"「(.+?)」").expect("valid bracket regex"));

/// Elements whose text is never rendered
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Concatenates an element's text nodes, each trimmed, without separators
pub(crate) fn compact_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Like [`compact_text`] but renders each `<br>` as a newline
///
/// Inline markup such as `<small>` or `<a>` is joined without a separator.
pub(crate) fn line_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t.trim()),
            Node::Element(el) if el.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Trimmed, non-empty text nodes of the document in document order,
/// skipping script and style content
pub(crate) fn visible_strings(document: &Html) -> impl Iterator<Item = &str> {
    document.tree.root().descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let parent = node.parent()?;
        let parent = parent.value().as_element()?;
        if HIDDEN_TEXT_PARENTS.contains(&parent.name()) {
            return None;
        }
        let trimmed = text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}

/// Returns the content of the first `「…」` quote in `text`
pub(crate) fn bracketed_quote(text: &str) -> Option<&str> {
    BRACKET_QUOTE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
