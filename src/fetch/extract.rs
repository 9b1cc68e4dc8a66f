//! Visible-text extraction from HTML.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose content is never surfaced.
///
/// The parser runs with scripting enabled, so `noscript` content arrives as
/// one raw-markup text node. `template` content is inert and never rendered.
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parse `html` and return its visible text, normalized.
///
/// Subtrees of [`STRIPPED_ELEMENTS`] are dropped, every other text node is
/// kept in tree order, and the result goes through [`normalize_text`].
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), &mut raw);
    normalize_text(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if STRIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Split `text` into trimmed fragments, one per output line.
///
/// Each line is trimmed, then split wherever two spaces meet; fragments are
/// trimmed again and empty ones dropped. Order is preserved.
pub fn normalize_text(text: &str) -> String {
    text.split(is_line_boundary)
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
