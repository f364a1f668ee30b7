//! One-line element rendering for edit display.
//!
//! Edits identify elements, and the CLI wants them readable: this renders a
//! single element as a compact XML fragment without descending into child
//! elements.

use super::XmlElement;

/// Renders an element as a one-line XML fragment.
///
/// Attributes keep document order. Inline text is included; child elements
/// are elided with an ellipsis so the snippet stays one line.
///
/// ```
/// use xml_structdiff::xml::{parse_str, printer::element_snippet};
///
/// let root = parse_str(r#"<title lang="en">A New Hope</title>"#).unwrap();
/// assert_eq!(element_snippet(&root), r#"<title lang="en">A New Hope</title>"#);
/// ```
pub fn element_snippet(element: &XmlElement) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(element.qname());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(&mut out, value, true);
        out.push('"');
    }

    let text = element.text();
    if text.is_none() && element.children().is_empty() {
        out.push_str("/>");
        return out;
    }

    out.push('>');
    if let Some(text) = text {
        escape_into(&mut out, text, false);
    }
    if !element.children().is_empty() {
        out.push('\u{2026}');
    }
    out.push_str("</");
    out.push_str(element.qname());
    out.push('>');
    out
}

/// Escapes markup characters, plus quotes in attribute position.
fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
