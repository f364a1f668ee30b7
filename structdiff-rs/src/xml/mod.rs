//! XML layer: parsing into element trees and rendering element snippets.
//!
//! Namespaces are not preserved: the diff operates on local names only, and
//! `xmlns` declarations are dropped during parsing.

mod parser;
pub mod printer;

pub use parser::{XmlParser, parse_file, parse_str};

use std::rc::Rc;

/// Shared handle to a parsed element.
pub type ElementRef = Rc<XmlElement>;

/// A parsed XML element with the source position retained.
///
/// Attributes keep document order; keys are attribute local names. `text`
/// holds inline text appearing before the first child element, with
/// whitespace collapsed.
#[derive(Debug)]
pub struct XmlElement {
    qname: String,
    local_name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    line: i32,
    children: Vec<ElementRef>,
}

impl XmlElement {
    pub(crate) fn from_parts(
        qname: String,
        attributes: Vec<(String, String)>,
        text: Option<String>,
        line: i32,
        children: Vec<ElementRef>,
    ) -> Self {
        let local_name = split_local_name(&qname).to_string();
        XmlElement {
            qname,
            local_name,
            attributes,
            text,
            line,
            children,
        }
    }

    /// Returns the qualified name as written in the source.
    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// Returns the local name (qualified name with any prefix stripped).
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the attributes as (local name, value) pairs in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the inline text preceding the first child element, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the source line of the start tag, or
    /// [`UNKNOWN_LINE`](crate::constants::UNKNOWN_LINE) when not available.
    pub fn line(&self) -> i32 {
        self.line
    }

    /// Returns the child elements in document order.
    pub fn children(&self) -> &[ElementRef] {
        &self.children
    }
}

/// Strips a namespace prefix from a qualified name.
pub fn split_local_name(qname: &str) -> &str {
    match qname.rsplit_once(':') {
        Some((_, local)) => local,
        None => qname,
    }
}

/// Returns true for `xmlns` and `xmlns:prefix` attribute names.
pub fn is_xmlns_attr(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_local_name() {
        assert_eq!(split_local_name("movie"), "movie");
        assert_eq!(split_local_name("ns:movie"), "movie");
        assert_eq!(split_local_name("a:b:c"), "c");
    }

    #[test]
    fn test_is_xmlns_attr() {
        assert!(is_xmlns_attr("xmlns"));
        assert!(is_xmlns_attr("xmlns:ns"));
        assert!(!is_xmlns_attr("xmlnsx"));
        assert!(!is_xmlns_attr("id"));
    }
}
