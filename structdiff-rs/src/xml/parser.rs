//! XML parser that builds element trees.
//!
//! Uses quick-xml's streaming API. Only elements, attributes and inline
//! text survive parsing; comments, processing instructions, DOCTYPE and
//! namespace declarations are dropped. Source line numbers are tracked so
//! edits can point back into the input.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

use super::{is_xmlns_attr, ElementRef, XmlElement};

/// XML parser that builds element trees with line info retained.
pub struct XmlParser;

/// Element under construction while its end tag is pending.
struct PendingElement {
    qname: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    line: i32,
    children: Vec<ElementRef>,
}

impl PendingElement {
    fn finish(self) -> ElementRef {
        Rc::new(XmlElement::from_parts(
            self.qname,
            self.attributes,
            self.text,
            self.line,
            self.children,
        ))
    }
}

/// Incremental newline counter over the source bytes.
///
/// Positions must be queried in non-decreasing order, which the event loop
/// guarantees.
struct LineTracker<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: i32,
}

impl<'a> LineTracker<'a> {
    fn new(source: &'a str) -> Self {
        LineTracker {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, pos: usize) -> i32 {
        let pos = pos.min(self.bytes.len());
        while self.pos < pos {
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        self.line
    }
}

impl XmlParser {
    /// Parses XML from a string.
    pub fn parse_str(xml: &str) -> Result<ElementRef> {
        let mut reader = Reader::from_str(xml);
        let mut tracker = LineTracker::new(xml);

        let mut stack: Vec<PendingElement> = Vec::new();
        let mut root: Option<ElementRef> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let line = tracker.line_at(reader.buffer_position() as usize);
                    stack.push(Self::open_element(&reader, e, line)?);
                }
                Event::Empty(ref e) => {
                    let line = tracker.line_at(reader.buffer_position() as usize);
                    let element = Self::open_element(&reader, e, line)?.finish();
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Parse("unexpected end tag".to_string()))?
                        .finish();
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    let raw =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                    Self::accept_text(&mut stack, &text);
                }
                Event::CData(ref e) => {
                    let text = String::from_utf8_lossy(e.as_ref());
                    Self::accept_text(&mut stack, &text);
                }
                Event::Eof => break,
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Parse("unexpected end of document".to_string()));
        }
        root.ok_or_else(|| Error::Parse("no root element".to_string()))
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ElementRef> {
        let xml = fs::read_to_string(path)?;
        Self::parse_str(&xml)
    }

    /// Decodes a start tag into a pending element, splitting off namespace
    /// declarations.
    fn open_element(reader: &Reader<&[u8]>, e: &BytesStart, line: i32) -> Result<PendingElement> {
        let qname = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("attribute error: {e}")))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            if is_xmlns_attr(&key) {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            attributes.push((super::split_local_name(&key).to_string(), value));
        }

        Ok(PendingElement {
            qname,
            attributes,
            text: None,
            line,
            children: Vec::new(),
        })
    }

    /// Hands a finished element to its parent, or makes it the root.
    fn attach(
        stack: &mut Vec<PendingElement>,
        root: &mut Option<ElementRef>,
        element: ElementRef,
    ) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_some() {
                    return Err(Error::Parse("multiple root elements".to_string()));
                }
                *root = Some(element);
            }
        }
        Ok(())
    }

    /// Records inline text on the innermost open element.
    ///
    /// Only text before the first child element counts; whitespace runs
    /// collapse to a single space and whitespace-only text is dropped.
    fn accept_text(stack: &mut [PendingElement], text: &str) {
        let Some(parent) = stack.last_mut() else {
            return; // text outside the root element
        };
        if !parent.children.is_empty() || parent.text.is_some() {
            return;
        }
        let normalized = normalize_whitespace(text);
        if !normalized.is_empty() {
            parent.text = Some(normalized);
        }
    }
}

/// Trims and collapses consecutive whitespace to single spaces.
fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_ws = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_ws {
                result.push(' ');
                last_was_ws = true;
            }
        } else {
            result.push(c);
            last_was_ws = false;
        }
    }
    while result.ends_with(' ') {
        result.pop();
    }
    result
}

/// Parses XML from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ElementRef> {
    XmlParser::parse_file(path)
}

/// Parses XML from a string.
pub fn parse_str(xml: &str) -> Result<ElementRef> {
    XmlParser::parse_str(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_xml() {
        let root = parse_str("<root><child>text</child></root>").unwrap();
        assert_eq!(root.qname(), "root");
        assert_eq!(root.children().len(), 1);

        let child = &root.children()[0];
        assert_eq!(child.local_name(), "child");
        assert_eq!(child.text(), Some("text"));
    }

    #[test]
    fn test_parse_with_attributes() {
        let root = parse_str(r#"<root id="foo" class="bar">content</root>"#).unwrap();
        assert_eq!(
            root.attributes(),
            &[
                ("id".to_string(), "foo".to_string()),
                ("class".to_string(), "bar".to_string())
            ]
        );
        assert_eq!(root.text(), Some("content"));
    }

    #[test]
    fn test_whitespace_normalization() {
        let root = parse_str("<root>  hello \n  world  </root>").unwrap();
        assert_eq!(root.text(), Some("hello world"));
    }

    #[test]
    fn test_text_after_child_is_ignored() {
        let root = parse_str("<root><a/>tail</root>").unwrap();
        assert_eq!(root.text(), None);
    }

    #[test]
    fn test_empty_element() {
        let root = parse_str("<root><empty /></root>").unwrap();
        let empty = &root.children()[0];
        assert_eq!(empty.local_name(), "empty");
        assert!(empty.children().is_empty());
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_nested_elements() {
        let root = parse_str("<a><b><c>deep</c></b></a>").unwrap();
        let b = &root.children()[0];
        let c = &b.children()[0];
        assert_eq!(c.local_name(), "c");
        assert_eq!(c.text(), Some("deep"));
    }

    #[test]
    fn test_line_numbers() {
        let xml = "<root>\n  <first/>\n  <second>\n    text\n  </second>\n</root>\n";
        let root = parse_str(xml).unwrap();
        assert_eq!(root.line(), 1);
        assert_eq!(root.children()[0].line(), 2);
        assert_eq!(root.children()[1].line(), 3);
    }

    #[test]
    fn test_xmlns_attributes_dropped() {
        let root =
            parse_str(r#"<root xmlns="http://e.com" xmlns:ns="http://ns.e.com" id="1"/>"#).unwrap();
        assert_eq!(root.attributes(), &[("id".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_prefixed_names_use_local_part() {
        let root = parse_str(r#"<ns:root ns:key="v"><ns:child/></ns:root>"#).unwrap();
        assert_eq!(root.qname(), "ns:root");
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.attributes(), &[("key".to_string(), "v".to_string())]);
        assert_eq!(root.children()[0].local_name(), "child");
    }

    #[test]
    fn test_entity_unescaping() {
        let root = parse_str("<root>a &amp; b</root>").unwrap();
        assert_eq!(root.text(), Some("a & b"));
    }

    #[test]
    fn test_no_root_element_is_an_error() {
        assert!(parse_str("").is_err());
        assert!(parse_str("<!-- only a comment -->").is_err());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_str("<a><b></a>").is_err());
        assert!(parse_str("<a>").is_err());
    }

    #[test]
    fn test_multiple_roots_is_an_error() {
        assert!(parse_str("<a/><b/>").is_err());
    }
}
