//! Intermediate parse product between elements and materialized nodes.
//!
//! A [`NodeInfo`] tree mirrors the element tree, restricted to elements
//! that pass the include predicate, with every element reduced to its
//! structural signature and bigram-valued properties. Building a tree
//! registers all of its signatures and property names in the shared
//! [`SchemaRegistry`], which must finish for *both* documents before
//! either side is materialized into [`Node`](super::Node)s.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::bigram::Bigram;
use crate::constants::TEXT_PROPERTY;
use crate::schema::SchemaRegistry;
use crate::xml::{ElementRef, XmlElement};

/// Predicate selecting which child elements participate in the diff.
///
/// A false-returning element is omitted from its parent's child list; it
/// does not affect the parent's own attributes or inline text.
pub type ElementFilter = dyn Fn(&XmlElement) -> bool;

/// Per-element parse product: signature, properties and filtered children.
#[derive(Debug)]
pub struct NodeInfo {
    element: ElementRef,
    signature: String,
    properties: FxHashMap<String, Bigram>,
    children: Vec<NodeInfo>,
}

impl NodeInfo {
    /// Builds the info tree for a document root, registering every
    /// signature and property-name set it encounters.
    pub fn from_element(
        element: &ElementRef,
        registry: &mut SchemaRegistry,
        filter: &ElementFilter,
    ) -> NodeInfo {
        Self::build(element, None, registry, filter)
    }

    fn build(
        element: &ElementRef,
        parent_signature: Option<&str>,
        registry: &mut SchemaRegistry,
        filter: &ElementFilter,
    ) -> NodeInfo {
        let signature = match parent_signature {
            Some(parent) => format!("{parent}.{}", element.local_name()),
            None => element.local_name().to_string(),
        };

        let mut properties = FxHashMap::default();
        for (name, value) in element.attributes() {
            properties.insert(name.clone(), Bigram::new(value));
        }
        if let Some(text) = element.text() {
            properties.insert(TEXT_PROPERTY.to_string(), Bigram::new(text));
        }

        registry.add_property_names(&signature, properties.keys().map(String::as_str));

        let children = element
            .children()
            .iter()
            .filter(|child| filter(child))
            .map(|child| Self::build(child, Some(&signature), registry, filter))
            .collect();

        NodeInfo {
            element: Rc::clone(element),
            signature,
            properties,
            children,
        }
    }

    /// Returns the element this info was built from.
    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    /// Returns the dotted structural signature (root-to-node local names).
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the property map (attributes plus inline text).
    pub fn properties(&self) -> &FxHashMap<String, Bigram> {
        &self.properties
    }

    /// Returns the filtered child infos in document order.
    pub fn children(&self) -> &[NodeInfo] {
        &self.children
    }
}
