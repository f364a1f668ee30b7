//! Materialized tree nodes and schema-bucketed grouping.
//!
//! A [`Node`] carries everything the matcher needs: a dense per-document
//! index, the schema id, the property vector flattened against the schema,
//! the child list, a weak parent link and the `matched` flag driven by the
//! greedy matching sweep.

pub mod info;

pub use info::{ElementFilter, NodeInfo};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::bigram::Bigram;
use crate::counter::Counter;
use crate::schema::SchemaRegistry;
use crate::xml::ElementRef;

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<Node>>;

/// A weak reference to a node, used for the non-owning parent link.
pub type WeakNodeRef = Weak<RefCell<Node>>;

/// A materialized tree node.
#[derive(Debug)]
pub struct Node {
    /// Dense index, unique within one document tree.
    index: usize,
    /// Schema id shared with same-signature nodes of both documents.
    schema_id: usize,
    /// Property vector aligned to the schema's column order.
    properties: Vec<Bigram>,
    /// Handle back to the parsed element for reporting.
    element: ElementRef,
    /// Weak reference to the parent node; empty at the root.
    parent: WeakNodeRef,
    /// Child nodes in document order.
    children: Vec<NodeRef>,
    /// Set once this node has been claimed by a match.
    matched: bool,
}

impl Node {
    /// Returns the dense per-document index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the schema id.
    pub fn schema_id(&self) -> usize {
        self.schema_id
    }

    /// Returns the schema-aligned property vector.
    pub fn properties(&self) -> &[Bigram] {
        &self.properties
    }

    /// Returns the element this node was built from.
    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &WeakNodeRef {
        &self.parent
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns true once this node has been claimed by a match.
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Returns true when the node carries no property content at all.
    pub fn is_empty(&self) -> bool {
        self.properties.iter().all(Bigram::is_empty)
    }

    /// Returns the similarity of two nodes' property vectors in `[0, 1]`.
    ///
    /// Nodes of different schemas score 0.0. Within a schema the vectors
    /// have equal length and column semantics, so the score is the mean of
    /// the column-wise bigram similarities; two property-less nodes score
    /// 1.0.
    pub fn compare_to(&self, other: &Node) -> f64 {
        if self.schema_id != other.schema_id {
            return 0.0;
        }
        if self.properties.is_empty() && other.properties.is_empty() {
            return 1.0;
        }

        let total: f64 = self
            .properties
            .iter()
            .zip(&other.properties)
            .map(|(a, b)| a.compare_to(b))
            .sum();
        total / self.properties.len() as f64
    }

    /// Claims both nodes for each other if neither is matched yet.
    ///
    /// On success both `matched` flags are set and `true` is returned; on
    /// failure neither node changes. The flags never revert within one
    /// diff invocation.
    pub fn try_match(a: &NodeRef, b: &NodeRef) -> bool {
        if a.borrow().matched || b.borrow().matched {
            return false;
        }
        a.borrow_mut().matched = true;
        b.borrow_mut().matched = true;
        true
    }
}

/// Node trees of one document, bucketed by schema id.
#[derive(Debug)]
pub struct NodeGroups {
    /// Total number of nodes in the document tree.
    pub node_count: usize,
    buckets: FxHashMap<usize, Vec<NodeRef>>,
}

impl NodeGroups {
    /// Returns the bucket for a schema id, if any node has it.
    pub fn bucket(&self, schema_id: usize) -> Option<&[NodeRef]> {
        self.buckets.get(&schema_id).map(Vec::as_slice)
    }

    /// Returns the schema ids present in this document, ascending.
    pub fn schema_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.buckets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Materializes the node tree for `root_info` and groups it by schema id.
///
/// Indices are assigned children-first during materialization; bucket
/// contents follow a document-order traversal of the finished tree, so the
/// grouping is deterministic for fixed input.
pub fn create_groups(root_info: &NodeInfo, registry: &SchemaRegistry) -> NodeGroups {
    let mut indices = Counter::new();
    let root = build_tree(root_info, registry, &mut indices);

    let mut buckets: FxHashMap<usize, Vec<NodeRef>> = FxHashMap::default();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let schema_id = node.borrow().schema_id;
        for child in node.borrow().children().iter().rev() {
            stack.push(Rc::clone(child));
        }
        buckets.entry(schema_id).or_default().push(node);
    }

    NodeGroups {
        node_count: indices.current(),
        buckets,
    }
}

/// Recursively materializes one node, children before the node itself.
fn build_tree(info: &NodeInfo, registry: &SchemaRegistry, indices: &mut Counter) -> NodeRef {
    let children: Vec<NodeRef> = info
        .children()
        .iter()
        .map(|child| build_tree(child, registry, indices))
        .collect();

    let (schema_id, properties) = registry.format(info.signature(), info.properties());

    let node = Rc::new(RefCell::new(Node {
        index: indices.next(),
        schema_id,
        properties,
        element: Rc::clone(info.element()),
        parent: Weak::new(),
        children,
        matched: false,
    }));

    for child in node.borrow().children() {
        child.borrow_mut().parent = Rc::downgrade(&node);
    }

    node
}
