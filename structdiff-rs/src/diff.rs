//! The structural diff engine.
//!
//! Drives the whole pipeline: parse both documents, register schemas,
//! materialize and bucket the node trees, enumerate candidate pairs per
//! shared schema bucket, match greedily by average score, and derive the
//! edit list from the matching.
//!
//! Sibling order never produces edits: two documents holding the same data
//! under the same hierarchy are equal regardless of how siblings are
//! ordered.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::compare::NodeComparer;
use crate::constants::{SCORE_EPSILON, UNKNOWN_LINE};
use crate::error::Result;
use crate::node::{create_groups, ElementFilter, Node, NodeInfo, NodeRef};
use crate::schema::SchemaRegistry;
use crate::xml::{ElementRef, XmlElement, XmlParser};

/// The kind of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Present only in the actual document.
    Added,
    /// Present in both documents with differing content.
    Modified,
    /// Present only in the expected document.
    Removed,
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditOp::Added => "Added",
            EditOp::Modified => "Modified",
            EditOp::Removed => "Removed",
        };
        f.write_str(name)
    }
}

/// One edit of the script transforming the expected document into the
/// actual one.
///
/// `Added` edits carry only an actual element, `Removed` edits only an
/// expected element, `Modified` edits both.
#[derive(Debug, Clone)]
pub struct NodeEdit {
    /// The affected element in the actual document, if any.
    pub actual: Option<ElementRef>,
    /// The affected element in the expected document, if any.
    pub expected: Option<ElementRef>,
    /// The kind of edit.
    pub op: EditOp,
}

impl NodeEdit {
    fn added(actual: ElementRef) -> Self {
        NodeEdit {
            actual: Some(actual),
            expected: None,
            op: EditOp::Added,
        }
    }

    fn removed(expected: ElementRef) -> Self {
        NodeEdit {
            actual: None,
            expected: Some(expected),
            op: EditOp::Removed,
        }
    }

    fn modified(actual: ElementRef, expected: ElementRef) -> Self {
        NodeEdit {
            actual: Some(actual),
            expected: Some(expected),
            op: EditOp::Modified,
        }
    }

    /// Returns the source line of the actual element, or −1 when absent.
    pub fn actual_line(&self) -> i32 {
        self.actual.as_ref().map_or(UNKNOWN_LINE, |e| e.line())
    }

    /// Returns the source line of the expected element, or −1 when absent.
    pub fn expected_line(&self) -> i32 {
        self.expected.as_ref().map_or(UNKNOWN_LINE, |e| e.line())
    }
}

/// Configuration for one diff invocation.
pub struct DiffOptions {
    /// Suppress Added/Removed edits whose element carries no property
    /// content. Modified edits are never suppressed.
    pub exclude_empty_nodes: bool,
    filter: Rc<ElementFilter>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            exclude_empty_nodes: false,
            filter: Rc::new(|_| true),
        }
    }
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions")
            .field("exclude_empty_nodes", &self.exclude_empty_nodes)
            .finish_non_exhaustive()
    }
}

impl DiffOptions {
    /// Creates the default options: include empty nodes, include every
    /// element.
    pub fn new() -> Self {
        DiffOptions::default()
    }

    /// Sets whether empty nodes are suppressed from Added/Removed edits.
    pub fn exclude_empty_nodes(mut self, exclude: bool) -> Self {
        self.exclude_empty_nodes = exclude;
        self
    }

    /// Sets the predicate selecting which child elements participate.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&XmlElement) -> bool + 'static,
    {
        self.filter = Rc::new(filter);
        self
    }

    fn filter(&self) -> &ElementFilter {
        self.filter.as_ref()
    }
}

/// Diffs two XML documents given as text.
pub fn diff_str(expected: &str, actual: &str, options: &DiffOptions) -> Result<Vec<NodeEdit>> {
    let expected_root = XmlParser::parse_str(expected)?;
    let actual_root = XmlParser::parse_str(actual)?;
    Ok(diff_elements(&expected_root, &actual_root, options))
}

/// Diffs two XML documents read from files.
pub fn diff_files<P: AsRef<Path>, Q: AsRef<Path>>(
    expected: P,
    actual: Q,
    options: &DiffOptions,
) -> Result<Vec<NodeEdit>> {
    let expected_root = XmlParser::parse_file(expected)?;
    let actual_root = XmlParser::parse_file(actual)?;
    Ok(diff_elements(&expected_root, &actual_root, options))
}

/// Diffs two parsed documents.
///
/// All state lives for this call only: the schema registry is shared by
/// both documents so matching signatures get identical ids, then each
/// side is bucketed and the buckets are diffed in schema-id order.
pub fn diff_elements(
    expected: &ElementRef,
    actual: &ElementRef,
    options: &DiffOptions,
) -> Vec<NodeEdit> {
    let mut registry = SchemaRegistry::new();
    let expected_info = NodeInfo::from_element(expected, &mut registry, options.filter());
    let actual_info = NodeInfo::from_element(actual, &mut registry, options.filter());

    // Registration is complete for both sides; materializing may format.
    let expected_groups = create_groups(&expected_info, &registry);
    let actual_groups = create_groups(&actual_info, &registry);

    let mut comparer = NodeComparer::new(expected_groups.node_count, actual_groups.node_count);
    let mut edits = Vec::new();

    let mut schema_ids = expected_groups.schema_ids();
    schema_ids.extend(actual_groups.schema_ids());
    schema_ids.sort_unstable();
    schema_ids.dedup();

    for schema_id in schema_ids {
        match (
            expected_groups.bucket(schema_id),
            actual_groups.bucket(schema_id),
        ) {
            (Some(expected_nodes), Some(actual_nodes)) => {
                diff_bucket(&mut comparer, expected_nodes, actual_nodes, options, &mut edits);
            }
            (Some(expected_nodes), None) => {
                push_removed(expected_nodes, options, &mut edits);
            }
            (None, Some(actual_nodes)) => {
                push_added(actual_nodes, options, &mut edits);
            }
            (None, None) => unreachable!("schema id from neither document"),
        }
    }

    edits
}

/// Diffs one shared schema bucket.
///
/// Candidate pairs are matched greedily in order of descending average
/// score; the exclusive `matched` flags keep the pairing one-to-one. A
/// matched pair whose node score is not (within epsilon) perfect becomes a
/// Modified edit, so identical subtrees stay silent. Leftovers on either
/// side become Removed/Added.
fn diff_bucket(
    comparer: &mut NodeComparer,
    expected_nodes: &[NodeRef],
    actual_nodes: &[NodeRef],
    options: &DiffOptions,
    edits: &mut Vec<NodeEdit>,
) {
    let mut pairs = comparer.candidate_pairs(expected_nodes, actual_nodes);
    // Stable: equally scored pairs keep enumeration order.
    pairs.sort_by(|a, b| b.average_score.partial_cmp(&a.average_score).unwrap());

    let limit = expected_nodes.len().min(actual_nodes.len());
    let mut matched = 0;
    for pair in &pairs {
        if !Node::try_match(&pair.expected, &pair.actual) {
            continue;
        }
        if (pair.node_score - 1.0).abs() > SCORE_EPSILON {
            edits.push(NodeEdit::modified(
                Rc::clone(pair.actual.borrow().element()),
                Rc::clone(pair.expected.borrow().element()),
            ));
        }
        matched += 1;
        if matched == limit {
            break;
        }
    }

    push_removed(expected_nodes, options, edits);
    push_added(actual_nodes, options, edits);
}

fn push_removed(nodes: &[NodeRef], options: &DiffOptions, edits: &mut Vec<NodeEdit>) {
    for node in nodes {
        let node = node.borrow();
        if node.is_matched() || (options.exclude_empty_nodes && node.is_empty()) {
            continue;
        }
        edits.push(NodeEdit::removed(Rc::clone(node.element())));
    }
}

fn push_added(nodes: &[NodeRef], options: &DiffOptions, edits: &mut Vec<NodeEdit>) {
    for node in nodes {
        let node = node.borrow();
        if node.is_matched() || (options.exclude_empty_nodes && node.is_empty()) {
            continue;
        }
        edits.push(NodeEdit::added(Rc::clone(node.element())));
    }
}
