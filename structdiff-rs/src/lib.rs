//! Structural XML diff.
//!
//! This library computes a minimal edit script that transforms one XML
//! document into another based on *structural* rather than textual
//! equivalence: two documents containing the same data under the same
//! hierarchy compare equal even when siblings are ordered differently, so
//! reorderings produce no edits.
//!
//! # How it works
//!
//! Both documents are parsed into node trees sharing one schema registry,
//! which accumulates the union of property names (attributes plus inline
//! text) seen at every structural path. Nodes are bucketed by schema, and
//! within each shared bucket a memoizing comparer scores candidate pairs by
//! bigram string similarity of the nodes themselves, their children and
//! their siblings. Pairs are then matched greedily by average score under
//! an exclusive one-to-one discipline; unmatched expected nodes become
//! `Removed` edits, unmatched actual nodes `Added`, and imperfectly scored
//! matches `Modified`.
//!
//! The matching is a heuristic tuned for documents that are mostly
//! structurally identical, not a globally optimal assignment.
//!
//! # Example
//!
//! ```
//! use xml_structdiff::{diff_str, DiffOptions, EditOp};
//!
//! let expected = r#"<movie><episode>IV</episode><title>A New Hope</title></movie>"#;
//! let actual = r#"<movie><title>A New Hope</title><episode>IV</episode></movie>"#;
//!
//! // Reordered siblings: structurally equal.
//! let edits = diff_str(expected, actual, &DiffOptions::default()).unwrap();
//! assert!(edits.is_empty());
//!
//! // A changed attribute value is reported as one modification.
//! let edits = diff_str(r#"<a x="1"/>"#, r#"<a x="2"/>"#, &DiffOptions::default()).unwrap();
//! assert_eq!(edits.len(), 1);
//! assert_eq!(edits[0].op, EditOp::Modified);
//! ```

pub mod bigram;
pub mod compare;
pub mod constants;
pub mod counter;
pub mod diff;
pub mod error;
pub mod node;
pub mod schema;
pub mod xml;

// Re-export commonly used types
pub use bigram::Bigram;
pub use compare::{NodeComparer, NodePair};
pub use counter::Counter;
pub use diff::{diff_elements, diff_files, diff_str, DiffOptions, EditOp, NodeEdit};
pub use error::{Error, Result};
pub use node::{create_groups, ElementFilter, Node, NodeGroups, NodeInfo, NodeRef, WeakNodeRef};
pub use schema::{Schema, SchemaRegistry};
pub use xml::{parse_file, parse_str, ElementRef, XmlElement, XmlParser};
