//! Tuning constants for the structural diff.
//!
//! The thresholds were tuned for documents that are mostly structurally
//! identical; changing them changes which candidate pairs the matcher
//! considers and therefore the emitted edits.

/// Minimum node score for a pair of nodes to count as a direct match.
///
/// Also the threshold used when counting cross-matching children in
/// [`NodeComparer::children_score`](crate::compare::NodeComparer::children_score).
pub const DIRECT_MATCH_THRESHOLD: f64 = 0.6;

/// Minimum children or siblings score for a pair to qualify as a relative
/// match even when the nodes themselves differ.
pub const RELATIVE_MATCH_THRESHOLD: f64 = 0.8;

/// Tolerance against a perfect node score when deciding whether a matched
/// pair is reported as modified. Property-order differences normalize to a
/// score of exactly 1.0 and must stay silent.
pub const SCORE_EPSILON: f64 = 1e-5;

/// Reserved property name for inline text content.
///
/// `&` cannot occur in an XML attribute name, so this key never collides
/// with a real attribute.
pub const TEXT_PROPERTY: &str = "&text";

/// Line number reported when no source position is available.
pub const UNKNOWN_LINE: i32 = -1;
