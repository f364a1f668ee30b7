//! Similarity scoring and candidate-pair enumeration.
//!
//! [`NodeComparer`] owns two dense memoization tables keyed by the
//! `(expected index, actual index)` pair, sized by the *total* node count
//! of each document so that parent lookups made by the siblings score
//! always index validly. Scratch buffers for the child-matching sweep are
//! pooled across calls.

use std::rc::Rc;

use crate::constants::{DIRECT_MATCH_THRESHOLD, RELATIVE_MATCH_THRESHOLD};
use crate::node::NodeRef;

/// Marker for an actual child not yet assigned by the matching sweep.
const UNASSIGNED: usize = usize::MAX;

/// A candidate pairing of one expected and one actual node, with its
/// similarity scores.
#[derive(Debug, Clone)]
pub struct NodePair {
    /// The expected-side node.
    pub expected: NodeRef,
    /// The actual-side node.
    pub actual: NodeRef,
    /// Similarity of the nodes' own property vectors.
    pub node_score: f64,
    /// Similarity of the nodes' child lists viewed as sets.
    pub children_score: f64,
    /// Similarity of the parents' child lists (this node's siblings).
    pub siblings_score: f64,
    /// Mean of the three scores; the greedy matching key.
    pub average_score: f64,
}

/// Memoizing similarity calculator for one expected/actual tree pair.
pub struct NodeComparer {
    actual_count: usize,
    /// Dense `expected_count x actual_count` score caches.
    node_scores: Vec<Option<f64>>,
    children_scores: Vec<Option<f64>>,
    /// Scratch: per-actual-child assignment for the matching sweep.
    assignment: Vec<usize>,
    /// Scratch: per-expected-child candidate stacks, retained so displaced
    /// rows can resume from their own stack.
    candidate_stacks: Vec<Vec<usize>>,
}

impl NodeComparer {
    /// Creates a comparer for documents of the given total node counts.
    pub fn new(expected_count: usize, actual_count: usize) -> Self {
        NodeComparer {
            actual_count,
            node_scores: vec![None; expected_count * actual_count],
            children_scores: vec![None; expected_count * actual_count],
            assignment: Vec::new(),
            candidate_stacks: Vec::new(),
        }
    }

    fn score_key(&self, expected: &NodeRef, actual: &NodeRef) -> usize {
        expected.borrow().index() * self.actual_count + actual.borrow().index()
    }

    /// Returns the memoized property similarity of two nodes.
    pub fn node_score(&mut self, expected: &NodeRef, actual: &NodeRef) -> f64 {
        let key = self.score_key(expected, actual);
        if let Some(score) = self.node_scores[key] {
            return score;
        }
        let score = expected.borrow().compare_to(&actual.borrow());
        self.node_scores[key] = Some(score);
        score
    }

    /// Returns the memoized child-list similarity of two nodes.
    ///
    /// Two childless nodes score 1.0 and a childless node against one with
    /// children scores 0.0. Otherwise the score is the number of actual
    /// children assignable to distinct expected children over the larger
    /// child count.
    pub fn children_score(&mut self, expected: &NodeRef, actual: &NodeRef) -> f64 {
        let key = self.score_key(expected, actual);
        if let Some(score) = self.children_scores[key] {
            return score;
        }

        let expected_children = expected.borrow().children().to_vec();
        let actual_children = actual.borrow().children().to_vec();

        let score = if expected_children.is_empty() && actual_children.is_empty() {
            1.0
        } else if expected_children.is_empty() || actual_children.is_empty() {
            0.0
        } else {
            let matches = self.count_matches(&expected_children, &actual_children);
            matches as f64 / expected_children.len().max(actual_children.len()) as f64
        };

        self.children_scores[key] = Some(score);
        score
    }

    /// Returns the similarity of the nodes' sibling context.
    ///
    /// Two roots score 1.0, a root against a non-root 0.0; otherwise this
    /// is the parents' children score.
    pub fn siblings_score(&mut self, expected: &NodeRef, actual: &NodeRef) -> f64 {
        let expected_parent = expected.borrow().parent().upgrade();
        let actual_parent = actual.borrow().parent().upgrade();
        match (expected_parent, actual_parent) {
            (None, None) => 1.0,
            (Some(ep), Some(ap)) => self.children_score(&ep, &ap),
            _ => 0.0,
        }
    }

    /// Counts how many actual children can be assigned to distinct
    /// expected children whose node score clears the direct threshold.
    ///
    /// Augmenting-path sweep over the threshold graph: each expected row
    /// starts once with its own candidate stack; displacing an earlier row
    /// resumes that row from its retained stack instead of recomputing it.
    /// Every iteration either assigns a free actual child or abandons the
    /// chain at an exhausted stack, so the sweep terminates. The result
    /// approximates maximum bipartite matching, which is all the
    /// similarity fraction needs.
    fn count_matches(&mut self, expected: &[NodeRef], actual: &[NodeRef]) -> usize {
        self.assignment.clear();
        self.assignment.resize(actual.len(), UNASSIGNED);
        while self.candidate_stacks.len() < expected.len() {
            self.candidate_stacks.push(Vec::new());
        }

        let mut count = 0;
        for x in 0..expected.len() {
            let mut candidates = std::mem::take(&mut self.candidate_stacks[x]);
            candidates.clear();
            for (y, actual_child) in actual.iter().enumerate() {
                if self.node_score(&expected[x], actual_child) > DIRECT_MATCH_THRESHOLD {
                    candidates.push(y);
                }
            }
            self.candidate_stacks[x] = candidates;

            let mut current = x;
            let mut active = x;
            while let Some(y) = self.candidate_stacks[active].pop() {
                let prev = self.assignment[y];
                if prev == UNASSIGNED {
                    self.assignment[y] = current;
                    count += 1;
                    break;
                }
                if self.candidate_stacks[prev].is_empty() {
                    break;
                }
                self.assignment[y] = current;
                current = prev;
                active = prev;
            }
        }
        count
    }

    /// Enumerates candidate pairs between two same-schema buckets.
    ///
    /// A pair qualifies when the nodes match directly (node and children
    /// scores above the direct threshold) or relatively (children or
    /// siblings score above the relative threshold).
    pub fn candidate_pairs(&mut self, expected: &[NodeRef], actual: &[NodeRef]) -> Vec<NodePair> {
        let mut pairs = Vec::new();
        for expected_node in expected {
            for actual_node in actual {
                let node_score = self.node_score(expected_node, actual_node);
                let children_score = self.children_score(expected_node, actual_node);
                let siblings_score = self.siblings_score(expected_node, actual_node);

                let direct = node_score > DIRECT_MATCH_THRESHOLD
                    && children_score > DIRECT_MATCH_THRESHOLD;
                if direct
                    || children_score > RELATIVE_MATCH_THRESHOLD
                    || siblings_score > RELATIVE_MATCH_THRESHOLD
                {
                    pairs.push(NodePair {
                        expected: Rc::clone(expected_node),
                        actual: Rc::clone(actual_node),
                        node_score,
                        children_score,
                        siblings_score,
                        average_score: (node_score + children_score + siblings_score) / 3.0,
                    });
                }
            }
        }
        pairs
    }
}
