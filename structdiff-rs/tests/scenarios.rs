//! End-to-end diff scenarios.
//!
//! These exercise the full pipeline on small documents and verify the edit
//! scripts as sets: ordering among equally scored edits is not part of the
//! contract, exhaustiveness and disjointness are.

use xml_structdiff::{diff_str, DiffOptions, EditOp, NodeEdit};

const MOVIES_EXPECTED: &str = r#"<star_wars>
  <movie><episode>IV</episode><title>A New Hope</title><release_date>05/25/1977</release_date></movie>
  <movie><episode>V</episode><title>The Empire Strikes Back</title><release_date>05/21/1980</release_date></movie>
  <movie><episode>VI</episode><title>Return of the Jedi</title><release_date>05/25/1983</release_date></movie>
</star_wars>"#;

const MOVIES_ACTUAL: &str = r#"<star_wars>
  <movie><title>A New Hope</title><release_date>05/25/1977</release_date></movie>
  <movie><episode>VI</episode><title>Return of the Jedi</title><release_date>05/25/1983</release_date><rating>4.7/5.0</rating></movie>
  <movie><episode>V</episode><title>Empire Strikes Back</title><release_date>05/21/1980</release_date></movie>
</star_wars>"#;

fn diff(expected: &str, actual: &str) -> Vec<NodeEdit> {
    diff_str(expected, actual, &DiffOptions::default()).unwrap()
}

fn ops(edits: &[NodeEdit]) -> Vec<EditOp> {
    edits.iter().map(|e| e.op).collect()
}

#[test]
fn identity_produces_no_edits() {
    assert!(diff(MOVIES_EXPECTED, MOVIES_EXPECTED).is_empty());

    let options = DiffOptions::new().exclude_empty_nodes(true);
    assert!(diff_str(MOVIES_EXPECTED, MOVIES_EXPECTED, &options)
        .unwrap()
        .is_empty());
}

#[test]
fn sibling_reorder_produces_no_edits() {
    let expected = r#"<r><a>one</a><b>two</b><c>three</c></r>"#;
    let actual = r#"<r><c>three</c><a>one</a><b>two</b></r>"#;
    assert!(diff(expected, actual).is_empty());
    assert!(diff(actual, expected).is_empty());
}

#[test]
fn reversed_identical_children_produce_no_edits() {
    let expected = r#"<r><i>alpha</i><i>beta</i><i>gamma</i><i>delta</i></r>"#;
    let actual = r#"<r><i>delta</i><i>gamma</i><i>beta</i><i>alpha</i></r>"#;
    assert!(diff(expected, actual).is_empty());
}

#[test]
fn movie_example_yields_exactly_three_edits() {
    let edits = diff(MOVIES_EXPECTED, MOVIES_ACTUAL);
    assert_eq!(edits.len(), 3, "edits: {edits:?}");

    let removed: Vec<&NodeEdit> = edits.iter().filter(|e| e.op == EditOp::Removed).collect();
    let modified: Vec<&NodeEdit> = edits.iter().filter(|e| e.op == EditOp::Modified).collect();
    let added: Vec<&NodeEdit> = edits.iter().filter(|e| e.op == EditOp::Added).collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(modified.len(), 1);
    assert_eq!(added.len(), 1);

    let removed = removed[0].expected.as_ref().unwrap();
    assert_eq!(removed.local_name(), "episode");
    assert_eq!(removed.text(), Some("IV"));

    let modified_expected = modified[0].expected.as_ref().unwrap();
    let modified_actual = modified[0].actual.as_ref().unwrap();
    assert_eq!(modified_expected.local_name(), "title");
    assert_eq!(modified_expected.text(), Some("The Empire Strikes Back"));
    assert_eq!(modified_actual.text(), Some("Empire Strikes Back"));

    let added = added[0].actual.as_ref().unwrap();
    assert_eq!(added.local_name(), "rating");
    assert_eq!(added.text(), Some("4.7/5.0"));
}

#[test]
fn movie_example_reports_line_numbers() {
    let edits = diff(MOVIES_EXPECTED, MOVIES_ACTUAL);

    for edit in &edits {
        match edit.op {
            EditOp::Removed => {
                assert_eq!(edit.expected_line(), 2);
                assert_eq!(edit.actual_line(), -1);
            }
            EditOp::Modified => {
                assert_eq!(edit.expected_line(), 3);
                assert_eq!(edit.actual_line(), 4);
            }
            EditOp::Added => {
                assert_eq!(edit.actual_line(), 3);
                assert_eq!(edit.expected_line(), -1);
            }
        }
    }
}

#[test]
fn near_identical_text_is_modified() {
    let expected = "<r><c>an unassuming description</c></r>";
    let actual = "<r><c>an unassuming descriptions</c></r>";
    let edits = diff(expected, actual);
    assert_eq!(ops(&edits), [EditOp::Modified]);
    assert_eq!(edits[0].expected.as_ref().unwrap().local_name(), "c");
}

#[test]
fn renamed_tag_is_removed_plus_added() {
    let expected = "<r><old>payload</old></r>";
    let actual = "<r><new>payload</new></r>";
    let edits = diff(expected, actual);
    assert_eq!(ops(&edits), [EditOp::Removed, EditOp::Added]);
}

#[test]
fn deep_nest_single_change_is_one_modified_on_innermost() {
    let expected = "<a><b><c><d>hello world</d></c></b></a>";
    let actual = "<a><b><c><d>hello worlds</d></c></b></a>";
    let edits = diff(expected, actual);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].op, EditOp::Modified);
    assert_eq!(edits[0].expected.as_ref().unwrap().local_name(), "d");
}

#[test]
fn empty_document_vs_empty_child() {
    let expected = "<root/>";
    let actual = "<root><child/></root>";

    let edits = diff(expected, actual);
    assert_eq!(ops(&edits), [EditOp::Added]);

    let options = DiffOptions::new().exclude_empty_nodes(true);
    let edits = diff_str(expected, actual, &options).unwrap();
    assert!(edits.is_empty());
}

#[test]
fn exclude_empty_only_removes_added_and_removed_edits() {
    let expected = r#"<r><m k="1"/><gone/><stay>text</stay></r>"#;
    let actual = r#"<r><m k="2"/><stay>text</stay><fresh/></r>"#;

    let full = diff(expected, actual);
    let options = DiffOptions::new().exclude_empty_nodes(true);
    let filtered = diff_str(expected, actual, &options).unwrap();

    // Filtering only ever drops Added/Removed edits.
    assert!(filtered.len() <= full.len());
    let full_modified: Vec<_> = full.iter().filter(|e| e.op == EditOp::Modified).collect();
    let filtered_modified: Vec<_> = filtered
        .iter()
        .filter(|e| e.op == EditOp::Modified)
        .collect();
    assert_eq!(full_modified.len(), filtered_modified.len());
    assert!(filtered.iter().all(|e| e.op == EditOp::Modified));
}

#[test]
fn element_filter_limits_participating_subtrees() {
    let expected = r#"<doc><meta stamp="2024-01-01"/><body>same</body></doc>"#;
    let actual = r#"<doc><meta stamp="2024-06-30"/><body>same</body></doc>"#;

    assert_eq!(diff(expected, actual).len(), 1);

    let options = DiffOptions::new().with_filter(|el| el.local_name() != "meta");
    assert!(diff_str(expected, actual, &options).unwrap().is_empty());
}

#[test]
fn edits_are_exhaustive_and_disjoint() {
    let edits = diff(MOVIES_EXPECTED, MOVIES_ACTUAL);

    // No expected element appears in more than one Removed/Modified edit,
    // and no actual element in more than one Added/Modified edit. Element
    // handles are unique per parse, so pointer identity is the node
    // identity.
    let mut expected_seen: Vec<*const xml_structdiff::XmlElement> = Vec::new();
    let mut actual_seen: Vec<*const xml_structdiff::XmlElement> = Vec::new();
    for edit in &edits {
        if let Some(e) = &edit.expected {
            let ptr = std::rc::Rc::as_ptr(e);
            assert!(!expected_seen.contains(&ptr));
            expected_seen.push(ptr);
        }
        if let Some(a) = &edit.actual {
            let ptr = std::rc::Rc::as_ptr(a);
            assert!(!actual_seen.contains(&ptr));
            actual_seen.push(ptr);
        }
        match edit.op {
            EditOp::Added => {
                assert!(edit.actual.is_some() && edit.expected.is_none());
            }
            EditOp::Removed => {
                assert!(edit.expected.is_some() && edit.actual.is_none());
            }
            EditOp::Modified => {
                assert!(edit.actual.is_some() && edit.expected.is_some());
            }
        }
    }
}

#[test]
fn malformed_input_surfaces_an_error() {
    assert!(diff_str("<a><b></a>", "<a/>", &DiffOptions::default()).is_err());
    assert!(diff_str("<a/>", "not xml at all", &DiffOptions::default()).is_err());
}
