//! Cross-module tests for the editing core.
//!
//! Scenarios here combine several operations and check the whole tree with
//! [`invariants::check`] after each step. Outlines are compared with inline
//! insta snapshots.


use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{Cursor, Document, ListType, format_outline};

/// Document of one paragraph per text, checked before it is handed out
fn paragraphs(texts: &[&str]) -> (Document, Vec<crate::NodeId>) {
    let mut doc = Document::new();
    let ids = texts
        .iter()
        .map(|text| doc.append_paragraph(text).unwrap())
        .collect();
    invariants::check(&doc);
    (doc, ids)
}

#[test]
fn typing_session_builds_expected_outline() {
    let (mut doc, ids) = paragraphs(&["Shopping"]);

    // Enter at the end, type an item, turn it into a list
    let item = doc.split_at(ids[0], 8).unwrap().cursor.unwrap().id;
    doc.insert_text(item, 0, "milk").unwrap();
    doc.exchange_list(item, ListType::Ul).unwrap();
    invariants::check(&doc);

    // Enter inside the list, type the second item
    let second = doc.split_at(item, 4).unwrap().cursor.unwrap().id;
    doc.insert_text(second, 0, "eggs").unwrap();
    invariants::check(&doc);

    assert_snapshot!(format_outline(&doc), @r#"
    article
      paragraph "Shopping"
      list>ul
        paragraph "milk"
        paragraph "eggs"
    "#);
}

#[test]
fn enter_twice_leaves_the_list() {
    let (mut doc, ids) = paragraphs(&["one"]);
    doc.exchange_list(ids[0], ListType::Ol).unwrap();
    let list = doc.node(ids[0]).unwrap().parent().unwrap();

    // First Enter: an empty item
    let empty = doc.split_at(ids[0], 3).unwrap().cursor.unwrap().id;
    assert_eq!(doc.node(list).unwrap().children(), &[ids[0], empty]);

    // Second Enter on the empty item: the fresh block leaves the list
    let fresh = doc.build_paragraph("");
    let focus = doc.add(list, 2, &[fresh]).unwrap();
    assert_eq!(focus.cursor, Some(Cursor::new(fresh, 0)));
    doc.tick();
    invariants::check(&doc);

    assert_snapshot!(format_outline(&doc), @r#"
    article
      list>ol
        paragraph "one"
      paragraph ""
    "#);
}

#[test]
fn undo_and_redo_walk_every_step() {
    let (mut doc, ids) = paragraphs(&["hello", "world"]);
    let mut outlines = vec![format_outline(&doc)];

    doc.insert_text(ids[0], 5, ",").unwrap();
    outlines.push(format_outline(&doc));
    doc.exchange_list(ids[1], ListType::Nl).unwrap();
    outlines.push(format_outline(&doc));
    doc.delete_selection(Cursor::new(ids[0], 2), Some(Cursor::new(ids[1], 1)))
        .unwrap();
    doc.tick();
    outlines.push(format_outline(&doc));

    for expected in outlines.iter().rev().skip(1) {
        assert!(doc.undo());
        assert_eq!(&format_outline(&doc), expected);
        invariants::check(&doc);
    }
    assert_eq!(doc.record().undo_count(), 2);

    for expected in outlines.iter().skip(1) {
        assert!(doc.redo());
        assert_eq!(&format_outline(&doc), expected);
    }
    assert!(!doc.redo());
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let (mut doc, ids) = paragraphs(&["a"]);
    doc.insert_text(ids[0], 1, "b").unwrap();
    doc.undo();
    assert!(doc.can_redo());

    doc.insert_text(ids[0], 1, "c").unwrap();
    assert!(!doc.can_redo());
    assert_eq!(doc.text(ids[0]).unwrap(), "ac");
}
