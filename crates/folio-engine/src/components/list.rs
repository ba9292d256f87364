//! List policy: item styling, auto split on repeated empty lines, head
//! delete and list exchange.
//!
//! Emptiness handling lives in [`Document::detach_range`], which queues the
//! deferred removal whenever a list loses its tail.

use crate::components::{DecorateOp, ListType, NodeId, NodeKind};
use crate::editing::{Cursor, Document, DocumentEvent, Focus};
use crate::error::{EditError, Result};

/// Style merge applied to every item entering a list of `list_type`
pub(crate) fn list_item_style(list_type: ListType) -> DecorateOp {
    match list_type {
        ListType::Nl => DecorateOp::set("display", "block"),
        ListType::Ol | ListType::Ul => DecorateOp::remove("display"),
    }
}

/// Style merge applied to the list itself
pub(crate) fn list_style(list_type: ListType) -> DecorateOp {
    match list_type {
        ListType::Nl => DecorateOp::set("paddingLeft", "0px"),
        ListType::Ol | ListType::Ul => DecorateOp::remove("paddingLeft"),
    }
}

impl Document {
    fn require_list(&self, id: NodeId) -> Result<ListType> {
        self.require(id)?
            .list_type()
            .ok_or(EditError::WrongKind {
                id,
                expected: "list",
            })
    }

    /// Change the marker type of a list. Setting the current type is a no-op.
    pub fn set_list_type(&mut self, list: NodeId, list_type: ListType) -> Result<()> {
        if self.require_list(list)? == list_type {
            return Ok(());
        }
        self.transact("set list type", |doc| {
            let node = doc.node_mut(list)?;
            node.kind = NodeKind::List(list_type);
            node.decoration.merge_style(list_style(list_type));
            doc.emit(DocumentEvent::ComponentUpdated(vec![list]));
            Ok(())
        })
    }

    /// Insert blocks into a collection, applying the list policies.
    ///
    /// When a single empty block is added to a list right after an empty
    /// item (index > 1), the list is split there instead: the new block lands
    /// between the two halves and the empty predecessor is dropped, which is
    /// how pressing Enter twice leaves a list. Several blocks at once are
    /// always inserted as they are.
    pub fn add(&mut self, parent: NodeId, index: usize, items: &[NodeId]) -> Result<Focus> {
        self.transact("add", |doc| {
            if doc.require(parent)?.is_list()
                && index > 1
                && let [item] = items
            {
                let prev = doc.get_child(parent, index - 1);
                if let Some(prev) = prev
                    && doc.is_empty_block(prev)?
                    && doc.is_empty_block(*item)?
                {
                    log::debug!("Leaving list {parent} at {index}");
                    let focus = doc.split(parent, index, items)?;
                    doc.remove_self(prev)?;
                    return Ok(focus);
                }
            }
            let added = doc.attach(parent, index, items)?;
            let mut nodes = vec![parent];
            nodes.extend(added);
            Ok(Focus::new(nodes, None))
        })
    }

    /// Backspace at the head of a list item.
    ///
    /// A later item merges into the item before it; the first item leaves the
    /// list and takes the list's place in the enclosing collection.
    pub fn child_head_delete(&mut self, list: NodeId, block: NodeId) -> Result<Focus> {
        self.require_list(list)?;
        let index = self.find_children_index(list, block)?;
        self.transact("head delete", |doc| {
            if index > 0 {
                return match doc.get_prev(block) {
                    Some(prev) => doc.receive(prev, Some(block)),
                    None => Ok(Focus::new(vec![list], None)),
                };
            }
            let parent = doc.require(list)?.parent.ok_or(EditError::Orphan(list))?;
            let position = doc.find_children_index(parent, list)?;
            doc.remove_self(block)?;
            let mut focus = doc.add(parent, position, &[block])?;
            focus.cursor = Some(Cursor::new(block, 0));
            Ok(focus)
        })
    }

    /// Turn a block into a list item of `list_type`.
    ///
    /// Items already in a list change the list's type instead. Otherwise the
    /// block joins a directly preceding list of the same type, or gets wrapped
    /// in a new list placed where the block was.
    pub fn exchange_list(&mut self, block: NodeId, list_type: ListType) -> Result<Vec<NodeId>> {
        let parent = self.require(block)?.parent.ok_or(EditError::Orphan(block))?;
        if self.require(parent)?.is_list() {
            self.set_list_type(parent, list_type)?;
            return Ok(vec![block]);
        }

        self.transact("exchange list", |doc| {
            let prev = doc.get_prev(block);
            let index = doc.find_children_index(parent, block)?;
            doc.remove_self(block)?;

            match prev {
                Some(prev) if doc.require(prev)?.list_type() == Some(list_type) => {
                    let size = doc.require(prev)?.children.len();
                    doc.attach(prev, size, &[block])?;
                }
                _ => {
                    let list = doc.build_list(list_type, &[block], None, None)?;
                    doc.attach(parent, index, &[list])?;
                }
            }
            Ok(vec![block])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::invariants;
    use pretty_assertions::assert_eq;

    fn list_of(doc: &mut Document, list_type: ListType, texts: &[&str]) -> (NodeId, Vec<NodeId>) {
        let items: Vec<NodeId> = texts.iter().map(|text| doc.build_paragraph(text)).collect();
        let list = doc.build_list(list_type, &items, None, None).unwrap();
        let root = doc.root();
        let size = doc.size(root).unwrap();
        doc.add_children(root, size, &[list]).unwrap();
        (list, items)
    }

    #[test]
    fn test_set_list_type_twice_is_idempotent() {
        let mut doc = Document::new();
        let (list, _) = list_of(&mut doc, ListType::Ul, &["a"]);

        doc.set_list_type(list, ListType::Nl).unwrap();
        let style = doc.node(list).unwrap().decoration().clone();
        let steps = doc.record().undo_count();
        assert_eq!(
            doc.take_events(),
            vec![DocumentEvent::ComponentUpdated(vec![list])]
        );

        doc.set_list_type(list, ListType::Nl).unwrap();
        assert_eq!(doc.node(list).unwrap().decoration(), &style);
        assert_eq!(doc.record().undo_count(), steps);
        assert!(doc.take_events().is_empty());
    }

    #[test]
    fn test_set_list_type_toggles_padding() {
        let mut doc = Document::new();
        let (list, _) = list_of(&mut doc, ListType::Ol, &["a"]);

        doc.set_list_type(list, ListType::Nl).unwrap();
        let padding = doc.node(list).unwrap().decoration().style().get("paddingLeft").cloned();
        assert_eq!(padding.as_deref(), Some("0px"));

        doc.set_list_type(list, ListType::Ul).unwrap();
        assert!(doc.node(list).unwrap().decoration().style().get("paddingLeft").is_none());
        assert_eq!(doc.node(list).unwrap().type_tag(), "list>ul");
    }

    #[test]
    fn test_marker_less_list_displays_items_as_blocks() {
        let mut doc = Document::new();
        let (_, items) = list_of(&mut doc, ListType::Nl, &["a"]);
        let display = doc.node(items[0]).unwrap().decoration().style().get("display").cloned();
        assert_eq!(display.as_deref(), Some("block"));

        let (_, items) = list_of(&mut doc, ListType::Ul, &["b"]);
        assert!(doc.node(items[0]).unwrap().decoration().style().is_empty());
    }

    #[test]
    fn test_list_rejects_non_block_child() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["a"]);
        let row = doc.create(&crate::RawNode::new("tableRow")).unwrap();

        let err = doc.add(list, 1, &[row]).unwrap_err();
        assert!(matches!(err, EditError::StructuralViolation { .. }));
        assert_eq!(doc.node(list).unwrap().children(), items.as_slice());
    }

    #[test]
    fn test_double_empty_item_splits_the_list() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["one", "two", "", "three"]);
        let fresh = doc.build_paragraph("");

        let focus = doc.add(list, 3, &[fresh]).unwrap();
        assert_eq!(focus.cursor, Some(Cursor::new(fresh, 0)));

        let root = doc.node(doc.root()).unwrap().children().to_vec();
        assert_eq!(root.len(), 3);
        assert_eq!(root[0], list);
        assert_eq!(root[1], fresh);
        assert_eq!(doc.node(list).unwrap().children(), &items[..2]);
        let tail = doc.node(root[2]).unwrap();
        assert_eq!(tail.children(), &[items[3]]);
        assert_eq!(tail.list_type(), Some(ListType::Ul));

        // The empty predecessor is gone, every non-empty item survives
        assert_eq!(doc.node(items[2]).unwrap().parent(), None);
        let non_empty = doc.statistic(doc.root()).unwrap().paragraph - 1;
        assert_eq!(non_empty, 3);
        invariants::check(&doc);
    }

    #[test]
    fn test_emptied_list_is_removed_on_next_tick() {
        let mut doc = Document::new();
        let (list, _) = list_of(&mut doc, ListType::Ol, &["a", "b"]);

        doc.remove_children(list, 0, Some(2)).unwrap();
        assert!(doc.get_block_by_id(list).is_ok());
        assert_eq!(doc.pending_tasks(), 1);

        assert_eq!(doc.tick(), 1);
        assert!(doc.get_block_by_id(list).is_err());
        invariants::check(&doc);
    }

    #[test]
    fn test_refilled_list_survives_the_tick() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ol, &["a"]);

        doc.remove_children(list, 0, None).unwrap();
        doc.add(list, 0, &[items[0]]).unwrap();
        doc.tick();

        assert!(doc.get_block_by_id(list).is_ok());
        assert_eq!(doc.node(list).unwrap().children(), items.as_slice());
    }

    #[test]
    fn test_head_delete_of_first_item_leaves_the_list() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["a", "b"]);

        doc.child_head_delete(list, items[0]).unwrap();
        let root = doc.node(doc.root()).unwrap();
        assert_eq!(root.children(), &[items[0], list]);
        assert_eq!(doc.node(list).unwrap().children(), &[items[1]]);
    }

    #[test]
    fn test_head_delete_of_later_item_merges_into_previous() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["ab", "cd"]);

        let focus = doc.child_head_delete(list, items[1]).unwrap();
        assert_eq!(focus.cursor, Some(Cursor::new(items[0], 2)));
        assert_eq!(doc.text(items[0]).unwrap(), "abcd");
        assert_eq!(doc.node(list).unwrap().children(), &[items[0]]);
    }

    #[test]
    fn test_exchange_wraps_then_joins_preceding_list() {
        let mut doc = Document::new();
        let first = doc.append_paragraph("one").unwrap();
        let second = doc.append_paragraph("two").unwrap();

        doc.exchange_list(first, ListType::Ol).unwrap();
        let list = doc.node(first).unwrap().parent().unwrap();
        assert_eq!(doc.node(doc.root()).unwrap().children(), &[list, second]);

        doc.exchange_list(second, ListType::Ol).unwrap();
        assert_eq!(doc.node(list).unwrap().children(), &[first, second]);
        assert_eq!(doc.node(doc.root()).unwrap().children(), &[list]);
        invariants::check(&doc);
    }

    #[test]
    fn test_exchange_inside_list_changes_list_type() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["a"]);

        assert_eq!(doc.exchange_list(items[0], ListType::Ol).unwrap(), vec![items[0]]);
        assert_eq!(doc.node(list).unwrap().list_type(), Some(ListType::Ol));
    }

    #[test]
    fn test_exchange_appends_empty_block_after_empty_item() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["a", ""]);
        let block = doc.append_paragraph("").unwrap();

        doc.exchange_list(block, ListType::Ul).unwrap();
        doc.tick();

        assert_eq!(doc.node(block).unwrap().parent(), Some(list));
        assert_eq!(doc.node(list).unwrap().children(), &[items[0], items[1], block]);
        assert_eq!(doc.node(doc.root()).unwrap().children(), &[list]);
        invariants::check(&doc);
    }

    #[test]
    fn test_adding_several_empty_blocks_never_splits() {
        let mut doc = Document::new();
        let (list, items) = list_of(&mut doc, ListType::Ul, &["a", "", "b"]);
        let (first, second) = (doc.build_paragraph(""), doc.build_paragraph(""));

        let focus = doc.add(list, 2, &[first, second]).unwrap();
        assert_eq!(focus.cursor, None);
        assert_eq!(
            doc.node(list).unwrap().children(),
            &[items[0], items[1], first, second, items[2]]
        );
        assert_eq!(doc.node(doc.root()).unwrap().children(), &[list]);
    }
}
