//! Cross-node editing: split, receive / send_to, head delete and decoration.
//!
//! Each operation validates what it can up front and runs inside the
//! document's transaction, so a failure halfway through is rolled back
//! before the error reaches the caller.

use crate::components::{DecorateOp, NodeId, NodeKind, StructureType};
use crate::editing::{Cursor, Document, DocumentEvent, Focus};
use crate::error::{EditError, Result};

impl Document {
    /// Split `id` at `index` and insert `new_piece` between the halves.
    ///
    /// Collections move their children from `index` on into a new sibling of
    /// the same kind and decoration; text blocks move the text after the
    /// character offset `index`. The new sibling goes right after `id`,
    /// preceded by `new_piece`. A collection split at its end creates no
    /// empty sibling. Focus is on the first inserted piece, or the start of
    /// the new sibling.
    pub fn split(&mut self, id: NodeId, index: usize, new_piece: &[NodeId]) -> Result<Focus> {
        let node = self.require(id)?;
        let parent = node.parent.ok_or(EditError::Orphan(id))?;
        let structure = node.structure_type();

        self.transact("split", |doc| {
            log::debug!("Splitting {id} at {index}");
            let tail = match structure {
                StructureType::Content => Some(doc.split_text(id, index)?),
                StructureType::Structure => {
                    let size = doc.require(id)?.children.len();
                    if index > size {
                        return Err(EditError::OutOfBounds { id, index, size });
                    }
                    if index == size {
                        None
                    } else {
                        let moved = doc.detach_range(id, index, size)?;
                        let tail = doc.create_empty(id)?;
                        doc.attach(tail, 0, &moved)?;
                        Some(tail)
                    }
                }
                StructureType::None => {
                    return Err(EditError::WrongKind {
                        id,
                        expected: "collection",
                    });
                }
            };

            let position = doc.find_children_index(parent, id)? + 1;
            let mut inserted = new_piece.to_vec();
            inserted.extend(tail);
            doc.attach(parent, position, &inserted)?;

            let cursor = inserted.first().map(|first| Cursor::new(*first, 0));
            let mut nodes = vec![id];
            nodes.extend(inserted);
            Ok(Focus::new(nodes, cursor))
        })
    }

    /// Move `source` into `target`.
    ///
    /// - no source: nothing happens, focus stays on `target`
    /// - list target: a list source hands over its items, an empty block is
    ///   dropped (focus at the end of the last item), anything else becomes
    ///   the last item
    /// - text block target: a text source has its spans appended and is
    ///   dropped (focus where the two texts meet); a structure source gives
    ///   up its first text block and keeps the rest
    /// - other collections append the source as a child
    pub fn receive(&mut self, target: NodeId, source: Option<NodeId>) -> Result<Focus> {
        let Some(source) = source else {
            return Ok(Focus::new(vec![target], None));
        };
        self.require(source)?;
        if self.is_ancestor(source, target) {
            return Err(EditError::Cycle(source));
        }
        let target_node = self.require(target)?;
        let target_is_list = target_node.is_list();
        let target_structure = target_node.structure_type();

        self.transact("receive", |doc| match target_structure {
            StructureType::None => Err(EditError::WrongKind {
                id: target,
                expected: "collection",
            }),
            StructureType::Content => doc.receive_into_text(target, source),
            StructureType::Structure if target_is_list => doc.receive_into_list(target, source),
            StructureType::Structure => {
                doc.remove_self(source)?;
                let size = doc.require(target)?.children.len();
                doc.attach(target, size, &[source])?;
                Ok(Focus::new(vec![target, source], None))
            }
        })
    }

    fn receive_into_list(&mut self, list: NodeId, source: NodeId) -> Result<Focus> {
        self.remove_self(source)?;
        let size = self.require(list)?.children.len();

        if self.require(source)?.is_list() {
            let source_size = self.require(source)?.children.len();
            let items = self.detach_range(source, 0, source_size)?;
            let mut nodes = vec![list];
            nodes.extend(self.attach(list, size, &items)?);
            return Ok(Focus::new(nodes, None));
        }
        if self.is_empty_block(source)? {
            let Some(last) = self.get_child(list, size.saturating_sub(1)) else {
                return Ok(Focus::new(vec![list], None));
            };
            let offset = self.size(last)?;
            return Ok(Focus::at(Cursor::new(last, offset)));
        }
        self.add(list, size, &[source])
    }

    fn receive_into_text(&mut self, block: NodeId, source: NodeId) -> Result<Focus> {
        let joint = Cursor::new(block, self.text_len(block)?);
        let source_node = self.require(source)?;
        let is_span = matches!(source_node.kind, NodeKind::Character(_));
        let structure = source_node.structure_type();
        let first = source_node.children.first().copied();

        if structure == StructureType::Structure {
            return match first {
                Some(first) => self.receive_into_text(block, first),
                None => Ok(Focus::at(joint)),
            };
        }

        self.remove_self(source)?;
        let moved = if is_span {
            vec![source]
        } else {
            let spans = self.require(source)?.children.len();
            self.detach_range(source, 0, spans)?
        };
        let size = self.require(block)?.children.len();
        self.attach(block, size, &moved)?;
        self.merge_spans(block)?;
        Ok(Focus::at(joint))
    }

    /// Merge `source` into `target`; the mirror of [`Document::receive`]
    pub fn send_to(&mut self, source: NodeId, target: NodeId) -> Result<Focus> {
        self.receive(target, Some(source))
    }

    /// Backspace at offset 0 of a block.
    ///
    /// List items follow the list's policy; other blocks merge into the block
    /// before them. The first block of the document stays put.
    pub fn head_delete(&mut self, id: NodeId) -> Result<Focus> {
        let parent = self.require(id)?.parent.ok_or(EditError::Orphan(id))?;
        if self.require(parent)?.is_list() {
            return self.child_head_delete(parent, id);
        }
        match self.get_prev(id) {
            Some(prev) => self.receive(prev, Some(id)),
            None => Ok(Focus::at(Cursor::new(id, 0))),
        }
    }

    /// Merge into the style and data maps of a node.
    ///
    /// Emits `ComponentUpdated` when either map actually changed.
    pub fn modify_decorate(
        &mut self,
        id: NodeId,
        style: Option<DecorateOp>,
        data: Option<DecorateOp>,
    ) -> Result<()> {
        self.require(id)?;
        self.transact("decorate", |doc| {
            let node = doc.node_mut(id)?;
            let style_changed = style.is_some_and(|op| node.decoration.merge_style(op));
            let data_changed = data.is_some_and(|op| node.decoration.merge_data(op));
            if style_changed || data_changed {
                doc.emit(DocumentEvent::ComponentUpdated(vec![id]));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ListType;
    use crate::tests::invariants;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_receive_without_source_is_a_noop() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("a").unwrap();
        let steps = doc.record().undo_count();

        let focus = doc.receive(paragraph, None).unwrap();
        assert_eq!(focus, Focus::new(vec![paragraph], None));
        assert_eq!(doc.record().undo_count(), steps);
    }

    #[test]
    fn test_text_block_receives_text_block() {
        let mut doc = Document::new();
        let first = doc.append_paragraph("foo").unwrap();
        let second = doc.append_paragraph("bar").unwrap();

        let focus = doc.send_to(second, first).unwrap();
        assert_eq!(focus.cursor, Some(Cursor::new(first, 3)));
        assert_eq!(doc.text(first).unwrap(), "foobar");
        assert_eq!(doc.node(first).unwrap().children().len(), 1);
        assert_eq!(doc.node(second).unwrap().parent(), None);
        invariants::check(&doc);
    }

    #[test]
    fn test_list_receives_list_items() {
        let mut doc = Document::new();
        let a = doc.append_paragraph("a").unwrap();
        let b = doc.append_paragraph("b").unwrap();
        doc.exchange_list(a, ListType::Ol).unwrap();
        doc.exchange_list(b, ListType::Ul).unwrap();
        let (first, second) = (
            doc.node(a).unwrap().parent().unwrap(),
            doc.node(b).unwrap().parent().unwrap(),
        );

        let focus = doc.receive(first, Some(second)).unwrap();
        assert_eq!(focus.nodes, vec![first, b]);
        assert_eq!(doc.node(first).unwrap().children(), &[a, b]);
        assert_eq!(doc.node(doc.root()).unwrap().children(), &[first]);

        doc.tick();
        invariants::check(&doc);
    }

    #[test]
    fn test_list_splices_single_empty_item_without_splitting() {
        let mut doc = Document::new();
        let a = doc.append_paragraph("a").unwrap();
        let blank = doc.append_paragraph("").unwrap();
        let incoming = doc.append_paragraph("").unwrap();
        doc.exchange_list(a, ListType::Ul).unwrap();
        doc.exchange_list(blank, ListType::Ul).unwrap();
        let target = doc.node(a).unwrap().parent().unwrap();
        let source = doc.build_list(ListType::Ul, &[], None, None).unwrap();
        doc.remove_self(incoming).unwrap();
        doc.add_children(source, 0, &[incoming]).unwrap();
        doc.add_children(doc.root(), 1, &[source]).unwrap();

        let focus = doc.receive(target, Some(source)).unwrap();
        assert_eq!(focus.nodes, vec![target, incoming]);
        doc.tick();

        assert_eq!(doc.node(target).unwrap().children(), &[a, blank, incoming]);
        assert_eq!(doc.node(doc.root()).unwrap().children(), &[target]);
        invariants::check(&doc);
    }

    #[test]
    fn test_list_discards_empty_block() {
        let mut doc = Document::new();
        let item = doc.append_paragraph("item").unwrap();
        let empty = doc.append_paragraph("").unwrap();
        doc.exchange_list(item, ListType::Ul).unwrap();
        let list = doc.node(item).unwrap().parent().unwrap();

        let focus = doc.receive(list, Some(empty)).unwrap();
        assert_eq!(focus.cursor, Some(Cursor::new(item, 4)));
        assert_eq!(doc.node(list).unwrap().children(), &[item]);
        assert_eq!(doc.node(empty).unwrap().parent(), None);
    }

    #[test]
    fn test_text_block_takes_first_block_of_structure() {
        let mut doc = Document::new();
        let target = doc.append_paragraph("x").unwrap();
        let a = doc.append_paragraph("a").unwrap();
        let b = doc.build_paragraph("b");
        doc.exchange_list(a, ListType::Ul).unwrap();
        let list = doc.node(a).unwrap().parent().unwrap();
        doc.add(list, 1, &[b]).unwrap();

        doc.receive(target, Some(list)).unwrap();
        assert_eq!(doc.text(target).unwrap(), "xa");
        assert_eq!(doc.node(list).unwrap().children(), &[b]);
    }

    #[test]
    fn test_receive_rejects_ancestor() {
        let mut doc = Document::new();
        let a = doc.append_paragraph("a").unwrap();
        doc.exchange_list(a, ListType::Ul).unwrap();
        let list = doc.node(a).unwrap().parent().unwrap();

        let root = doc.root();
        assert_eq!(doc.receive(list, Some(root)).unwrap_err(), EditError::Cycle(root));
    }

    #[test]
    fn test_split_list_moves_tail_into_sibling() {
        let mut doc = Document::new();
        let items: Vec<NodeId> = ["a", "b", "c"]
            .iter()
            .map(|text| doc.build_paragraph(text))
            .collect();
        let list = doc.build_list(ListType::Ol, &items, None, None).unwrap();
        doc.add(doc.root(), 0, &[list]).unwrap();

        let piece = doc.build_paragraph("between");
        let focus = doc.split(list, 1, &[piece]).unwrap();
        assert_eq!(focus.cursor, Some(Cursor::new(piece, 0)));

        let root = doc.node(doc.root()).unwrap().children().to_vec();
        assert_eq!(root.len(), 3);
        assert_eq!(root[1], piece);
        assert_eq!(doc.node(list).unwrap().children(), &items[..1]);
        assert_eq!(doc.node(root[2]).unwrap().children(), &items[1..]);
        assert_eq!(doc.node(root[2]).unwrap().type_tag(), "list>ol");
        invariants::check(&doc);
    }

    #[test]
    fn test_split_detached_node_fails() {
        let mut doc = Document::new();
        let loose = doc.build_paragraph("loose");
        assert_eq!(
            doc.split(loose, 1, &[]).unwrap_err(),
            EditError::Orphan(loose)
        );
    }

    #[test]
    fn test_head_delete_merges_into_previous_block() {
        let mut doc = Document::new();
        let first = doc.append_paragraph("ab").unwrap();
        let second = doc.append_paragraph("cd").unwrap();

        assert_eq!(
            doc.head_delete(first).unwrap().cursor,
            Some(Cursor::new(first, 0))
        );
        let focus = doc.head_delete(second).unwrap();
        assert_eq!(focus.cursor, Some(Cursor::new(first, 2)));
        assert_eq!(doc.text(first).unwrap(), "abcd");
    }

    #[test]
    fn test_modify_decorate_emits_update_only_on_change() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("a").unwrap();

        doc.modify_decorate(
            paragraph,
            Some(DecorateOp::set("textAlign", "center")),
            Some(DecorateOp::set("lang", "en")),
        )
        .unwrap();
        assert_eq!(
            doc.take_events(),
            vec![DocumentEvent::ComponentUpdated(vec![paragraph])]
        );

        doc.modify_decorate(paragraph, None, Some(DecorateOp::remove("missing")))
            .unwrap();
        assert!(doc.take_events().is_empty());
    }
}
