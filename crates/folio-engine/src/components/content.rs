//! Text blocks: paragraphs, headings and table cells.
//!
//! A text block addresses its content by character offset across its inline
//! spans. Spans keep their own decoration; edits at a span boundary go into
//! the span before the boundary so typed text inherits the preceding style.

use crate::components::{Node, NodeId, NodeKind, StructureType, Text};
use crate::editing::{Cursor, Document, Focus};
use crate::error::{EditError, Result};

impl Document {
    /// Plain text of a text block or inline span
    pub fn text(&self, id: NodeId) -> Result<String> {
        let node = self.require(id)?;
        match (&node.kind, node.structure_type()) {
            (NodeKind::Character(text), _) => Ok(text.to_string()),
            (_, StructureType::Content) => Ok(self
                .spans(node)
                .map(|(_, text)| text.to_string())
                .collect()),
            _ => Err(text_expected(id)),
        }
    }

    pub(crate) fn text_len(&self, id: NodeId) -> Result<usize> {
        let node = self.require(id)?;
        Ok(self.spans(node).map(|(_, text)| text.char_len()).sum())
    }

    /// A text block without characters, a collection without children or an
    /// empty span
    pub fn is_empty_block(&self, id: NodeId) -> Result<bool> {
        Ok(self.size(id)? == 0)
    }

    fn spans<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = (NodeId, &'a Text)> + 'a {
        node.children.iter().filter_map(|id| match self.nodes.get(id) {
            Some(Node {
                kind: NodeKind::Character(text),
                ..
            }) => Some((*id, text)),
            _ => None,
        })
    }

    /// Find the span holding character `offset` of a text block.
    ///
    /// Returns the span's index among the block's children and the offset
    /// inside that span. Boundaries resolve to the earlier span.
    fn locate(&self, block: NodeId, offset: usize) -> Result<Option<(usize, usize)>> {
        let node = self.require(block)?;
        let mut start = 0;
        for (index, (_, text)) in self.spans(node).enumerate() {
            let len = text.char_len();
            if offset <= start + len {
                return Ok(Some((index, offset - start)));
            }
            start += len;
        }
        Ok(None)
    }

    fn require_text_block(&self, id: NodeId) -> Result<&Node> {
        let node = self.require(id)?;
        if node.is_text_block() {
            Ok(node)
        } else {
            Err(text_expected(id))
        }
    }

    /// Type `content` at character `offset`
    pub fn insert_text(&mut self, id: NodeId, offset: usize, content: &str) -> Result<Focus> {
        let size = self.size(id)?;
        if offset > size {
            return Err(EditError::OutOfBounds {
                id,
                index: offset,
                size,
            });
        }
        let end = Cursor::new(id, offset + content.chars().count());

        self.transact("insert text", |doc| {
            if let NodeKind::Character(text) = &mut doc.node_mut(id)?.kind {
                text.insert(offset, content);
                return Ok(Focus::at(end));
            }
            doc.require_text_block(id)?;
            match doc.locate(id, offset)? {
                Some((index, local)) => {
                    let span = doc.require(id)?.children[index];
                    if let NodeKind::Character(text) = &mut doc.node_mut(span)?.kind {
                        text.insert(local, content);
                    }
                }
                None => {
                    let span = doc.build_character(content);
                    doc.attach(id, 0, &[span])?;
                }
            }
            Ok(Focus::at(end))
        })
    }

    /// Delete `start..end` from a node.
    ///
    /// Text blocks and spans delete characters (`end` defaults to the end of
    /// the text) and drop spans left empty; structure collections remove
    /// children. Focus lands on `start`.
    pub fn remove(&mut self, id: NodeId, start: usize, end: Option<usize>) -> Result<Focus> {
        let size = self.size(id)?;
        let end = end.unwrap_or(size).min(size);
        if start > end {
            return Err(EditError::InvalidRange(format!(
                "{start}..{end} in {id}"
            )));
        }
        let structure = self.require(id)?.structure_type();

        self.transact("remove", |doc| {
            match structure {
                StructureType::None => {
                    if let NodeKind::Character(text) = &mut doc.node_mut(id)?.kind {
                        text.delete(start, end);
                    }
                }
                StructureType::Content => doc.delete_text(id, start, end)?,
                StructureType::Structure => {
                    doc.detach_range(id, start, end)?;
                }
            }
            Ok(Focus::at(Cursor::new(id, start)))
        })
    }

    fn delete_text(&mut self, block: NodeId, start: usize, end: usize) -> Result<()> {
        if start == end {
            return Ok(());
        }
        let spans: Vec<(NodeId, usize)> = {
            let node = self.require(block)?;
            self.spans(node).map(|(id, text)| (id, text.char_len())).collect()
        };

        let mut offset = 0;
        let mut emptied = Vec::new();
        for (span, len) in spans {
            let (span_start, span_end) = (offset, offset + len);
            offset = span_end;
            if span_end <= start || span_start >= end {
                continue;
            }
            let local_start = start.saturating_sub(span_start);
            let local_end = end.min(span_end) - span_start;
            if let NodeKind::Character(text) = &mut self.node_mut(span)?.kind {
                text.delete(local_start, local_end);
                if text.is_empty() {
                    emptied.push(span);
                }
            }
        }
        for span in emptied {
            self.remove_self(span)?;
        }
        Ok(())
    }

    /// Replace the whole content of an inline span
    pub fn set_content(&mut self, id: NodeId, content: &str) -> Result<()> {
        if !matches!(self.require(id)?.kind, NodeKind::Character(_)) {
            return Err(EditError::WrongKind {
                id,
                expected: "character",
            });
        }
        self.transact("set content", |doc| {
            doc.node_mut(id)?.kind = NodeKind::Character(Text::new(content));
            Ok(())
        })
    }

    /// Enter key: move the text after `offset` into a new block of the same
    /// kind right after this one.
    pub fn split_at(&mut self, id: NodeId, offset: usize) -> Result<Focus> {
        self.require_text_block(id)?;
        self.split(id, offset, &[])
    }

    /// Cut a text block at `offset`, returning a detached block of the same
    /// kind holding the tail
    pub(crate) fn split_text(&mut self, block: NodeId, offset: usize) -> Result<NodeId> {
        let size = self.size(block)?;
        if offset > size {
            return Err(EditError::OutOfBounds {
                id: block,
                index: offset,
                size,
            });
        }
        let tail = self.create_empty(block)?;
        let Some((index, local)) = self.locate(block, offset)? else {
            return Ok(tail);
        };

        let span = self.require(block)?.children[index];
        let decoration = self.require(span)?.decoration.clone();
        let rest = match &mut self.node_mut(span)?.kind {
            NodeKind::Character(text) => text.split_off(local),
            _ => Text::new(""),
        };

        let len = self.require(block)?.children.len();
        let mut moved = self.detach_range(block, index + 1, len)?;
        if !rest.is_empty() {
            let head = self.insert_node(Node::new(NodeKind::Character(rest), decoration));
            moved.insert(0, head);
        }
        if let NodeKind::Character(text) = &self.require(span)?.kind
            && text.is_empty()
        {
            self.remove_self(span)?;
        }
        self.attach(tail, 0, &moved)?;
        Ok(tail)
    }

    /// Merge neighbouring spans that carry the same decoration
    pub(crate) fn merge_spans(&mut self, block: NodeId) -> Result<()> {
        let children = self.require(block)?.children.clone();
        let mut previous: Option<NodeId> = None;
        for span in children {
            let Some(prev) = previous else {
                previous = Some(span);
                continue;
            };
            let (prev_node, node) = (self.require(prev)?, self.require(span)?);
            let content = match (&node.kind, prev_node.decoration == node.decoration) {
                (NodeKind::Character(text), true) => text.to_string(),
                _ => {
                    previous = Some(span);
                    continue;
                }
            };
            if let NodeKind::Character(target) = &mut self.node_mut(prev)?.kind {
                target.push_str(&content);
            }
            self.remove_self(span)?;
        }
        Ok(())
    }
}

fn text_expected(id: NodeId) -> EditError {
    EditError::WrongKind {
        id,
        expected: "text block",
    }
}
