//! Cursor ranges over the document's text blocks.

use crate::components::NodeId;
use crate::editing::{Cursor, Document};
use crate::error::{EditError, Result};

impl Document {
    /// Text blocks of the live tree in reading order
    pub fn text_blocks(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|node| node.is_text_block()))
            .collect()
    }

    /// Text blocks from `start` to `end` inclusive, in reading order.
    ///
    /// Fails with `NotFound` for ids the document does not know and with
    /// `InvalidRange` when either end is not a live text block or `end`
    /// comes before `start`.
    pub fn selected_ids(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>> {
        self.require(start)?;
        self.require(end)?;
        let blocks = self.text_blocks();
        let position = |id: NodeId| {
            blocks
                .iter()
                .position(|block| *block == id)
                .ok_or_else(|| EditError::InvalidRange(format!("{id} is not a text block")))
        };
        let (first, last) = (position(start)?, position(end)?);
        if last < first {
            return Err(EditError::InvalidRange(format!(
                "{end} comes before {start}"
            )));
        }
        Ok(blocks[first..=last].to_vec())
    }

    /// Delete everything between two cursors.
    ///
    /// A missing end or a caret deletes nothing. Within one block the text
    /// between the offsets goes; across blocks the first block keeps its
    /// head, the last block keeps its tail and is merged into the first, and
    /// every block in between is removed. Returns the cursor where input
    /// resumes, `None` when nothing happened.
    ///
    /// Unknown ids fail with `NotFound`. Ranges that cannot be resolved
    /// (reversed, past the end of a block, or not over text) are logged and
    /// ignored.
    pub fn delete_selection(&mut self, start: Cursor, end: Option<Cursor>) -> Result<Option<Cursor>> {
        self.require(start.id)?;
        let Some(end) = end else {
            return Ok(None);
        };
        self.require(end.id)?;
        if start == end {
            return Ok(None);
        }

        let ids = match self.selected_ids(start.id, end.id) {
            Ok(ids) => ids,
            Err(EditError::InvalidRange(reason)) => {
                log::warn!("Ignoring selection delete: {reason}");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let (first, last) = match ids.as_slice() {
            [] => return Ok(None),
            [only] => (*only, *only),
            [first, .., last] => (*first, *last),
        };

        let (first_size, last_size) = (self.size(first)?, self.size(last)?);
        if start.offset > first_size || end.offset > last_size {
            log::warn!(
                "Ignoring selection delete: offsets {} / {} exceed block sizes {first_size} / {last_size}",
                start.offset,
                end.offset
            );
            return Ok(None);
        }

        if first == last {
            if end.offset < start.offset {
                log::warn!(
                    "Ignoring selection delete: {}..{} runs backwards",
                    start.offset,
                    end.offset
                );
                return Ok(None);
            }
            let focus = self.remove(first, start.offset, Some(end.offset))?;
            return Ok(focus.cursor);
        }

        self.transact("delete selection", |doc| {
            doc.remove(first, start.offset, None)?;
            doc.remove(last, 0, Some(end.offset))?;
            doc.send_to(last, first)?;
            for middle in &ids[1..ids.len() - 1] {
                doc.remove_self(*middle)?;
            }
            Ok(Some(Cursor::new(first, start.offset)))
        })
    }
}
