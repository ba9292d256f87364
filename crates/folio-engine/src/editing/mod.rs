/*!
 * # Editing Core Module
 *
 * Everything that changes a document goes through [`Document`]. The module
 * splits into three layers:
 *
 * ### 1. Arena and transactions (`document`)
 * - Nodes live in a `HashMap<NodeId, Node>`; collections own their children
 *   by id and children point back with a non-owning `parent` id
 * - Every public mutation runs inside a transaction; nested calls fold into
 *   the outermost one so a user edit is a single undo step
 * - The first time a transaction touches a node its state is captured; on
 *   commit the touched nodes' new states are captured as well
 *
 * ### 2. Cross-node operations (`operations`, `selection`)
 * - `split`, `receive` / `send_to`, `head_delete` combine the collection
 *   primitives and return a [`Focus`] telling the caller where input resumes
 * - `delete_selection` removes an arbitrary cursor range in three phases:
 *   truncate first, truncate last, merge last into first, drop the middles
 *
 * ### 3. History (`record`)
 * - A two-stack record of `(before, after)` node states
 * - Deferred cleanups that run on the next [`Document::tick`] are folded into
 *   the entry that scheduled them
 *
 * ## Usage Pattern
 *
 * ```rust
 * use folio_engine::{Cursor, Document};
 *
 * let mut doc = Document::new();
 * let first = doc.append_paragraph("hello").unwrap();
 * let second = doc.append_paragraph("world").unwrap();
 *
 * let focus = doc
 *     .delete_selection(Cursor::new(first, 2), Some(Cursor::new(second, 3)))
 *     .unwrap();
 * assert_eq!(focus, Some(Cursor::new(first, 2)));
 * assert_eq!(doc.text(first).unwrap(), "held");
 *
 * doc.undo();
 * assert_eq!(doc.text(first).unwrap(), "hello");
 * ```
 */

pub mod document;
pub mod operations;
pub mod record;
pub mod selection;

pub use document::{Document, DocumentEvent, DocumentOptions};
pub use record::{HistoryEntry, Record, Snapshot};

use crate::components::NodeId;

/// An address into document content.
///
/// `offset` is a character offset for text blocks and inline spans and a
/// child index for structure collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub id: NodeId,
    pub offset: usize,
}

impl Cursor {
    pub fn new(id: NodeId, offset: usize) -> Self {
        Self { id, offset }
    }
}

/// Result of an editing operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Focus {
    /// Nodes the operation changed, for the view layer to refresh
    pub nodes: Vec<NodeId>,
    /// Where input resumes, when the operation decides it
    pub cursor: Option<Cursor>,
}

impl Focus {
    pub fn new(nodes: Vec<NodeId>, cursor: Option<Cursor>) -> Self {
        Self { nodes, cursor }
    }

    pub fn at(cursor: Cursor) -> Self {
        Self {
            nodes: vec![cursor.id],
            cursor: Some(cursor),
        }
    }
}
