//! Undo/redo history
//!
//! Every committed transaction becomes one [`HistoryEntry`] holding the state
//! of each node it touched before and after the change. Undo applies the
//! `before` states, redo the `after` states. A state of `None` means the node
//! did not exist (created or destroyed by the transaction).

use std::collections::HashMap;

use crate::components::{Decoration, Node, NodeId, NodeKind};

/// Immutable copy of one component's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub decoration: Decoration,
}

impl Node {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            kind: self.kind.clone(),
            parent: self.parent,
            children: self.children.clone(),
            decoration: self.decoration.clone(),
        }
    }

    pub(crate) fn from_snapshot(id: NodeId, snapshot: Snapshot) -> Node {
        Node {
            id,
            kind: snapshot.kind,
            parent: snapshot.parent,
            children: snapshot.children,
            decoration: snapshot.decoration,
        }
    }
}

pub type NodeStates = HashMap<NodeId, Option<Snapshot>>;

/// A single undoable step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    seq: u64,
    label: String,
    before: NodeStates,
    after: NodeStates,
}

impl HistoryEntry {
    pub(crate) fn new(seq: u64, label: String, before: NodeStates, after: NodeStates) -> Self {
        Self {
            seq,
            label,
            before,
            after,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn before(&self) -> &NodeStates {
        &self.before
    }

    pub fn after(&self) -> &NodeStates {
        &self.after
    }

    /// Number of nodes whose state this entry restores
    pub fn len(&self) -> usize {
        self.before.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty()
    }

    /// True when applying the entry in either direction changes nothing
    pub(crate) fn is_noop(&self) -> bool {
        self.before
            .iter()
            .all(|(id, state)| self.after.get(id) == Some(state))
    }

    /// Fold a later change into this entry; earlier `before` states win
    fn absorb(&mut self, later: HistoryEntry) {
        for (id, state) in later.before {
            self.before.entry(id).or_insert(state);
        }
        self.after.extend(later.after);
    }

    fn referenced_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.before
            .iter()
            .chain(self.after.iter())
            .flat_map(|(id, state)| {
                std::iter::once(*id).chain(
                    state
                        .iter()
                        .flat_map(|snapshot| snapshot.children.iter().copied()),
                )
            })
    }
}

/// Two-stack undo/redo record with a bounded depth
#[derive(Debug)]
pub struct Record {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
    max_entries: usize,
    next_seq: u64,
}

impl Record {
    pub fn new(max_entries: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_entries,
            next_seq: 0,
        }
    }

    pub(crate) fn allocate_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Push a freshly committed entry; invalidates everything that was undone
    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.future.clear();
        self.past.push(entry);
        if self.max_entries > 0 && self.past.len() > self.max_entries {
            let overflow = self.past.len() - self.max_entries;
            self.past.drain(..overflow);
        }
    }

    /// Fold `entry` into the top of `past` if that is the entry it belongs to.
    ///
    /// Hands the entry back when the top of the stack is a different step.
    pub(crate) fn amend(&mut self, entry: HistoryEntry) -> Result<(), HistoryEntry> {
        match self.past.last_mut() {
            Some(top) if top.seq == entry.seq => {
                top.absorb(entry);
                Ok(())
            }
            _ => Err(entry),
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.past.pop()
    }

    pub(crate) fn push_redo(&mut self, entry: HistoryEntry) {
        self.future.push(entry);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.future.pop()
    }

    /// Undone entries go back on `past` without touching `future`
    pub(crate) fn push_undone(&mut self, entry: HistoryEntry) {
        self.past.push(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    pub fn next_undo_label(&self) -> Option<&str> {
        self.past.last().map(HistoryEntry::label)
    }

    pub fn next_redo_label(&self) -> Option<&str> {
        self.future.last().map(HistoryEntry::label)
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Every node id some entry may need to restore
    pub(crate) fn referenced_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.past
            .iter()
            .chain(self.future.iter())
            .flat_map(HistoryEntry::referenced_ids)
    }
}
