use std::collections::{HashMap, HashSet, VecDeque};

use crate::components::{
    Decoration, ListType, Node, NodeId, NodeKind, RawNode, StructureType,
};
use crate::editing::record::{HistoryEntry, NodeStates, Record};
use crate::error::{EditError, Result};

/// Knobs a host application passes when opening a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Maximum number of undo steps kept (0 = unbounded)
    pub history_limit: usize,
    /// List type used by `exchange_list` callers that do not pick one
    pub default_list_type: ListType,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            history_limit: 100,
            default_list_type: ListType::Ul,
        }
    }
}

/// Notifications for the view layer, drained with [`Document::take_events`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// These nodes changed in place and need a fresh render
    ComponentUpdated(Vec<NodeId>),
}

/// Single-shot work queued for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deferred {
    /// Detach the list if it is still attached and still empty
    RemoveIfEmpty { list: NodeId, origin: Option<u64> },
}

impl Deferred {
    fn origin(&self) -> Option<u64> {
        match self {
            Deferred::RemoveIfEmpty { origin, .. } => *origin,
        }
    }
}

/// State captured while a transaction is open
#[derive(Debug)]
pub(crate) struct Transaction {
    seq: u64,
    label: String,
    before: NodeStates,
    events_mark: usize,
    amend: bool,
}

/// A rich-text document: component arena, deferred task queue and record.
///
/// The document owns every node. Collections hold their children by
/// [`NodeId`] and each child points back at its parent with a plain id, so the
/// back edge never owns anything. Nodes that end up detached stay in the arena
/// until the next [`tick`](Document::tick) sweeps everything unreachable from
/// both the root and the undo history.
///
/// ## Mutation model
///
/// All public mutations are synchronous and run inside a transaction:
///
/// 1. The first time a node is touched its [`Snapshot`](super::Snapshot) is
///    taken (`None` if the node does not exist yet)
/// 2. The operation validates before it mutates, so failures leave no trace
/// 3. On success the touched nodes' new states are captured and pushed to the
///    record as one undo step; on failure the captured states are restored
///
/// Operations called from inside another operation join the outer
/// transaction instead of opening their own.
#[derive(Debug)]
pub struct Document {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) root: NodeId,
    pub(crate) record: Record,
    pub(crate) deferred: VecDeque<Deferred>,
    pub(crate) events: Vec<DocumentEvent>,
    pub(crate) transaction: Option<Transaction>,
    pub(crate) options: DocumentOptions,
}

impl Document {
    /// Create an empty article
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Self {
        let root = Node::new(NodeKind::Article, Decoration::default());
        let root_id = root.id;
        Self {
            nodes: HashMap::from([(root_id, root)]),
            root: root_id,
            record: Record::new(options.history_limit),
            deferred: VecDeque::new(),
            events: Vec::new(),
            transaction: None,
            options,
        }
    }

    /// Build a document from a raw article tree.
    ///
    /// Construction is not recorded: the history of the new document starts
    /// empty.
    pub fn from_raw(raw: &RawNode, options: DocumentOptions) -> Result<Self> {
        let mut doc = Self::with_options(options);
        let placeholder = doc.root;
        let root = doc.create(raw)?;
        if !matches!(doc.nodes.get(&root).map(Node::kind), Some(NodeKind::Article)) {
            return Err(EditError::WrongKind {
                id: root,
                expected: "article",
            });
        }
        doc.nodes.remove(&placeholder);
        doc.root = root;
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Any node still held by the arena, attached or not
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node that is part of the live tree.
    ///
    /// Fails with `NotFound` for unknown ids and for nodes that have been
    /// detached from the document.
    pub fn get_block_by_id(&self, id: NodeId) -> Result<&Node> {
        if !self.is_attached(id) {
            return Err(EditError::NotFound(id));
        }
        self.nodes.get(&id).ok_or(EditError::NotFound(id))
    }

    /// True when `id` is reachable from the root through parent links
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == self.root {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(|node| node.parent);
        }
        false
    }

    /// True when `ancestor` is `id` itself or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(|node| node.parent);
        }
        false
    }

    /// Chain of ancestors from the direct parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.nodes.get(&id).and_then(|node| node.parent);
        while let Some(node_id) = current {
            result.push(node_id);
            current = self.nodes.get(&node_id).and_then(|node| node.parent);
        }
        result
    }

    pub(crate) fn require(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(EditError::NotFound(id))
    }

    /// Mutable access that records the node's prior state first
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.touch(id);
        self.nodes.get_mut(&id).ok_or(EditError::NotFound(id))
    }

    pub(crate) fn touch(&mut self, id: NodeId) {
        if let Some(txn) = self.transaction.as_mut()
            && !txn.before.contains_key(&id)
        {
            txn.before.insert(id, self.nodes.get(&id).map(Node::snapshot));
        }
    }

    pub(crate) fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.touch(id);
        self.nodes.insert(id, node);
        id
    }

    pub(crate) fn emit(&mut self, event: DocumentEvent) {
        self.events.push(event);
    }

    /// Drain the notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn current_seq(&self) -> Option<u64> {
        self.transaction.as_ref().map(|txn| txn.seq)
    }

    pub(crate) fn schedule(&mut self, task: Deferred) {
        if !self.deferred.contains(&task) {
            self.deferred.push_back(task);
        }
    }

    /// Number of deferred tasks waiting for the next tick
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    /// Run one scheduler turn.
    ///
    /// Executes the deferred tasks queued before this call (tasks they queue
    /// wait for the following tick), then drops nodes that are neither in the
    /// tree nor needed by the history. Returns the number of tasks run.
    pub fn tick(&mut self) -> usize {
        let tasks: Vec<Deferred> = self.deferred.drain(..).collect();
        for task in &tasks {
            let result = self.transact_deferred(*task, |doc| doc.run_deferred(*task));
            if let Err(err) = result {
                log::warn!("Deferred task {task:?} failed: {err}");
            }
        }
        let swept = self.collect_garbage();
        if swept > 0 {
            log::debug!("Swept {swept} detached nodes");
        }
        tasks.len()
    }

    fn run_deferred(&mut self, task: Deferred) -> Result<()> {
        match task {
            Deferred::RemoveIfEmpty { list, .. } => {
                let Some(node) = self.nodes.get(&list) else {
                    return Ok(());
                };
                if !node.children.is_empty() || node.parent.is_none() {
                    return Ok(());
                }
                log::debug!("Removing empty list {list}");
                self.remove_self(list)?;
                Ok(())
            }
        }
    }

    fn collect_garbage(&mut self) -> usize {
        let mut live = HashSet::new();
        let mut stack: Vec<NodeId> = std::iter::once(self.root)
            .chain(self.record.referenced_ids())
            .collect();
        while let Some(id) = stack.pop() {
            if !live.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().copied());
            }
        }
        let before = self.nodes.len();
        self.nodes.retain(|id, _| live.contains(id));
        before - self.nodes.len()
    }

    /// Run `f` as one undoable step, or as part of the enclosing step
    pub(crate) fn transact<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.transaction.is_some() {
            return f(self);
        }
        let seq = self.record.allocate_seq();
        self.run_transaction(seq, label, false, f)
    }

    fn transact_deferred<T>(
        &mut self,
        task: Deferred,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        match task.origin() {
            Some(seq) => self.run_transaction(seq, "deferred cleanup", true, f),
            None => self.transact("deferred cleanup", f),
        }
    }

    fn run_transaction<T>(
        &mut self,
        seq: u64,
        label: &str,
        amend: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.transaction = Some(Transaction {
            seq,
            label: label.to_string(),
            before: HashMap::new(),
            events_mark: self.events.len(),
            amend,
        });
        let result = f(self);
        if let Some(txn) = self.transaction.take() {
            match &result {
                Ok(_) => self.commit(txn),
                Err(err) => {
                    log::warn!("Rolling back '{}': {err}", txn.label);
                    self.rollback(txn);
                }
            }
        }
        result
    }

    fn commit(&mut self, txn: Transaction) {
        let after: NodeStates = txn
            .before
            .keys()
            .map(|id| (*id, self.nodes.get(id).map(Node::snapshot)))
            .collect();
        let entry = HistoryEntry::new(txn.seq, txn.label, txn.before, after);
        if entry.is_noop() {
            return;
        }
        log::debug!(
            "Committed '{}' touching {} nodes",
            entry.label(),
            entry.len()
        );
        if txn.amend {
            if let Err(entry) = self.record.amend(entry) {
                self.record.push(entry);
            }
        } else {
            self.record.push(entry);
        }
    }

    fn rollback(&mut self, txn: Transaction) {
        self.apply_states(&txn.before);
        self.events.truncate(txn.events_mark);
        if !txn.amend {
            self.deferred
                .retain(|task| task.origin() != Some(txn.seq));
        }
    }

    fn apply_states(&mut self, states: &NodeStates) {
        for (id, state) in states {
            match state {
                Some(snapshot) => {
                    self.nodes
                        .insert(*id, Node::from_snapshot(*id, snapshot.clone()));
                }
                None => {
                    self.nodes.remove(id);
                }
            }
        }
    }

    fn emit_restored(&mut self, states: &NodeStates) {
        let mut restored: Vec<NodeId> = states
            .keys()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
        if restored.is_empty() {
            return;
        }
        restored.sort();
        self.emit(DocumentEvent::ComponentUpdated(restored));
    }

    /// Revert the most recent step. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.record.pop_undo() else {
            return false;
        };
        log::debug!("Undo '{}'", entry.label());
        self.apply_states(entry.before());
        self.emit_restored(entry.before());
        self.record.push_redo(entry);
        true
    }

    /// Re-apply the most recently undone step. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.record.pop_redo() else {
            return false;
        };
        log::debug!("Redo '{}'", entry.label());
        self.apply_states(entry.after());
        self.emit_restored(entry.after());
        self.record.push_undone(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.record.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.record.can_redo()
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Forget all history, e.g. after loading or saving
    pub fn clear_history(&mut self) {
        self.record.clear();
    }

    /// Nodes reachable from the root, in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    /// Check the structural invariants of the live tree.
    ///
    /// Returns one message per violation; an empty vector means the tree is
    /// valid. Empty lists are only reported once no deferred cleanup is
    /// pending, since they are legitimately transient until the next tick.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        match self.nodes.get(&self.root) {
            Some(root) if root.parent.is_some() => {
                problems.push(format!("root {} has a parent", self.root))
            }
            Some(_) => {}
            None => problems.push(format!("root {} missing", self.root)),
        }

        for id in self.descendants(self.root) {
            if !seen.insert(id) {
                problems.push(format!("{id} appears more than once"));
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                problems.push(format!("{id} is referenced but missing"));
                continue;
            };
            if node.structure_type() == StructureType::None && !node.children.is_empty() {
                problems.push(format!("leaf {id} has children"));
            }
            if node.is_list() && node.children.is_empty() && self.deferred.is_empty() {
                problems.push(format!("list {id} is empty"));
            }
            for child_id in &node.children {
                let Some(child) = self.nodes.get(child_id) else {
                    continue;
                };
                if child.parent != Some(id) {
                    problems.push(format!("{child_id} does not point back at {id}"));
                }
                if !node.kind.accepts(&child.kind) {
                    problems.push(format!(
                        "{} {child_id} not allowed in {} {id}",
                        child.component_type(),
                        node.component_type()
                    ));
                }
            }
        }
        problems
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::DecorateOp;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_is_valid_and_has_no_history() {
        let doc = Document::new();
        assert!(doc.invariant_violations().is_empty());
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
        assert_eq!(doc.pending_tasks(), 0);
    }

    #[test]
    fn test_undo_redo_on_empty_record_are_noops() {
        let mut doc = Document::new();
        assert!(!doc.undo());
        assert!(!doc.redo());
        assert!(doc.take_events().is_empty());
    }

    #[test]
    fn test_failed_operation_leaves_no_history() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("text").unwrap();
        let records_before = doc.record().undo_count();

        let character = doc.node(paragraph).unwrap().children()[0];
        let err = doc.add_children(doc.root(), 0, &[character]).unwrap_err();
        assert_eq!(err, EditError::AlreadyAttached(character));
        assert_eq!(doc.record().undo_count(), records_before);
    }

    #[test]
    fn test_nested_operations_fold_into_one_step() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("one").unwrap();
        let before = doc.record().undo_count();

        doc.exchange_list(paragraph, ListType::Ol).unwrap();
        assert_eq!(doc.record().undo_count(), before + 1);
    }

    #[test]
    fn test_noop_change_is_not_recorded() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("one").unwrap();
        doc.modify_decorate(paragraph, Some(DecorateOp::set("color", "red")), None)
            .unwrap();
        let count = doc.record().undo_count();

        doc.modify_decorate(paragraph, Some(DecorateOp::set("color", "red")), None)
            .unwrap();
        assert_eq!(doc.record().undo_count(), count);
    }

    #[test]
    fn test_get_block_by_id_rejects_detached_nodes() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("gone").unwrap();
        doc.remove_self(paragraph).unwrap();

        assert_eq!(
            doc.get_block_by_id(paragraph).unwrap_err(),
            EditError::NotFound(paragraph)
        );
        // Still held until the next tick
        assert!(doc.node(paragraph).is_some());
    }

    #[test]
    fn test_tick_keeps_nodes_the_history_needs() {
        let mut doc = Document::new();
        let paragraph = doc.append_paragraph("kept").unwrap();
        doc.remove_self(paragraph).unwrap();
        doc.tick();
        assert!(doc.node(paragraph).is_some());

        doc.clear_history();
        doc.tick();
        assert!(doc.node(paragraph).is_none());
    }

    #[test]
    fn test_from_raw_requires_article_root() {
        let raw = RawNode::new("paragraph");
        let err = Document::from_raw(&raw, DocumentOptions::default()).unwrap_err();
        assert!(matches!(err, EditError::WrongKind { expected: "article", .. }));
    }
}
