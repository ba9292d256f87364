//! Structural primitives shared by every collection.
//!
//! `attach` and `detach_range` are the only two places that rewrite
//! `children` / `parent` links. Everything else (split, receive, range
//! delete, list policy) is built on top of them, which keeps the parent
//! invariant local to this file.

use std::ops::{Add, AddAssign};

use serde::Serialize;

use crate::components::list::list_item_style;
use crate::components::{NodeId, NodeKind, StructureType};
use crate::editing::Document;
use crate::editing::document::Deferred;
use crate::error::{EditError, Result};

/// Counts of node kinds across a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistic {
    /// Characters of text in inline spans
    pub characters: usize,
    pub paragraph: usize,
    pub heading: usize,
    pub list: usize,
    pub table: usize,
}

impl Add for Statistic {
    type Output = Statistic;

    fn add(mut self, other: Statistic) -> Statistic {
        self += other;
        self
    }
}

impl AddAssign for Statistic {
    fn add_assign(&mut self, other: Statistic) {
        self.characters += other.characters;
        self.paragraph += other.paragraph;
        self.heading += other.heading;
        self.list += other.list;
        self.table += other.table;
    }
}

impl Document {
    /// Insert `items` into `parent` at `index`.
    ///
    /// Items must be detached and compatible with the parent's accepted-child
    /// policy. Validation covers every item before anything moves, so a
    /// failure never leaves a partial insertion behind. Lists restyle their
    /// items before inserting them (see [`list_item_style`]).
    pub fn add_children(
        &mut self,
        parent: NodeId,
        index: usize,
        items: &[NodeId],
    ) -> Result<Vec<NodeId>> {
        self.transact("add children", |doc| doc.attach(parent, index, items))
    }

    /// Remove the half-open range `start..end` (default `start + 1`) from
    /// `parent`, returning the removed items with their parent cleared.
    ///
    /// Removing up to the end of a list schedules a check on the next tick
    /// that detaches the list if it is still empty by then.
    pub fn remove_children(
        &mut self,
        parent: NodeId,
        start: usize,
        end: Option<usize>,
    ) -> Result<Vec<NodeId>> {
        self.transact("remove children", |doc| {
            doc.detach_range(parent, start, end.unwrap_or(start + 1))
        })
    }

    /// Detach a node from its parent. Returns the index it was removed from,
    /// or `None` when it was already detached.
    pub fn remove_self(&mut self, id: NodeId) -> Result<Option<usize>> {
        let Some(parent) = self.require(id)?.parent else {
            return Ok(None);
        };
        self.transact("remove", |doc| {
            let index = doc.find_children_index(parent, id)?;
            doc.detach_range(parent, index, index + 1)?;
            Ok(Some(index))
        })
    }

    /// Position of `child` inside `parent`
    pub fn find_children_index(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.require(parent)?
            .children
            .iter()
            .position(|id| *id == child)
            .ok_or(EditError::NotAChild { parent, child })
    }

    pub fn get_child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(&parent)?.children.get(index).copied()
    }

    /// Sibling before `child`, `None` at the start or for detached nodes
    pub fn get_prev(&self, child: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(&child)?.parent?;
        let index = self.find_children_index(parent, child).ok()?;
        index
            .checked_sub(1)
            .and_then(|prev| self.get_child(parent, prev))
    }

    /// Sibling after `child`, `None` at the end or for detached nodes
    pub fn get_next(&self, child: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(&child)?.parent?;
        let index = self.find_children_index(parent, child).ok()?;
        self.get_child(parent, index + 1)
    }

    /// Addressable size: characters for text, children for collections
    pub fn size(&self, id: NodeId) -> Result<usize> {
        let node = self.require(id)?;
        match (&node.kind, node.structure_type()) {
            (NodeKind::Character(text), _) => Ok(text.char_len()),
            (_, StructureType::Content) => self.text_len(id),
            _ => Ok(node.children.len()),
        }
    }

    /// Aggregate counts over the subtree rooted at `id`
    pub fn statistic(&self, id: NodeId) -> Result<Statistic> {
        let node = self.require(id)?;
        let mut own = Statistic::default();
        match &node.kind {
            NodeKind::Character(text) => own.characters += text.char_len(),
            NodeKind::Paragraph => own.paragraph += 1,
            NodeKind::Heading(_) => own.heading += 1,
            NodeKind::List(_) => own.list += 1,
            NodeKind::Table => own.table += 1,
            NodeKind::Article | NodeKind::TableRow | NodeKind::TableCell(_) => {}
        }
        node.children
            .iter()
            .try_fold(own, |acc, child| Ok(acc + self.statistic(*child)?))
    }

    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        index: usize,
        items: &[NodeId],
    ) -> Result<Vec<NodeId>> {
        let parent_node = self.require(parent)?;
        let size = parent_node.children.len();
        if index > size {
            return Err(EditError::OutOfBounds {
                id: parent,
                index,
                size,
            });
        }
        let parent_kind = parent_node.kind.clone();

        for (position, item) in items.iter().enumerate() {
            let node = self.require(*item)?;
            if node.parent.is_some() || items[..position].contains(item) {
                return Err(EditError::AlreadyAttached(*item));
            }
            if !parent_kind.accepts(&node.kind) {
                return Err(EditError::StructuralViolation {
                    parent: parent_kind.component_type(),
                    child: node.component_type(),
                });
            }
            if self.is_ancestor(*item, parent) {
                return Err(EditError::Cycle(*item));
            }
        }

        if let NodeKind::List(list_type) = parent_kind {
            for item in items {
                let op = list_item_style(list_type);
                self.node_mut(*item)?.decoration.merge_style(op);
            }
        }

        for item in items {
            self.node_mut(*item)?.parent = Some(parent);
        }
        self.node_mut(parent)?
            .children
            .splice(index..index, items.iter().copied());
        Ok(items.to_vec())
    }

    pub(crate) fn detach_range(
        &mut self,
        parent: NodeId,
        start: usize,
        end: usize,
    ) -> Result<Vec<NodeId>> {
        let parent_node = self.require(parent)?;
        let size = parent_node.children.len();
        if start > end || end > size {
            return Err(EditError::OutOfBounds {
                id: parent,
                index: end.max(start),
                size,
            });
        }
        if parent_node.is_list() && end == size {
            let origin = self.current_seq();
            self.schedule(Deferred::RemoveIfEmpty {
                list: parent,
                origin,
            });
        }

        let removed: Vec<NodeId> = self.node_mut(parent)?.children.drain(start..end).collect();
        for item in &removed {
            self.node_mut(*item)?.parent = None;
        }
        Ok(removed)
    }
}
