//! Node construction.
//!
//! Builders insert new, detached nodes into the arena. They record nothing on
//! their own: a node only enters the history once an operation attaches it,
//! or when it is built inside an operation that is already recording.

use std::collections::BTreeMap;

use crate::components::list::list_style;
use crate::components::{
    CellType, ComponentType, Decoration, HeadingType, ListType, Node, NodeId, NodeKind, RawNode,
    Text,
};
use crate::editing::Document;
use crate::error::{EditError, Result};

impl Document {
    /// Build a detached subtree from its raw form.
    ///
    /// Raw ids are kept when they parse and neither the arena nor the
    /// history knows them yet; anything else gets a fresh id.
    pub fn create(&mut self, raw: &RawNode) -> Result<NodeId> {
        let component_type = ComponentType::from_tag(&raw.kind)
            .ok_or_else(|| EditError::UnknownType(raw.kind.clone()))?;
        let kind = match component_type {
            ComponentType::Article => NodeKind::Article,
            ComponentType::Paragraph => NodeKind::Paragraph,
            ComponentType::Heading => NodeKind::Heading(raw.heading_type.unwrap_or_default()),
            ComponentType::List => NodeKind::List(raw.list_type.unwrap_or_default()),
            ComponentType::Table => NodeKind::Table,
            ComponentType::TableRow => NodeKind::TableRow,
            ComponentType::TableCell => NodeKind::TableCell(raw.cell_type.unwrap_or_default()),
            ComponentType::Character => {
                NodeKind::Character(Text::new(raw.content.as_deref().unwrap_or_default()))
            }
        };
        let decoration = Decoration::new(
            raw.style.clone().unwrap_or_default(),
            raw.data.clone().unwrap_or_default(),
        );

        let mut node = Node::new(kind, decoration);
        if let Some(id) = raw.id.as_deref().and_then(NodeId::parse)
            && !self.nodes.contains_key(&id)
            && !self.record.referenced_ids().any(|used| used == id)
        {
            node.id = id;
        } else if let Some(id) = &raw.id {
            log::debug!("Replacing unusable raw id {id}");
        }
        if node.kind == NodeKind::List(ListType::Nl) {
            node.decoration.merge_style(list_style(ListType::Nl));
        }
        let id = self.insert_node(node);

        let children = raw
            .children
            .iter()
            .flatten()
            .map(|child| self.create(child))
            .collect::<Result<Vec<_>>>()?;
        self.attach(id, 0, &children)?;
        Ok(id)
    }

    /// New list holding `children`, which must be detached blocks
    pub fn build_list(
        &mut self,
        list_type: ListType,
        children: &[NodeId],
        style: Option<BTreeMap<String, String>>,
        data: Option<BTreeMap<String, String>>,
    ) -> Result<NodeId> {
        let mut decoration =
            Decoration::new(style.unwrap_or_default(), data.unwrap_or_default());
        if list_type == ListType::Nl {
            decoration.merge_style(list_style(list_type));
        }
        let list = self.insert_node(Node::new(NodeKind::List(list_type), decoration));
        self.attach(list, 0, children)?;
        Ok(list)
    }

    /// New paragraph; an empty `content` yields a paragraph without spans
    pub fn build_paragraph(&mut self, content: &str) -> NodeId {
        self.build_text_block(NodeKind::Paragraph, content)
    }

    pub fn build_heading(&mut self, heading_type: HeadingType, content: &str) -> NodeId {
        self.build_text_block(NodeKind::Heading(heading_type), content)
    }

    pub fn build_character(&mut self, content: &str) -> NodeId {
        self.insert_node(Node::new(
            NodeKind::Character(Text::new(content)),
            Decoration::default(),
        ))
    }

    /// Table of empty cells; with `header` set the first row uses `th` cells
    pub fn build_table(&mut self, rows: usize, cols: usize, header: bool) -> Result<NodeId> {
        let table = self.insert_node(Node::new(NodeKind::Table, Decoration::default()));
        for row_index in 0..rows {
            let cell_type = if header && row_index == 0 {
                CellType::Th
            } else {
                CellType::Td
            };
            let row = self.insert_node(Node::new(NodeKind::TableRow, Decoration::default()));
            let cells: Vec<NodeId> = (0..cols)
                .map(|_| {
                    self.insert_node(Node::new(
                        NodeKind::TableCell(cell_type),
                        Decoration::default(),
                    ))
                })
                .collect();
            self.attach(row, 0, &cells)?;
            self.attach(table, row_index, &[row])?;
        }
        Ok(table)
    }

    /// Detached node of the same kind and decoration as `id`, without
    /// children. Spans come back with empty text.
    pub fn create_empty(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.require(id)?;
        let kind = match &source.kind {
            NodeKind::Character(_) => NodeKind::Character(Text::new("")),
            kind => kind.clone(),
        };
        let decoration = source.decoration.clone();
        Ok(self.insert_node(Node::new(kind, decoration)))
    }

    /// Append a paragraph at the end of the document
    pub fn append_paragraph(&mut self, content: &str) -> Result<NodeId> {
        self.transact("append paragraph", |doc| {
            let paragraph = doc.build_paragraph(content);
            doc.append_to_root(paragraph)
        })
    }

    pub fn append_heading(&mut self, heading_type: HeadingType, content: &str) -> Result<NodeId> {
        self.transact("append heading", |doc| {
            let heading = doc.build_heading(heading_type, content);
            doc.append_to_root(heading)
        })
    }

    fn append_to_root(&mut self, block: NodeId) -> Result<NodeId> {
        let root = self.root;
        let size = self.require(root)?.children.len();
        self.attach(root, size, &[block])?;
        Ok(block)
    }

    fn build_text_block(&mut self, kind: NodeKind, content: &str) -> NodeId {
        let block = self.insert_node(Node::new(kind, Decoration::default()));
        if !content.is_empty() {
            let span = self.build_character(content);
            if let Some(node) = self.nodes.get_mut(&span) {
                node.parent = Some(block);
            }
            if let Some(node) = self.nodes.get_mut(&block) {
                node.children.push(span);
            }
        }
        block
    }
}
