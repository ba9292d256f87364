use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{CellType, HeadingType, ListType, NodeId, NodeKind, StructureType};
use crate::editing::Document;
use crate::error::Result;

/// Interchange shape of a component subtree.
///
/// This is what [`Document::get_raw`] produces and [`Document::create`]
/// consumes. Serialized with camelCase keys and the kind under `type`, e.g.
///
/// ```json
/// {"type": "list", "listType": "ol", "children": [
///   {"type": "paragraph", "children": [{"type": "character", "content": "one"}]}
/// ]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<ListType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_type: Option<HeadingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<CellType>,
}

impl RawNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Paragraph with a single span, or none for empty text
    pub fn paragraph(content: &str) -> Self {
        let children = if content.is_empty() {
            Vec::new()
        } else {
            vec![RawNode::character(content)]
        };
        RawNode::new("paragraph").with_children(children)
    }

    pub fn character(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..RawNode::new("character")
        }
    }

    pub fn list(list_type: ListType, children: Vec<RawNode>) -> Self {
        Self {
            list_type: Some(list_type),
            ..RawNode::new("list").with_children(children)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Same tree with every id stripped, for comparing trees across documents
    pub fn without_ids(&self) -> RawNode {
        RawNode {
            id: None,
            children: self
                .children
                .as_ref()
                .map(|children| children.iter().map(RawNode::without_ids).collect()),
            ..self.clone()
        }
    }
}

impl Document {
    /// Raw form of the subtree rooted at `id`
    pub fn get_raw(&self, id: NodeId) -> Result<RawNode> {
        let node = self.require(id)?;
        let decoration = node.decoration();
        let mut raw = RawNode::new(node.component_type().as_str()).with_id(id.to_string());

        if !decoration.style().is_empty() {
            raw.style = Some(decoration.style().clone());
        }
        if !decoration.data().is_empty() {
            raw.data = Some(decoration.data().clone());
        }
        match &node.kind {
            NodeKind::Character(text) => raw.content = Some(text.to_string()),
            NodeKind::List(list_type) => raw.list_type = Some(*list_type),
            NodeKind::Heading(heading_type) => raw.heading_type = Some(*heading_type),
            NodeKind::TableCell(cell_type) => raw.cell_type = Some(*cell_type),
            NodeKind::Article | NodeKind::Paragraph | NodeKind::Table | NodeKind::TableRow => {}
        }
        if node.structure_type() != StructureType::None {
            let children = node
                .children
                .iter()
                .map(|child| self.get_raw(*child))
                .collect::<Result<Vec<_>>>()?;
            raw.children = Some(children);
        }
        Ok(raw)
    }
}
