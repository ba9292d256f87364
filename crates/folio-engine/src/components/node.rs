use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decorate::Decoration;
use super::text::Text;

/// Stable identity of a component, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the textual form produced by `Display`
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fixed type tag of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentType {
    Article,
    Paragraph,
    Heading,
    List,
    Table,
    TableRow,
    TableCell,
    Character,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Article => "article",
            ComponentType::Paragraph => "paragraph",
            ComponentType::Heading => "heading",
            ComponentType::List => "list",
            ComponentType::Table => "table",
            ComponentType::TableRow => "tableRow",
            ComponentType::TableCell => "tableCell",
            ComponentType::Character => "character",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let component_type = match tag {
            "article" => ComponentType::Article,
            "paragraph" => ComponentType::Paragraph,
            "heading" => ComponentType::Heading,
            "list" => ComponentType::List,
            "table" => ComponentType::Table,
            "tableRow" => ComponentType::TableRow,
            "tableCell" => ComponentType::TableCell,
            "character" => ComponentType::Character,
            _ => return None,
        };
        Some(component_type)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a component holds its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureType {
    /// Inline leaf with no children
    None,
    /// Block whose children are inline spans, addressed by character offset
    Content,
    /// Block whose children are other blocks, addressed by child index
    Structure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Ordered, numbered markers
    Ol,
    /// Unordered, bullet markers
    #[default]
    Ul,
    /// No markers at all
    Nl,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Ol => "ol",
            ListType::Ul => "ul",
            ListType::Nl => "nl",
        }
    }

    /// Element tag used when rendering; marker-less lists render as `ul`
    pub fn tag(&self) -> &'static str {
        match self {
            ListType::Ol => "ol",
            ListType::Ul | ListType::Nl => "ul",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ol" => Some(ListType::Ol),
            "ul" => Some(ListType::Ul),
            "nl" => Some(ListType::Nl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingType {
    #[default]
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingType::H1 => "h1",
            HeadingType::H2 => "h2",
            HeadingType::H3 => "h3",
            HeadingType::H4 => "h4",
            HeadingType::H5 => "h5",
            HeadingType::H6 => "h6",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Th,
    #[default]
    Td,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Th => "th",
            CellType::Td => "td",
        }
    }
}

/// Kind-specific state of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Article,
    Paragraph,
    Heading(HeadingType),
    List(ListType),
    Table,
    TableRow,
    TableCell(CellType),
    Character(Text),
}

impl NodeKind {
    pub fn component_type(&self) -> ComponentType {
        match self {
            NodeKind::Article => ComponentType::Article,
            NodeKind::Paragraph => ComponentType::Paragraph,
            NodeKind::Heading(_) => ComponentType::Heading,
            NodeKind::List(_) => ComponentType::List,
            NodeKind::Table => ComponentType::Table,
            NodeKind::TableRow => ComponentType::TableRow,
            NodeKind::TableCell(_) => ComponentType::TableCell,
            NodeKind::Character(_) => ComponentType::Character,
        }
    }

    pub fn structure_type(&self) -> StructureType {
        match self {
            NodeKind::Character(_) => StructureType::None,
            NodeKind::Paragraph | NodeKind::Heading(_) | NodeKind::TableCell(_) => {
                StructureType::Content
            }
            NodeKind::Article | NodeKind::List(_) | NodeKind::Table | NodeKind::TableRow => {
                StructureType::Structure
            }
        }
    }

    /// Blocks are what documents and lists are made of
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph | NodeKind::Heading(_) | NodeKind::List(_) | NodeKind::Table
        )
    }

    /// Accepted-child policy of this kind
    pub fn accepts(&self, child: &NodeKind) -> bool {
        match self {
            NodeKind::Article | NodeKind::List(_) => child.is_block(),
            NodeKind::Table => matches!(child, NodeKind::TableRow),
            NodeKind::TableRow => matches!(child, NodeKind::TableCell(_)),
            NodeKind::Paragraph | NodeKind::Heading(_) | NodeKind::TableCell(_) => {
                matches!(child, NodeKind::Character(_))
            }
            NodeKind::Character(_) => false,
        }
    }
}

/// A component stored in the document arena.
///
/// Nodes are only mutated through [`Document`](crate::editing::Document) so
/// that every change is recorded and every parent link stays consistent.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) decoration: Decoration,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, decoration: Decoration) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            parent: None,
            children: Vec::new(),
            decoration,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    pub fn structure_type(&self) -> StructureType {
        self.kind.structure_type()
    }

    /// Type tag including the subtype, e.g. `list>ol` or `heading>h2`
    pub fn type_tag(&self) -> String {
        match &self.kind {
            NodeKind::List(list_type) => format!("list>{}", list_type.as_str()),
            NodeKind::Heading(heading) => format!("heading>{}", heading.as_str()),
            NodeKind::TableCell(cell) => format!("tableCell>{}", cell.as_str()),
            kind => kind.component_type().as_str().to_string(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn list_type(&self) -> Option<ListType> {
        match self.kind {
            NodeKind::List(list_type) => Some(list_type),
            _ => None,
        }
    }

    /// Text of an inline span, `None` for every other kind
    pub fn content(&self) -> Option<String> {
        match &self.kind {
            NodeKind::Character(text) => Some(text.to_string()),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::List(_))
    }

    pub fn is_text_block(&self) -> bool {
        self.structure_type() == StructureType::Content
    }
}
