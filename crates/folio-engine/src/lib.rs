pub mod components;
pub mod editing;
pub mod error;
pub mod render;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use components::{
    CellType, ComponentType, DecorateOp, Decoration, HeadingType, ListType, Node, NodeId,
    RawNode, Statistic, StructureType,
};
pub use editing::{Cursor, Document, DocumentEvent, DocumentOptions, Focus, Snapshot};
pub use error::{EditError, Result};
pub use render::{ContentBuilder, HtmlBuilder, format_outline};
