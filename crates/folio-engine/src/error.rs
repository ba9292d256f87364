use crate::components::{ComponentType, NodeId};

/// Errors surfaced synchronously by structural and lookup operations.
///
/// Every operation that returns one of these has left the document exactly as
/// it found it: validation happens before mutation, and a failure inside a
/// transaction rolls the touched nodes back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("{child} cannot be placed inside {parent}")]
    StructuralViolation {
        parent: ComponentType,
        child: ComponentType,
    },
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("Node {0} is still attached to a parent")]
    AlreadyAttached(NodeId),
    #[error("Attaching {0} would make it its own ancestor")]
    Cycle(NodeId),
    #[error("Node {0} has no parent")]
    Orphan(NodeId),
    #[error("Index {index} out of bounds for {id} (size {size})")]
    OutOfBounds { id: NodeId, index: usize, size: usize },
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Unknown component type: {0}")]
    UnknownType(String),
    #[error("Node {id} is not a {expected}")]
    WrongKind { id: NodeId, expected: &'static str },
}

pub type Result<T> = std::result::Result<T, EditError>;
