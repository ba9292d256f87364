/*!
 * # Component Tree
 *
 * The document is a tree of typed components stored in an arena owned by
 * [`Document`](crate::editing::Document). Each [`Node`] holds:
 *
 * - a stable [`NodeId`] (UUID v4) that survives every edit,
 * - a closed [`NodeKind`] carrying the kind-specific state (list type,
 *   heading level, text span),
 * - ordered `children` (strong, owning) and a `parent` handle (weak,
 *   traversal only),
 * - a [`Decoration`] with `style` and `data` maps.
 *
 * Structural policy lives with the kinds: which children a collection accepts
 * ([`NodeKind::accepts`]), how a list decorates its items, how text blocks
 * address their content by character offset.
 *
 * ## Module Structure
 *
 * - **`node`**: ids, kind tags, the `Node` record
 * - **`decorate`**: style/data maps and their merge operations
 * - **`text`**: rope-backed text spans with character addressing
 * - **`collection`**: add/remove/find primitives shared by every collection
 * - **`list`**: list-specific policy (auto split, auto removal, exchange)
 * - **`content`**: text-block editing (insert, remove, split point lookup)
 * - **`factory`**: node construction from raw trees and builders
 * - **`raw`**: the JSON-like interchange shape
 */

pub mod collection;
pub mod content;
pub mod decorate;
pub mod factory;
pub mod list;
pub mod node;
pub mod raw;
pub mod text;

pub use collection::Statistic;
pub use decorate::{DecorateOp, Decoration};
pub use node::{CellType, ComponentType, HeadingType, ListType, Node, NodeId, NodeKind, StructureType};
pub use raw::RawNode;
pub use text::Text;
