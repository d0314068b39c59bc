#![forbid(unsafe_code)]

//! Document tree engine for the Pagecraft layout editor.
//!
//! # Role in Pagecraft
//! `pagecraft-tree` owns the abstract document: a strictly hierarchical
//! Section → Row → Column → Element tree stored as a normalized id → node
//! map, plus the hover and selection paths. It knows nothing about pixels;
//! geometry lives in `pagecraft-editor`.
//!
//! # Primary responsibilities
//! - **Schema**: node factories with type-default props and the single
//!   parent/child legality rule ([`validate_parent_child`]).
//! - **Reducer**: [`reduce`] is a pure `(state, action) -> state` function
//!   that rejects illegal transitions by returning the state unchanged.
//! - **Resolver**: [`resolve_hover_layer`] picks the one layer that owns the
//!   outline when nested regions overlap.

pub mod action;
pub mod node;
pub mod path;
pub mod reducer;
pub mod resolver;
pub mod schema;
pub mod tree;

pub use action::{ActionKind, EditorAction};
pub use node::{
    ColumnProps, ElementProps, ElementType, Node, NodeId, NodeIdGenerator, NodeType, Props,
    RowProps, SectionProps,
};
pub use path::PathState;
pub use reducer::{ActionRejection, EditorState, NoopReason, ReduceEffect, Reduction, reduce};
pub use resolver::{HoverLayer, hover_owner, resolve_hover_layer, selected_target};
pub use schema::{
    create_node, create_node_with_id, is_legal_child, type_defaults, validate_parent_child,
};
pub use tree::{EditorTree, SnapshotError, TreeInvariantError, TreeSnapshot};
