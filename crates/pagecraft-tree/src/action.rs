#![forbid(unsafe_code)]

//! Tagged actions accepted by the reducer.

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeId, Props};

/// Every supported state transition.
///
/// This is the only way to mutate an editor's tree, hover, or selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorAction {
    /// Splice `node` under `parent_id` at `index` (default: append).
    /// `parent_id = None` inserts the document root.
    InsertNode {
        parent_id: Option<NodeId>,
        node: Node,
        index: Option<usize>,
    },
    /// Reparent an existing node (and its subtree).
    MoveNode {
        node_id: NodeId,
        new_parent_id: NodeId,
        index: Option<usize>,
    },
    /// Shallow-merge `props` into the node's existing props.
    UpdateNodeProps { node_id: NodeId, props: Props },
    /// Remove the node and its whole subtree.
    DeleteNode { node_id: NodeId },
    HoverSection { id: Option<NodeId> },
    HoverRow { id: Option<NodeId> },
    HoverColumn { id: Option<NodeId> },
    HoverElement { id: Option<NodeId> },
    /// Pointer left the whole canvas.
    ClearHover,
    SelectNode { id: Option<NodeId> },
    /// Apply several actions as one all-or-nothing transition.
    Batch { actions: Vec<EditorAction> },
}

impl EditorAction {
    /// Stable discriminator for logs.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::InsertNode { .. } => ActionKind::InsertNode,
            Self::MoveNode { .. } => ActionKind::MoveNode,
            Self::UpdateNodeProps { .. } => ActionKind::UpdateNodeProps,
            Self::DeleteNode { .. } => ActionKind::DeleteNode,
            Self::HoverSection { .. } => ActionKind::HoverSection,
            Self::HoverRow { .. } => ActionKind::HoverRow,
            Self::HoverColumn { .. } => ActionKind::HoverColumn,
            Self::HoverElement { .. } => ActionKind::HoverElement,
            Self::ClearHover => ActionKind::ClearHover,
            Self::SelectNode { .. } => ActionKind::SelectNode,
            Self::Batch { .. } => ActionKind::Batch,
        }
    }

    /// Whether applying this can change parent/child links.
    ///
    /// Hover, selection, and prop updates leave the structure alone, so the
    /// reducer skips tree validation for them.
    #[must_use]
    pub fn touches_structure(&self) -> bool {
        match self {
            Self::InsertNode { .. } | Self::MoveNode { .. } | Self::DeleteNode { .. } => true,
            Self::Batch { actions } => actions.iter().any(Self::touches_structure),
            Self::UpdateNodeProps { .. }
            | Self::HoverSection { .. }
            | Self::HoverRow { .. }
            | Self::HoverColumn { .. }
            | Self::HoverElement { .. }
            | Self::ClearHover
            | Self::SelectNode { .. } => false,
        }
    }

    /// Append `node` to `parent_id`.
    #[must_use]
    pub fn insert(parent_id: Option<NodeId>, node: Node) -> Self {
        Self::InsertNode {
            parent_id,
            node,
            index: None,
        }
    }

    #[must_use]
    pub fn update(node_id: NodeId, props: Props) -> Self {
        Self::UpdateNodeProps { node_id, props }
    }

    #[must_use]
    pub fn delete(node_id: NodeId) -> Self {
        Self::DeleteNode { node_id }
    }

    #[must_use]
    pub fn select(id: Option<NodeId>) -> Self {
        Self::SelectNode { id }
    }
}

/// Action discriminator used in logs and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    InsertNode,
    MoveNode,
    UpdateNodeProps,
    DeleteNode,
    HoverSection,
    HoverRow,
    HoverColumn,
    HoverElement,
    ClearHover,
    SelectNode,
    Batch,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsertNode => "INSERT_NODE",
            Self::MoveNode => "MOVE_NODE",
            Self::UpdateNodeProps => "UPDATE_NODE_PROPS",
            Self::DeleteNode => "DELETE_NODE",
            Self::HoverSection => "HOVER_SECTION",
            Self::HoverRow => "HOVER_ROW",
            Self::HoverColumn => "HOVER_COLUMN",
            Self::HoverElement => "HOVER_ELEMENT",
            Self::ClearHover => "CLEAR_HOVER",
            Self::SelectNode => "SELECT_NODE",
            Self::Batch => "BATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actions_serialize_as_tagged_unions() {
        let action = EditorAction::DeleteNode {
            node_id: "r1".into(),
        };
        assert_eq!(
            serde_json::to_value(&action).expect("serializes"),
            json!({ "type": "DELETE_NODE", "node_id": "r1" })
        );
        let clear: EditorAction =
            serde_json::from_value(json!({ "type": "CLEAR_HOVER" })).expect("deserializes");
        assert_eq!(clear.kind(), ActionKind::ClearHover);
    }

    #[test]
    fn structural_actions_are_flagged() {
        assert!(EditorAction::delete("r1".into()).touches_structure());
        assert!(!EditorAction::ClearHover.touches_structure());
        assert!(!EditorAction::update("c1".into(), Props::new()).touches_structure());

        let resize = EditorAction::Batch {
            actions: vec![EditorAction::update("c1".into(), Props::new())],
        };
        assert!(!resize.touches_structure());
        let mixed = EditorAction::Batch {
            actions: vec![resize, EditorAction::delete("c2".into())],
        };
        assert!(mixed.touches_structure());
    }
}
