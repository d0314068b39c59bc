#![forbid(unsafe_code)]

//! Pure state transition function over the tree plus hover/selection paths.
//!
//! [`reduce`] never mutates its input. Each action runs against a working
//! copy (cheap: the node map is persistent); the copy is returned on
//! success, otherwise the original state is returned together with the
//! reason. Actions that can relink nodes re-validate the copy first. Rejections are also reported as `warn`-level tracing
//! events; nothing here panics or returns `Err` to the caller.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::EditorAction;
use crate::node::{Node, NodeId, NodeType, Props};
use crate::path::PathState;
use crate::schema::is_legal_child;
use crate::tree::{EditorTree, TreeInvariantError};

/// Tree plus hover and selection paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub tree: EditorTree,
    pub hovered: PathState,
    pub selected: PathState,
}

impl EditorState {
    #[must_use]
    pub fn new(tree: EditorTree) -> Self {
        Self {
            tree,
            hovered: PathState::default(),
            selected: PathState::default(),
        }
    }
}

/// Why an action was refused. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRejection {
    IllegalParentChild {
        parent_id: Option<NodeId>,
        parent_type: Option<NodeType>,
        child_id: NodeId,
        child_type: NodeType,
    },
    MissingNode {
        node_id: NodeId,
    },
    MissingParent {
        parent_id: NodeId,
    },
    DuplicateNodeId {
        node_id: NodeId,
    },
    RootAlreadySet {
        root_id: NodeId,
    },
    CannotMoveRoot {
        node_id: NodeId,
    },
    NodeHasChildren {
        node_id: NodeId,
    },
    Invariant(TreeInvariantError),
}

impl fmt::Display for ActionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalParentChild {
                parent_id,
                parent_type,
                child_id,
                child_type,
            } => match (parent_id, parent_type) {
                (Some(parent_id), Some(parent_type)) => write!(
                    f,
                    "{child_type} {child_id} is not allowed inside {parent_type} {parent_id}"
                ),
                _ => write!(f, "{child_type} {child_id} is not allowed at the root"),
            },
            Self::MissingNode { node_id } => write!(f, "node {node_id} not found"),
            Self::MissingParent { parent_id } => write!(f, "parent {parent_id} not found"),
            Self::DuplicateNodeId { node_id } => write!(f, "node id {node_id} already in use"),
            Self::RootAlreadySet { root_id } => {
                write!(f, "document already has root {root_id}")
            }
            Self::CannotMoveRoot { node_id } => write!(f, "root {node_id} cannot be moved"),
            Self::NodeHasChildren { node_id } => {
                write!(f, "inserted node {node_id} must not carry children")
            }
            Self::Invariant(err) => write!(f, "transition would break tree: {err}"),
        }
    }
}

impl std::error::Error for ActionRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invariant(err) => Some(err),
            _ => None,
        }
    }
}

/// Why an accepted action changed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoopReason {
    MissingNode { node_id: NodeId },
    EmptyBatch,
}

/// What one transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceEffect {
    Applied,
    Unchanged(NoopReason),
    Rejected(ActionRejection),
}

impl ReduceEffect {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&ActionRejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Result of one [`reduce`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub state: EditorState,
    pub effect: ReduceEffect,
}

enum Step {
    Changed,
    Noop(NoopReason),
}

/// `(state, action) -> new state`.
#[must_use]
pub fn reduce(state: &EditorState, action: EditorAction) -> Reduction {
    let kind = action.kind();
    let structural = action.touches_structure();
    let mut working = state.clone();
    let step = working.apply(action).and_then(|step| {
        if !structural {
            return Ok(step);
        }
        match working.tree.validate() {
            Ok(()) => Ok(step),
            Err(err) => Err(ActionRejection::Invariant(err)),
        }
    });

    match step {
        Ok(Step::Changed) => Reduction {
            state: working,
            effect: ReduceEffect::Applied,
        },
        Ok(Step::Noop(reason)) => {
            debug!(action = kind.as_str(), ?reason, "action changed nothing");
            Reduction {
                state: state.clone(),
                effect: ReduceEffect::Unchanged(reason),
            }
        }
        Err(rejection) => {
            warn!(action = kind.as_str(), reason = %rejection, "action rejected");
            Reduction {
                state: state.clone(),
                effect: ReduceEffect::Rejected(rejection),
            }
        }
    }
}

impl EditorState {
    fn apply(&mut self, action: EditorAction) -> Result<Step, ActionRejection> {
        match action {
            EditorAction::InsertNode {
                parent_id,
                node,
                index,
            } => self.insert_node(parent_id, node, index),
            EditorAction::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => self.move_node(&node_id, new_parent_id, index),
            EditorAction::UpdateNodeProps { node_id, props } => {
                Ok(self.update_node_props(&node_id, props))
            }
            EditorAction::DeleteNode { node_id } => Ok(self.delete_node(&node_id)),
            EditorAction::HoverSection { id } => Ok(self.hover(NodeType::Section, id)),
            EditorAction::HoverRow { id } => Ok(self.hover(NodeType::Row, id)),
            EditorAction::HoverColumn { id } => Ok(self.hover(NodeType::Column, id)),
            EditorAction::HoverElement { id } => Ok(self.hover(NodeType::Element, id)),
            EditorAction::ClearHover => {
                self.hovered.clear();
                Ok(Step::Changed)
            }
            EditorAction::SelectNode { id } => Ok(self.select_node(id)),
            EditorAction::Batch { actions } => {
                let mut changed = false;
                for action in actions {
                    if let Step::Changed = self.apply(action)? {
                        changed = true;
                    }
                }
                Ok(if changed {
                    Step::Changed
                } else {
                    Step::Noop(NoopReason::EmptyBatch)
                })
            }
        }
    }

    fn insert_node(
        &mut self,
        parent_id: Option<NodeId>,
        mut node: Node,
        index: Option<usize>,
    ) -> Result<Step, ActionRejection> {
        if self.tree.contains(&node.id) {
            return Err(ActionRejection::DuplicateNodeId { node_id: node.id });
        }
        if !node.children_ids.is_empty() {
            return Err(ActionRejection::NodeHasChildren { node_id: node.id });
        }

        match &parent_id {
            None => {
                if let Some(root_id) = self.tree.root_id() {
                    return Err(ActionRejection::RootAlreadySet {
                        root_id: root_id.clone(),
                    });
                }
                check_legal(None, None, &node)?;
                node.parent_id = None;
                self.tree.set_root(Some(node.id.clone()));
                self.tree.insert_raw(node);
            }
            Some(parent_id) => {
                let parent = self
                    .tree
                    .node_mut(parent_id)
                    .ok_or_else(|| ActionRejection::MissingParent {
                        parent_id: parent_id.clone(),
                    })?;
                check_legal(Some(parent_id), Some(parent.node_type), &node)?;
                splice(&mut parent.children_ids, node.id.clone(), index);
                node.parent_id = Some(parent_id.clone());
                self.tree.insert_raw(node);
            }
        }
        Ok(Step::Changed)
    }

    fn move_node(
        &mut self,
        node_id: &NodeId,
        new_parent_id: NodeId,
        index: Option<usize>,
    ) -> Result<Step, ActionRejection> {
        let node = self
            .tree
            .node(node_id)
            .ok_or_else(|| ActionRejection::MissingNode {
                node_id: node_id.clone(),
            })?;
        let Some(old_parent_id) = node.parent_id.clone() else {
            return Err(ActionRejection::CannotMoveRoot {
                node_id: node_id.clone(),
            });
        };
        let new_parent =
            self.tree
                .node(&new_parent_id)
                .ok_or_else(|| ActionRejection::MissingParent {
                    parent_id: new_parent_id.clone(),
                })?;
        check_legal(Some(&new_parent_id), Some(new_parent.node_type), node)?;

        if let Some(old_parent) = self.tree.node_mut(&old_parent_id) {
            old_parent.children_ids.retain(|child| child != node_id);
        }
        if let Some(new_parent) = self.tree.node_mut(&new_parent_id) {
            splice(&mut new_parent.children_ids, node_id.clone(), index);
        }
        if let Some(node) = self.tree.node_mut(node_id) {
            node.parent_id = Some(new_parent_id);
        }
        Ok(Step::Changed)
    }

    fn update_node_props(&mut self, node_id: &NodeId, props: Props) -> Step {
        match self.tree.node_mut(node_id) {
            Some(node) => {
                node.props.extend(props);
                Step::Changed
            }
            None => Step::Noop(NoopReason::MissingNode {
                node_id: node_id.clone(),
            }),
        }
    }

    fn delete_node(&mut self, node_id: &NodeId) -> Step {
        let Some(node) = self.tree.node(node_id) else {
            return Step::Noop(NoopReason::MissingNode {
                node_id: node_id.clone(),
            });
        };

        match node.parent_id.clone() {
            Some(parent_id) => {
                if let Some(parent) = self.tree.node_mut(&parent_id) {
                    parent.children_ids.retain(|child| child != node_id);
                }
            }
            None => self.tree.set_root(None),
        }

        // Collect first, then remove: the traversal needs the intact subtree.
        let removed: BTreeSet<NodeId> = self.tree.subtree(node_id).into_iter().collect();
        for id in &removed {
            let _ = self.tree.remove_raw(id);
        }
        self.hovered.forget(&removed);
        self.selected.forget(&removed);
        Step::Changed
    }

    fn hover(&mut self, node_type: NodeType, id: Option<NodeId>) -> Step {
        self.hovered.hover(node_type, id);
        Step::Changed
    }

    fn select_node(&mut self, id: Option<NodeId>) -> Step {
        let Some(id) = id else {
            self.selected.clear();
            return Step::Changed;
        };
        match self.tree.node(&id).map(|node| node.node_type) {
            Some(node_type) => {
                self.selected.select(node_type, id);
                Step::Changed
            }
            None => Step::Noop(NoopReason::MissingNode { node_id: id }),
        }
    }
}

fn check_legal(
    parent_id: Option<&NodeId>,
    parent_type: Option<NodeType>,
    child: &Node,
) -> Result<(), ActionRejection> {
    if is_legal_child(parent_type, child.node_type) {
        Ok(())
    } else {
        Err(ActionRejection::IllegalParentChild {
            parent_id: parent_id.cloned(),
            parent_type,
            child_id: child.id.clone(),
            child_type: child.node_type,
        })
    }
}

fn splice(children: &mut Vec<NodeId>, id: NodeId, index: Option<usize>) {
    let at = index.map_or(children.len(), |index| index.min(children.len()));
    children.insert(at, id);
}
