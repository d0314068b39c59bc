#![forbid(unsafe_code)]

//! Structural render dispatch.
//!
//! Walks the document from the root and produces one [`StructuralBlock`]
//! per node. Sections, rows, and columns are laid out here; element content
//! is delegated to a host [`ContentRenderer`], which receives only the id
//! and a read-only tree.
//!
//! The renderer also owns the mount bookkeeping: ids that disappear from
//! the tree between passes are unregistered from the [`ViewRegistry`] so
//! no overlay ever measures a stale surface.

use std::collections::BTreeSet;

use pagecraft_tree::{EditorAction, EditorState, EditorTree, NodeId, NodeType};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::registry::ViewRegistry;

/// Host hook that renders element content.
pub trait ContentRenderer {
    type Output;

    fn render_element(&mut self, id: &NodeId, tree: &EditorTree) -> Self::Output;
}

impl<V, F> ContentRenderer for F
where
    F: FnMut(&NodeId, &EditorTree) -> V,
{
    type Output = V;

    fn render_element(&mut self, id: &NodeId, tree: &EditorTree) -> V {
        self(id, tree)
    }
}

/// One rendered node.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralBlock<V> {
    pub id: NodeId,
    pub node_type: NodeType,
    /// Column share of its row's width, in `0..=1`.
    pub flex_share: Option<f64>,
    pub children: Vec<StructuralBlock<V>>,
    /// Element content from the [`ContentRenderer`].
    pub content: Option<V>,
}

impl<V> StructuralBlock<V> {
    /// Blocks in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &StructuralBlock<V>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let block = stack.pop()?;
            stack.extend(block.children.iter().rev());
            Some(block)
        })
    }

    #[must_use]
    pub fn find(&self, id: &NodeId) -> Option<&StructuralBlock<V>> {
        self.iter().find(|block| &block.id == id)
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass<V> {
    pub root: Option<StructuralBlock<V>>,
    /// Ids rendered this pass that were not rendered last pass. The host
    /// registers a view handle for each once it is on screen.
    pub mounted: Vec<NodeId>,
    /// Ids that left the tree; already unregistered.
    pub unmounted: Vec<NodeId>,
}

/// Per-editor traversal and mount tracker.
#[derive(Debug, Clone, Default)]
pub struct StructuralRenderer {
    mounted: BTreeSet<NodeId>,
}

impl StructuralRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids rendered by the last pass.
    #[must_use]
    pub const fn mounted(&self) -> &BTreeSet<NodeId> {
        &self.mounted
    }

    /// Render `tree` and reconcile mounts with `registry`.
    pub fn render<C: ContentRenderer>(
        &mut self,
        tree: &EditorTree,
        content: &mut C,
        registry: &mut ViewRegistry,
    ) -> RenderPass<C::Output> {
        let root = tree
            .root_id()
            .and_then(|root| render_block(tree, root, None, content));

        let current: BTreeSet<NodeId> = tree.depth_first().into_iter().collect();
        let mounted: Vec<NodeId> = current.difference(&self.mounted).cloned().collect();
        let unmounted: Vec<NodeId> = self.mounted.difference(&current).cloned().collect();
        for id in &unmounted {
            registry.unregister(id);
        }
        trace!(
            mounted = mounted.len(),
            unmounted = unmounted.len(),
            "structural render pass"
        );
        self.mounted = current;

        RenderPass {
            root,
            mounted,
            unmounted,
        }
    }

    /// Unmount everything.
    pub fn teardown(&mut self, registry: &mut ViewRegistry) {
        for id in std::mem::take(&mut self.mounted) {
            registry.unregister(&id);
        }
    }
}

fn render_block<C: ContentRenderer>(
    tree: &EditorTree,
    id: &NodeId,
    flex_share: Option<f64>,
    content: &mut C,
) -> Option<StructuralBlock<C::Output>> {
    let node = tree.node(id)?;
    let shares = match node.node_type {
        NodeType::Row => column_shares(tree, id),
        _ => Vec::new(),
    };
    let children = node
        .children_ids
        .iter()
        .enumerate()
        .filter_map(|(index, child)| {
            render_block(tree, child, shares.get(index).copied(), content)
        })
        .collect();
    let rendered = match node.node_type {
        NodeType::Element => Some(content.render_element(id, tree)),
        _ => None,
    };
    Some(StructuralBlock {
        id: id.clone(),
        node_type: node.node_type,
        flex_share,
        children,
        content: rendered,
    })
}

/// Each column's share of `row_id`'s width, from the `widthFraction`
/// weights.
#[must_use]
pub fn column_shares(tree: &EditorTree, row_id: &NodeId) -> Vec<f64> {
    let weights: Vec<f64> = tree
        .children(row_id)
        .iter()
        .filter_map(|id| tree.node(id))
        .map(|column| column.width_fraction())
        .collect();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|weight| weight / total).collect()
    } else {
        weights
    }
}

/// Pointer events reported by a structural surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StructuralEvent {
    PointerEnter { id: NodeId },
    PointerLeave { id: NodeId },
    /// Click on the innermost surface under the pointer.
    Click { id: NodeId },
    /// Pointer left the whole canvas.
    CanvasLeave,
    /// Click on the canvas outside every node.
    CanvasClick,
}

/// Translate a pointer event into a reducer action.
///
/// Enter and leave only touch their own layer's hover slot, so leaving a
/// child never clears an ancestor's hover. A leave whose id no longer owns
/// its slot is stale (a sibling's enter arrived first) and produces
/// nothing, as do events for ids not in the tree.
#[must_use]
pub fn route_event(state: &EditorState, event: &StructuralEvent) -> Option<EditorAction> {
    let tree = &state.tree;
    match event {
        StructuralEvent::PointerEnter { id } => {
            let node = tree.node(id)?;
            Some(hover_action(node.node_type, Some(id.clone())))
        }
        StructuralEvent::PointerLeave { id } => {
            let node = tree.node(id)?;
            if state.hovered.slot(node.node_type) != Some(id) {
                trace!(id = %id, "stale pointer leave dropped");
                return None;
            }
            Some(hover_action(node.node_type, None))
        }
        StructuralEvent::Click { id } => tree
            .contains(id)
            .then(|| EditorAction::select(Some(id.clone()))),
        StructuralEvent::CanvasLeave => Some(EditorAction::ClearHover),
        StructuralEvent::CanvasClick => Some(EditorAction::select(None)),
    }
}

fn hover_action(node_type: NodeType, id: Option<NodeId>) -> EditorAction {
    match node_type {
        NodeType::Section => EditorAction::HoverSection { id },
        NodeType::Row => EditorAction::HoverRow { id },
        NodeType::Column => EditorAction::HoverColumn { id },
        NodeType::Element => EditorAction::HoverElement { id },
    }
}
