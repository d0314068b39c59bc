#![forbid(unsafe_code)]

//! Hover and selection outlines plus column resize handles.
//!
//! [`compute_overlay`] is a pure function of the editor state, the live
//! registry, and the config. It is re-run on every hover or selection
//! change and on every drag tick; between those it is not refreshed, so a
//! frame may lag one layout pass behind external content changes.
//!
//! Anything the registry cannot measure is skipped for the frame rather
//! than reported.

use pagecraft_core::geometry::{Point, Rect};
use pagecraft_tree::{
    EditorState, EditorTree, HoverLayer, NodeId, NodeType, PathState, hover_owner,
    resolve_hover_layer, selected_target,
};
use serde::{Deserialize, Serialize};

use crate::config::{EditorConfig, OutlineStyle};
use crate::registry::ViewRegistry;

/// Which outline a frame entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineKind {
    Hover,
    Selection,
}

/// An outline positioned over a measured node. Collapsed (zero-area)
/// surfaces get none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub kind: OutlineKind,
    pub node_id: NodeId,
    pub node_type: NodeType,
    pub rect: Rect,
    pub style: OutlineStyle,
}

/// The two adjacent columns a handle sits between.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPair {
    pub row_id: NodeId,
    pub left_id: NodeId,
    pub right_id: NodeId,
}

/// Hit region at the shared boundary of two adjacent columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeHandle {
    pub pair: ColumnPair,
    /// Position of the left column among the row's children.
    pub index: usize,
    pub rect: Rect,
}

/// Everything the host draws above the canvas for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub layer: Option<HoverLayer>,
    pub hover: Option<Outline>,
    pub selection: Option<Outline>,
    pub active_row: Option<NodeId>,
    pub handles: Vec<ResizeHandle>,
}

impl OverlayFrame {
    /// Handle whose hit region contains `point`.
    ///
    /// Regions of adjacent handles never overlap for sane handle widths;
    /// if they do, the leftmost wins.
    #[must_use]
    pub fn handle_at(&self, point: Point) -> Option<&ResizeHandle> {
        self.handles.iter().find(|handle| handle.rect.contains(point))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hover.is_none() && self.selection.is_none() && self.handles.is_empty()
    }
}

/// Compute the overlay for the current state.
///
/// `drag_row` pins the handles to the row being dragged so they stay up
/// while the pointer wanders off it.
#[must_use]
pub fn compute_overlay(
    state: &EditorState,
    registry: &ViewRegistry,
    config: &EditorConfig,
    drag_row: Option<&NodeId>,
) -> OverlayFrame {
    let layer = resolve_hover_layer(&state.hovered, &state.selected);

    let hover = layer.and_then(|layer| {
        let id = hover_owner(layer, &state.hovered)?;
        outline(
            OutlineKind::Hover,
            id,
            layer.node_type(),
            registry,
            &config.hover_outline,
        )
    });

    let selection = selected_target(&state.selected).and_then(|(node_type, id)| {
        outline(
            OutlineKind::Selection,
            id,
            node_type,
            registry,
            &config.selection_outline,
        )
    });

    let active_row = match drag_row {
        Some(row) => Some(row.clone()),
        None if layer == Some(HoverLayer::Element) => None,
        None => active_row(&state.tree, &state.hovered, &state.selected, config),
    };

    let handles = active_row
        .as_ref()
        .map(|row| row_handles(&state.tree, row, registry, config.handle_width_px))
        .unwrap_or_default();

    OverlayFrame {
        layer,
        hover,
        selection,
        active_row,
        handles,
    }
}

/// The row whose column boundaries get handles.
///
/// A hovered row wins. Otherwise, when enabled, the selected row or the
/// row owning the selected column.
#[must_use]
pub fn active_row(
    tree: &EditorTree,
    hovered: &PathState,
    selected: &PathState,
    config: &EditorConfig,
) -> Option<NodeId> {
    if let Some(row) = &hovered.row_id {
        return tree.contains(row).then(|| row.clone());
    }
    if !config.show_handles_on_selection {
        return None;
    }
    if let Some(row) = selected.row_id.as_ref().filter(|row| tree.contains(row)) {
        return Some(row.clone());
    }
    let column = selected.column_id.as_ref()?;
    tree.parent(column)
        .filter(|parent| parent.node_type == NodeType::Row)
        .map(|parent| parent.id.clone())
}

/// Handles for every consecutive column pair of `row_id`.
///
/// A pair with either column unmeasurable gets no handle this frame.
#[must_use]
pub fn row_handles(
    tree: &EditorTree,
    row_id: &NodeId,
    registry: &ViewRegistry,
    handle_width_px: f64,
) -> Vec<ResizeHandle> {
    let columns = tree.children(row_id);
    columns
        .windows(2)
        .enumerate()
        .filter_map(|(index, pair)| {
            let [left_id, right_id] = pair else {
                return None;
            };
            let left = registry.rect(left_id)?;
            let right = registry.rect(right_id)?;
            Some(ResizeHandle {
                pair: ColumnPair {
                    row_id: row_id.clone(),
                    left_id: left_id.clone(),
                    right_id: right_id.clone(),
                },
                index,
                rect: boundary_rect(&left, &right, handle_width_px),
            })
        })
        .collect()
}

/// Hit region centred on the gap between `left` and `right`, spanning the
/// vertical extent of both.
#[must_use]
pub fn boundary_rect(left: &Rect, right: &Rect, width: f64) -> Rect {
    let boundary = (left.right() + right.left()) / 2.0;
    let span = left.union(right);
    Rect::new(boundary - width / 2.0, span.top(), width, span.height)
}

fn outline(
    kind: OutlineKind,
    id: &NodeId,
    node_type: NodeType,
    registry: &ViewRegistry,
    style: &OutlineStyle,
) -> Option<Outline> {
    let rect = registry.rect(id).filter(|rect| !rect.is_empty())?;
    Some(Outline {
        kind,
        node_id: id.clone(),
        node_type,
        rect,
        style: style.clone(),
    })
}
