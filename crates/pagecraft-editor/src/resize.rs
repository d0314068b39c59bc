#![forbid(unsafe_code)]

//! Column resize drag controller.
//!
//! Dragging the handle between two adjacent columns moves width from one
//! to the other. The pair's combined `widthFraction` never changes and
//! neither column drops below its floor:
//!
//! ```text
//! delta     = (x - start_x) / combined_px * combined_fraction
//! left'     = left + delta
//! right'    = right - delta
//! floor     = combined_fraction * min_fraction_ratio
//! ```
//!
//! A proposal below a floor is clamped to the floor and the other column
//! takes the remainder.
//!
//! The controller only emits data: capture commands for the host and one
//! [`EditorAction::Batch`] of two prop updates per move. It never touches
//! platform input, so the math runs in plain unit tests.

use pagecraft_core::pointer::{CaptureCommand, PointerButton, PointerId, PointerPosition};
use pagecraft_tree::{ColumnProps, EditorAction, EditorTree, NodeType};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{DEFAULT_MIN_FRACTION_RATIO, EditorConfig};
use crate::overlay::ColumnPair;
use crate::registry::ViewRegistry;

/// Input-adapter seam for hosts that deliver raw drag callbacks.
///
/// Platform glue translates native pointer events into these three calls
/// and applies the returned capture commands.
pub trait DragHandler {
    fn on_drag_start(
        &mut self,
        pointer_id: PointerId,
        button: PointerButton,
        position: PointerPosition,
    ) -> ResizeDispatch;

    fn on_drag_move(&mut self, pointer_id: PointerId, position: PointerPosition)
    -> ResizeDispatch;

    fn on_drag_end(&mut self, pointer_id: PointerId, position: PointerPosition) -> ResizeDispatch;
}

/// Width fractions of a column pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionPair {
    pub left: f64,
    pub right: f64,
}

impl FractionPair {
    #[must_use]
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    #[must_use]
    pub fn sum(self) -> f64 {
        self.left + self.right
    }
}

/// Minimum fractions each column of a pair may shrink to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionFloors {
    pub left: f64,
    pub right: f64,
}

/// Floors for a drag over `start`.
///
/// The base floor is `min_fraction_ratio` of the combined fraction. A
/// column's `minWidth` in pixels raises its own floor, unless the two
/// raised floors could not both fit, in which case both fall back to the
/// base floor.
///
/// A ratio outside `(0, 0.5)` (NaN included) is replaced by
/// [`DEFAULT_MIN_FRACTION_RATIO`], so floors stay positive and always fit.
#[must_use]
pub fn fraction_floors(
    start: FractionPair,
    combined_px: f64,
    min_fraction_ratio: f64,
    left_min_px: Option<f64>,
    right_min_px: Option<f64>,
) -> FractionFloors {
    let ratio = if min_fraction_ratio > 0.0 && min_fraction_ratio < 0.5 {
        min_fraction_ratio
    } else {
        DEFAULT_MIN_FRACTION_RATIO
    };
    let combined = start.sum();
    let base = combined * ratio;
    let px_floor = |min_px: Option<f64>| {
        min_px
            .filter(|px| px.is_finite() && *px > 0.0)
            .map_or(base, |px| base.max(px / combined_px * combined))
    };
    let left = px_floor(left_min_px);
    let right = px_floor(right_min_px);
    if left + right > combined {
        FractionFloors {
            left: base,
            right: base,
        }
    } else {
        FractionFloors { left, right }
    }
}

/// Redistribute a pair after the pointer moved `delta_px` from the start.
///
/// The result always sums to `start.sum()` within float tolerance.
#[must_use]
pub fn redistribute(
    start: FractionPair,
    delta_px: f64,
    combined_px: f64,
    floors: FractionFloors,
) -> FractionPair {
    let combined = start.sum();
    let delta = delta_px / combined_px * combined;
    let proposed = FractionPair::new(start.left + delta, start.right - delta);
    if !(proposed.left.is_finite() && proposed.right.is_finite()) {
        return start;
    }
    if proposed.left < floors.left {
        FractionPair::new(floors.left, combined - floors.left)
    } else if proposed.right < floors.right {
        FractionPair::new(combined - floors.right, floors.right)
    } else {
        proposed
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeState {
    Idle,
    Dragging,
}

/// Everything recorded when a drag starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub pair: ColumnPair,
    pub pointer_id: PointerId,
    pub button: PointerButton,
    pub start_x: f64,
    pub start: FractionPair,
    pub combined_px: f64,
    pub floors: FractionFloors,
    /// Fractions proposed by the latest move.
    pub current: FractionPair,
}

/// Lifecycle step a dispatch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Why a pointer event did not advance the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    /// The pointer was not over any handle.
    NoHandle,
    /// The pair is not two adjacent columns of one row.
    NotAdjacentColumns,
    /// A column of the pair is not mounted or not measurable.
    MissingGeometry,
    /// The pair has no measurable width to map pixels onto.
    ZeroWidth,
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    Started,
    WidthsProposed { left: f64, right: f64 },
    Ended,
    Canceled,
    Ignored { reason: DragIgnoredReason },
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragLogEntry {
    pub phase: DragPhase,
    pub pointer_id: Option<PointerId>,
    pub pair: Option<ColumnPair>,
    pub position: Option<PointerPosition>,
    pub outcome: DragOutcome,
}

/// Result of one controller call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDispatch {
    /// Width update for this step.
    ///
    /// The bare controller leaves dispatching to the caller. Through
    /// [`crate::Editor`]'s [`DragHandler`] impl it has already been
    /// reduced by the time the dispatch is returned, and is kept here only
    /// as a record.
    pub action: Option<EditorAction>,
    /// Pointer-capture command for the host.
    pub capture_command: Option<CaptureCommand>,
    pub log: DragLogEntry,
}

impl ResizeDispatch {
    pub(crate) fn ignored(
        phase: DragPhase,
        reason: DragIgnoredReason,
        pointer_id: Option<PointerId>,
        pair: Option<ColumnPair>,
        position: Option<PointerPosition>,
    ) -> Self {
        trace!(phase = ?phase, reason = ?reason, "resize event ignored");
        Self {
            action: None,
            capture_command: None,
            log: DragLogEntry {
                phase,
                pointer_id,
                pair,
                position,
                outcome: DragOutcome::Ignored { reason },
            },
        }
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, DragOutcome::Ignored { .. })
    }

    #[must_use]
    pub fn ignored_reason(&self) -> Option<DragIgnoredReason> {
        match self.log.outcome {
            DragOutcome::Ignored { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Idle/Dragging state machine for one editor.
#[derive(Debug, Clone)]
pub struct ColumnResizeController {
    min_fraction_ratio: f64,
    activation_button: PointerButton,
    session: Option<DragSession>,
}

impl ColumnResizeController {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            min_fraction_ratio: config.min_fraction_ratio,
            activation_button: config.activation_button,
            session: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ResizeState {
        if self.session.is_some() {
            ResizeState::Dragging
        } else {
            ResizeState::Idle
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<PointerId> {
        self.session.as_ref().map(|session| session.pointer_id)
    }

    /// Start dragging the handle between `pair`'s columns.
    ///
    /// Reads both columns' fractions from `tree` and their pixel widths from
    /// `registry`. On success the host must acquire pointer capture.
    pub fn pointer_down(
        &mut self,
        pair: &ColumnPair,
        pointer_id: PointerId,
        button: PointerButton,
        position: PointerPosition,
        tree: &EditorTree,
        registry: &ViewRegistry,
    ) -> ResizeDispatch {
        let ignored = |reason| {
            ResizeDispatch::ignored(
                DragPhase::Start,
                reason,
                Some(pointer_id),
                Some(pair.clone()),
                Some(position),
            )
        };
        if !pointer_id.is_valid() {
            return ignored(DragIgnoredReason::InvalidPointerId);
        }
        if button != self.activation_button {
            return ignored(DragIgnoredReason::ButtonNotAllowed);
        }
        if self.session.is_some() {
            return ignored(DragIgnoredReason::ActivePointerAlreadyInProgress);
        }
        if !is_adjacent_pair(tree, pair) {
            return ignored(DragIgnoredReason::NotAdjacentColumns);
        }
        let (Some(left_rect), Some(right_rect)) =
            (registry.rect(&pair.left_id), registry.rect(&pair.right_id))
        else {
            return ignored(DragIgnoredReason::MissingGeometry);
        };
        let combined_px = left_rect.width + right_rect.width;
        if !(combined_px.is_finite() && combined_px > 0.0) {
            return ignored(DragIgnoredReason::ZeroWidth);
        }

        let (Some(left), Some(right)) = (tree.node(&pair.left_id), tree.node(&pair.right_id))
        else {
            return ignored(DragIgnoredReason::NotAdjacentColumns);
        };
        let start = FractionPair::new(left.width_fraction(), right.width_fraction());
        let floors = fraction_floors(
            start,
            combined_px,
            self.min_fraction_ratio,
            left.min_width(),
            right.min_width(),
        );

        debug!(
            row = %pair.row_id,
            left = %pair.left_id,
            right = %pair.right_id,
            pointer_id = pointer_id.0,
            combined_px,
            "column resize started"
        );
        self.session = Some(DragSession {
            pair: pair.clone(),
            pointer_id,
            button,
            start_x: position.x,
            start,
            combined_px,
            floors,
            current: start,
        });
        ResizeDispatch {
            action: None,
            capture_command: Some(CaptureCommand::Acquire { pointer_id }),
            log: DragLogEntry {
                phase: DragPhase::Start,
                pointer_id: Some(pointer_id),
                pair: Some(pair.clone()),
                position: Some(position),
                outcome: DragOutcome::Started,
            },
        }
    }

    /// Propose new widths for the pointer's current position.
    ///
    /// Uses only what was recorded at drag start, so a column unmounting
    /// mid-drag does not interrupt the session.
    pub fn pointer_move(
        &mut self,
        pointer_id: PointerId,
        position: PointerPosition,
    ) -> ResizeDispatch {
        let Some(session) = self.session.as_mut() else {
            return ResizeDispatch::ignored(
                DragPhase::Move,
                DragIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
                Some(position),
            );
        };
        if session.pointer_id != pointer_id {
            return ResizeDispatch::ignored(
                DragPhase::Move,
                DragIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(session.pair.clone()),
                Some(position),
            );
        }

        let next = redistribute(
            session.start,
            position.x - session.start_x,
            session.combined_px,
            session.floors,
        );
        session.current = next;
        trace!(
            left = %session.pair.left_id,
            left_fraction = next.left,
            right = %session.pair.right_id,
            right_fraction = next.right,
            "column resize tick"
        );

        let action = EditorAction::Batch {
            actions: vec![
                EditorAction::update(
                    session.pair.left_id.clone(),
                    ColumnProps::width_patch(next.left),
                ),
                EditorAction::update(
                    session.pair.right_id.clone(),
                    ColumnProps::width_patch(next.right),
                ),
            ],
        };
        ResizeDispatch {
            action: Some(action),
            capture_command: None,
            log: DragLogEntry {
                phase: DragPhase::Move,
                pointer_id: Some(pointer_id),
                pair: Some(session.pair.clone()),
                position: Some(position),
                outcome: DragOutcome::WidthsProposed {
                    left: next.left,
                    right: next.right,
                },
            },
        }
    }

    /// Finish the drag wherever the pointer is. Capture is released even
    /// when the pointer never moved.
    pub fn pointer_up(
        &mut self,
        pointer_id: PointerId,
        position: PointerPosition,
    ) -> ResizeDispatch {
        let Some(session) = self.session.as_ref() else {
            return ResizeDispatch::ignored(
                DragPhase::End,
                DragIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
                Some(position),
            );
        };
        if session.pointer_id != pointer_id {
            return ResizeDispatch::ignored(
                DragPhase::End,
                DragIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(session.pair.clone()),
                Some(position),
            );
        }
        let pair = session.pair.clone();
        debug!(
            left = %pair.left_id,
            left_fraction = session.current.left,
            right = %pair.right_id,
            right_fraction = session.current.right,
            "column resize ended"
        );
        self.session = None;
        ResizeDispatch {
            action: None,
            capture_command: Some(CaptureCommand::Release { pointer_id }),
            log: DragLogEntry {
                phase: DragPhase::End,
                pointer_id: Some(pointer_id),
                pair: Some(pair),
                position: Some(position),
                outcome: DragOutcome::Ended,
            },
        }
    }

    /// Abandon any active drag, keeping the widths applied so far.
    ///
    /// Returns the capture release the host still owes.
    pub fn force_cancel(&mut self) -> Option<ResizeDispatch> {
        let session = self.session.take()?;
        debug!(
            left = %session.pair.left_id,
            right = %session.pair.right_id,
            "column resize canceled"
        );
        let pointer_id = session.pointer_id;
        Some(ResizeDispatch {
            action: None,
            capture_command: Some(CaptureCommand::Release { pointer_id }),
            log: DragLogEntry {
                phase: DragPhase::Cancel,
                pointer_id: Some(pointer_id),
                pair: Some(session.pair),
                position: None,
                outcome: DragOutcome::Canceled,
            },
        })
    }
}

fn is_adjacent_pair(tree: &EditorTree, pair: &ColumnPair) -> bool {
    let is_row = tree
        .node(&pair.row_id)
        .is_some_and(|row| row.node_type == NodeType::Row);
    if !is_row {
        return false;
    }
    let columns = tree.children(&pair.row_id);
    columns
        .windows(2)
        .any(|window| window[0] == pair.left_id && window[1] == pair.right_id)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pagecraft_core::geometry::Rect;
    use pagecraft_tree::{EditorState, Node, NodeId, Props, reduce};
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    const EPS: f64 = 1e-9;

    fn pair() -> ColumnPair {
        ColumnPair {
            row_id: "r1".into(),
            left_id: "c1".into(),
            right_id: "c2".into(),
        }
    }

    fn column(id: &str, width: f64, min_width: Option<f64>) -> Node {
        let mut props: Props = ColumnProps::width_patch(width);
        if let Some(px) = min_width {
            props.insert(ColumnProps::MIN_WIDTH.to_string(), json!(px));
        }
        Node::new(id, NodeType::Column, props)
    }

    fn tree_with(left: Node, right: Node) -> EditorTree {
        let mut state = EditorState::default();
        let nodes = [
            (None, Node::new("s1", NodeType::Section, Props::new())),
            (Some("s1"), Node::new("r1", NodeType::Row, Props::new())),
            (Some("r1"), left),
            (Some("r1"), right),
        ];
        for (parent, node) in nodes {
            state = reduce(&state, EditorAction::insert(parent.map(NodeId::from), node)).state;
        }
        state.tree
    }

    fn registry(left_px: f64, right_px: f64) -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        registry.register("c1".into(), Some(Rc::new(Rect::new(0.0, 0.0, left_px, 100.0))));
        registry.register(
            "c2".into(),
            Some(Rc::new(Rect::new(left_px, 0.0, right_px, 100.0))),
        );
        registry
    }

    fn started(tree: &EditorTree, registry: &ViewRegistry) -> ColumnResizeController {
        let mut controller = ColumnResizeController::new(&EditorConfig::default());
        let dispatch = controller.pointer_down(
            &pair(),
            PointerId(1),
            PointerButton::Primary,
            PointerPosition::new(200.0, 50.0),
            tree,
            registry,
        );
        assert_eq!(
            dispatch.capture_command,
            Some(CaptureCommand::Acquire { pointer_id: PointerId(1) })
        );
        controller
    }

    fn proposed(dispatch: &ResizeDispatch) -> (f64, f64) {
        match dispatch.log.outcome {
            DragOutcome::WidthsProposed { left, right } => (left, right),
            other => panic!("expected widths, got {other:?}"),
        }
    }

    #[test]
    fn half_width_drag_clamps_at_floor() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let registry = registry(200.0, 200.0);
        let mut controller = started(&tree, &registry);

        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::new(400.0, 50.0));
        let (left, right) = proposed(&dispatch);
        assert!((left - 1.9).abs() < EPS);
        assert!((right - 0.1).abs() < EPS);
        assert!((left + right - 2.0).abs() < EPS);

        let Some(EditorAction::Batch { actions }) = dispatch.action else {
            panic!("expected a batch of width updates");
        };
        assert_eq!(actions.len(), 2);
        assert!(matches!(
            &actions[0],
            EditorAction::UpdateNodeProps { node_id, .. } if node_id.as_str() == "c1"
        ));
    }

    #[test]
    fn small_moves_are_linear() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 3.0, None));
        let registry = registry(100.0, 300.0);
        let mut controller = started(&tree, &registry);

        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::new(240.0, 0.0));
        let (left, right) = proposed(&dispatch);
        assert!((left - 1.4).abs() < EPS);
        assert!((right - 2.6).abs() < EPS);

        // Moves are measured from the start, not the previous tick.
        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::new(160.0, 0.0));
        let (left, _) = proposed(&dispatch);
        assert!((left - 0.6).abs() < EPS);
    }

    #[test]
    fn min_width_raises_floor() {
        let tree = tree_with(column("c1", 1.0, Some(100.0)), column("c2", 1.0, None));
        let registry = registry(200.0, 200.0);
        let mut controller = started(&tree, &registry);
        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::new(0.0, 0.0));
        let (left, right) = proposed(&dispatch);
        assert!((left - 0.5).abs() < EPS);
        assert!((right - 1.5).abs() < EPS);
    }

    #[test]
    fn oversized_min_widths_fall_back_to_ratio() {
        let floors = fraction_floors(
            FractionPair::new(1.0, 1.0),
            200.0,
            0.05,
            Some(150.0),
            Some(150.0),
        );
        assert_eq!(floors, FractionFloors { left: 0.1, right: 0.1 });
    }

    #[test]
    fn out_of_range_ratio_uses_default_floor() {
        let start = FractionPair::new(1.0, 1.0);
        for ratio in [f64::NAN, f64::INFINITY, -0.2, 0.0, 0.5, 3.0] {
            let floors = fraction_floors(start, 400.0, ratio, None, None);
            assert!((floors.left - 0.1).abs() < EPS, "ratio {ratio}");
            assert!((floors.right - 0.1).abs() < EPS, "ratio {ratio}");
        }
    }

    #[test]
    fn nan_ratio_config_cannot_push_widths_negative() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let registry = registry(200.0, 200.0);
        let config = EditorConfig {
            min_fraction_ratio: f64::NAN,
            ..EditorConfig::default()
        };
        let mut controller = ColumnResizeController::new(&config);
        controller.pointer_down(
            &pair(),
            PointerId(1),
            PointerButton::Primary,
            PointerPosition::new(200.0, 50.0),
            &tree,
            &registry,
        );

        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::new(600.0, 50.0));
        let (left, right) = proposed(&dispatch);
        assert!((right - 0.1).abs() < EPS);
        assert!((left + right - 2.0).abs() < EPS);
    }

    #[test]
    fn pointer_up_releases_without_movement() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let registry = registry(200.0, 200.0);
        let mut controller = started(&tree, &registry);
        assert_eq!(controller.state(), ResizeState::Dragging);

        let dispatch = controller.pointer_up(PointerId(1), PointerPosition::new(900.0, 900.0));
        assert_eq!(
            dispatch.capture_command,
            Some(CaptureCommand::Release { pointer_id: PointerId(1) })
        );
        assert_eq!(dispatch.action, None);
        assert_eq!(controller.state(), ResizeState::Idle);
    }

    #[test]
    fn foreign_and_stray_pointers_are_ignored() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let registry = registry(200.0, 200.0);
        let mut controller = ColumnResizeController::new(&EditorConfig::default());

        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::default());
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::NoActivePointer));

        let dispatch = controller.pointer_down(
            &pair(),
            PointerId(0),
            PointerButton::Primary,
            PointerPosition::default(),
            &tree,
            &registry,
        );
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::InvalidPointerId));

        let dispatch = controller.pointer_down(
            &pair(),
            PointerId(1),
            PointerButton::Secondary,
            PointerPosition::default(),
            &tree,
            &registry,
        );
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::ButtonNotAllowed));

        let mut controller = started(&tree, &registry);
        let dispatch = controller.pointer_move(PointerId(2), PointerPosition::default());
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::PointerMismatch));
        let dispatch = controller.pointer_down(
            &pair(),
            PointerId(2),
            PointerButton::Primary,
            PointerPosition::default(),
            &tree,
            &registry,
        );
        assert_eq!(
            dispatch.ignored_reason(),
            Some(DragIgnoredReason::ActivePointerAlreadyInProgress)
        );
    }

    #[test]
    fn start_requires_measurable_adjacent_columns() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let mut controller = ColumnResizeController::new(&EditorConfig::default());

        let reversed = ColumnPair {
            row_id: "r1".into(),
            left_id: "c2".into(),
            right_id: "c1".into(),
        };
        let dispatch = controller.pointer_down(
            &reversed,
            PointerId(1),
            PointerButton::Primary,
            PointerPosition::default(),
            &tree,
            &registry(200.0, 200.0),
        );
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::NotAdjacentColumns));

        let mut partial = registry(200.0, 200.0);
        partial.unregister(&"c2".into());
        let dispatch = controller.pointer_down(
            &pair(),
            PointerId(1),
            PointerButton::Primary,
            PointerPosition::default(),
            &tree,
            &partial,
        );
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::MissingGeometry));

        let dispatch = controller.pointer_down(
            &pair(),
            PointerId(1),
            PointerButton::Primary,
            PointerPosition::default(),
            &tree,
            &registry(0.0, 0.0),
        );
        assert_eq!(dispatch.ignored_reason(), Some(DragIgnoredReason::ZeroWidth));
        assert_eq!(controller.state(), ResizeState::Idle);
    }

    #[test]
    fn unmount_mid_drag_keeps_session() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let mut registry = registry(200.0, 200.0);
        let mut controller = started(&tree, &registry);
        registry.clear();
        let dispatch = controller.pointer_move(PointerId(1), PointerPosition::new(220.0, 0.0));
        let (left, _) = proposed(&dispatch);
        assert!((left - 1.1).abs() < EPS);
    }

    #[test]
    fn force_cancel_releases_capture_once() {
        let tree = tree_with(column("c1", 1.0, None), column("c2", 1.0, None));
        let registry = registry(200.0, 200.0);
        let mut controller = started(&tree, &registry);
        let dispatch = controller.force_cancel().expect("active drag");
        assert_eq!(dispatch.log.outcome, DragOutcome::Canceled);
        assert_eq!(
            dispatch.capture_command,
            Some(CaptureCommand::Release { pointer_id: PointerId(1) })
        );
        assert!(controller.force_cancel().is_none());
    }

    proptest! {
        #[test]
        fn redistribution_conserves_the_pair(
            left in 0.05f64..10.0,
            right in 0.05f64..10.0,
            combined_px in 1.0f64..4000.0,
            moves in prop::collection::vec(-5000.0f64..5000.0, 1..24),
        ) {
            let start = FractionPair::new(left, right);
            let floors = fraction_floors(start, combined_px, 0.05, None, None);
            let floor = start.sum() * 0.05;
            for delta_px in moves {
                let next = redistribute(start, delta_px, combined_px, floors);
                prop_assert!((next.sum() - start.sum()).abs() <= 1e-9 * start.sum().max(1.0));
                prop_assert!(next.left >= floor - 1e-12);
                prop_assert!(next.right >= floor - 1e-12);
            }
        }
    }
}
