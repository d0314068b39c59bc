#![forbid(unsafe_code)]

//! One editor instance.
//!
//! [`Editor`] owns everything scoped to a single mounted canvas: the
//! reducer state, the view registry, the structural mount tracker, the
//! resize controller, and the last computed overlay. All mutation goes
//! through [`Editor::dispatch`]; the overlay is recomputed lazily after any
//! applied action, mount change, or drag tick.

use pagecraft_core::geometry::Point;
use pagecraft_core::pointer::{CaptureCommand, PointerButton, PointerId, PointerPosition};
use pagecraft_tree::{
    EditorAction, EditorState, EditorTree, Node, NodeId, NodeIdGenerator, NodeType, Props,
    ReduceEffect, create_node, reduce,
};
use tracing::debug;

use crate::config::EditorConfig;
use crate::overlay::{OverlayFrame, compute_overlay};
use crate::registry::{ViewHandle, ViewRegistry};
use crate::resize::{
    ColumnResizeController, DragHandler, DragIgnoredReason, DragPhase, ResizeDispatch,
    ResizeState,
};
use crate::structure::{
    ContentRenderer, RenderPass, StructuralEvent, StructuralRenderer, route_event,
};

#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    config: EditorConfig,
    ids: NodeIdGenerator,
    registry: ViewRegistry,
    structure: StructuralRenderer,
    resize: ColumnResizeController,
    overlay: Option<OverlayFrame>,
}

impl Editor {
    /// An editor over an empty document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_tree(config, EditorTree::new())
    }

    #[must_use]
    pub fn with_tree(config: EditorConfig, tree: EditorTree) -> Self {
        Self {
            state: EditorState::new(tree),
            resize: ColumnResizeController::new(&config),
            config,
            ids: NodeIdGenerator::new(),
            registry: ViewRegistry::new(),
            structure: StructuralRenderer::new(),
            overlay: None,
        }
    }

    /// Replace the id generator, e.g. with a fixed salt for reproducible ids.
    #[must_use]
    pub fn with_id_generator(mut self, ids: NodeIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub const fn tree(&self) -> &EditorTree {
        &self.state.tree
    }

    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn resize_state(&self) -> ResizeState {
        self.resize.state()
    }

    /// Build a node with a fresh id and type defaults. Not inserted.
    pub fn create_node(
        &mut self,
        node_type: NodeType,
        parent_id: Option<NodeId>,
        props: Props,
    ) -> Node {
        create_node(&mut self.ids, node_type, parent_id, props)
    }

    /// Run `action` through the reducer.
    pub fn dispatch(&mut self, action: EditorAction) -> ReduceEffect {
        let reduction = reduce(&self.state, action);
        if reduction.effect.is_applied() {
            self.state = reduction.state;
            self.overlay = None;
        }
        reduction.effect
    }

    /// Route a structural pointer event. `None` when the event names a node
    /// that is no longer in the tree, or a leave that no longer matches the
    /// hovered node of its layer.
    pub fn handle_event(&mut self, event: &StructuralEvent) -> Option<ReduceEffect> {
        let action = route_event(&self.state, event)?;
        Some(self.dispatch(action))
    }

    /// Render the current tree and unregister views of removed nodes.
    pub fn render<C: ContentRenderer>(&mut self, content: &mut C) -> RenderPass<C::Output> {
        let pass = self
            .structure
            .render(&self.state.tree, content, &mut self.registry);
        if !pass.unmounted.is_empty() {
            self.overlay = None;
        }
        pass
    }

    /// Mount effect: `id`'s surface is on screen.
    pub fn mount(&mut self, id: NodeId, handle: ViewHandle) {
        self.registry.register(id, Some(handle));
        self.overlay = None;
    }

    /// Unmount effect.
    pub fn unmount(&mut self, id: &NodeId) {
        self.registry.unregister(id);
        self.overlay = None;
    }

    /// Overlay for the current state, recomputed if anything changed.
    pub fn overlay(&mut self) -> &OverlayFrame {
        let drag_row = self.resize.session().map(|session| session.pair.row_id.clone());
        self.overlay.get_or_insert_with(|| {
            compute_overlay(&self.state, &self.registry, &self.config, drag_row.as_ref())
        })
    }

    /// Force the next [`Editor::overlay`] call to re-measure, for layout
    /// changes the editor cannot observe.
    pub fn invalidate_overlay(&mut self) {
        self.overlay = None;
    }

    /// Release everything owned by this instance.
    ///
    /// Returns the capture release owed for a drag still in progress.
    pub fn teardown(&mut self) -> Option<CaptureCommand> {
        let release = self
            .resize
            .force_cancel()
            .and_then(|dispatch| dispatch.capture_command);
        self.structure.teardown(&mut self.registry);
        self.registry.clear();
        self.overlay = None;
        debug!(released_capture = release.is_some(), "editor torn down");
        release
    }
}

impl DragHandler for Editor {
    /// Start a resize if the pointer is over a handle of the current overlay.
    fn on_drag_start(
        &mut self,
        pointer_id: PointerId,
        button: PointerButton,
        position: PointerPosition,
    ) -> ResizeDispatch {
        let point = Point::from(position);
        let Some(pair) = self
            .overlay()
            .handle_at(point)
            .map(|handle| handle.pair.clone())
        else {
            return ResizeDispatch::ignored(
                DragPhase::Start,
                DragIgnoredReason::NoHandle,
                Some(pointer_id),
                None,
                Some(position),
            );
        };
        let dispatch = self.resize.pointer_down(
            &pair,
            pointer_id,
            button,
            position,
            &self.state.tree,
            &self.registry,
        );
        if !dispatch.is_ignored() {
            self.overlay = None;
        }
        dispatch
    }

    /// Apply the widths for the new position.
    ///
    /// The width batch is dispatched here; the returned `action` is what
    /// was applied, and must not be dispatched again.
    fn on_drag_move(
        &mut self,
        pointer_id: PointerId,
        position: PointerPosition,
    ) -> ResizeDispatch {
        let dispatch = self.resize.pointer_move(pointer_id, position);
        if let Some(action) = dispatch.action.clone() {
            self.dispatch(action);
        }
        dispatch
    }

    fn on_drag_end(
        &mut self,
        pointer_id: PointerId,
        position: PointerPosition,
    ) -> ResizeDispatch {
        let dispatch = self.resize.pointer_up(pointer_id, position);
        if !dispatch.is_ignored() {
            self.overlay = None;
        }
        dispatch
    }
}
