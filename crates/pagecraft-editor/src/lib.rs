#![forbid(unsafe_code)]

//! Interactive layer of the Pagecraft layout editor.
//!
//! # Role in Pagecraft
//! `pagecraft-editor` sits between a host view layer and the document engine
//! in `pagecraft-tree`. It never draws pixels; it measures mounted surfaces
//! and tells the host what to draw above them.
//!
//! # Primary responsibilities
//! - **Registry**: [`ViewRegistry`] maps node ids to live, measurable view
//!   handles, one registry per editor instance.
//! - **Overlay**: [`compute_overlay`] turns hover and selection paths into
//!   outlines and column resize handles.
//! - **Resize**: [`ColumnResizeController`] is the Idle/Dragging machine
//!   that moves width between two adjacent columns while keeping their sum
//!   fixed.
//! - **Structure**: [`StructuralRenderer`] walks the tree, delegates element
//!   content, and keeps the registry in step with mounts.
//!
//! [`Editor`] bundles all of the above behind one instance.

pub mod config;
pub mod editor;
pub mod overlay;
pub mod registry;
pub mod resize;
pub mod structure;

pub use config::{ConfigError, EditorConfig, OutlineStyle, StrokeStyle};
pub use editor::Editor;
pub use overlay::{
    ColumnPair, Outline, OutlineKind, OverlayFrame, ResizeHandle, compute_overlay,
};
pub use registry::{Measure, ViewHandle, ViewRegistry};
pub use resize::{
    ColumnResizeController, DragHandler, DragIgnoredReason, DragLogEntry, DragOutcome,
    DragPhase, DragSession, FractionFloors, FractionPair, ResizeDispatch, ResizeState,
    fraction_floors, redistribute,
};
pub use structure::{
    ContentRenderer, RenderPass, StructuralBlock, StructuralEvent, StructuralRenderer,
    route_event,
};
