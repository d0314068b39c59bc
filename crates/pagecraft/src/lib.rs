#![forbid(unsafe_code)]

//! Pagecraft public facade.
//!
//! Re-exports the document engine and the interactive editor layer and
//! offers a prelude for hosts that embed an editor.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use pagecraft_core::geometry::{Point, Rect};
pub use pagecraft_core::pointer::{CaptureCommand, PointerButton, PointerId, PointerPosition};

// --- Tree re-exports -------------------------------------------------------

pub use pagecraft_tree::{
    ActionRejection, EditorAction, EditorState, EditorTree, ElementType, HoverLayer, Node,
    NodeId, NodeIdGenerator, NodeType, PathState, Props, ReduceEffect, SnapshotError,
    TreeInvariantError, TreeSnapshot, reduce, resolve_hover_layer,
};

// --- Editor re-exports -----------------------------------------------------

pub use pagecraft_editor::{
    ConfigError, ContentRenderer, DragHandler, Editor, EditorConfig, Measure, OverlayFrame,
    ResizeDispatch, StructuralEvent, ViewHandle, ViewRegistry,
};

// --- Errors ---------------------------------------------------------------

/// Failures a host can hit while setting up or driving an editor.
///
/// Routine editing never produces one of these: rejected actions are
/// reported through [`ReduceEffect`], not raised.
#[derive(Debug)]
pub enum Error {
    /// The editor configuration could not be loaded.
    Config(ConfigError),
    /// A persisted document failed to load.
    Snapshot(SnapshotError),
    /// An action the host required to apply was rejected.
    Rejected(ActionRejection),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Snapshot(err) => write!(f, "snapshot: {err}"),
            Self::Rejected(err) => write!(f, "rejected: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::Rejected(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<SnapshotError> for Error {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}

impl From<ActionRejection> for Error {
    fn from(err: ActionRejection) -> Self {
        Self::Rejected(err)
    }
}

/// Standard result type for Pagecraft APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Open an editor over a persisted document.
pub fn open(config: EditorConfig, snapshot: TreeSnapshot) -> Result<Editor> {
    let tree = EditorTree::from_snapshot(snapshot)?;
    Ok(Editor::with_tree(config, tree))
}

/// Dispatch `action` and turn a rejection into an [`Error`].
///
/// Missing-id no-ops still count as success.
pub fn apply(editor: &mut Editor, action: EditorAction) -> Result<ReduceEffect> {
    match editor.dispatch(action) {
        ReduceEffect::Rejected(rejection) => Err(Error::Rejected(rejection)),
        effect => Ok(effect),
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ContentRenderer, DragHandler, Editor, EditorAction, EditorConfig, Error, Measure, Node,
        NodeId, NodeType, Point, PointerId, PointerPosition, Rect, ReduceEffect, Result,
        StructuralEvent,
    };

    pub use crate::{core, editor, tree};
}

pub use pagecraft_core as core;
pub use pagecraft_editor as editor;
pub use pagecraft_tree as tree;
