#![forbid(unsafe_code)]

//! Core: geometry and pointer primitives shared by the Pagecraft editor.
//!
//! # Role in Pagecraft
//! `pagecraft-core` carries the small value types that both the document
//! tree (`pagecraft-tree`) and the interactive editor (`pagecraft-editor`)
//! speak: measured rectangles in CSS pixels and normalized pointer input.
//! It has no knowledge of nodes, actions, or rendering.

pub mod geometry;
pub mod pointer;

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, info_span, trace, trace_span, warn};
