#![forbid(unsafe_code)]

//! Normalized pointer input.
//!
//! Hosts translate platform pointer events (DOM `PointerEvent`, winit, ...)
//! into these values before handing them to the editor.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Host-assigned pointer identifier. `0` is reserved as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Whether the host supplied a usable identifier.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Pointer button that initiated an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<PointerPosition> for Point {
    fn from(position: PointerPosition) -> Self {
        Point::new(position.x, position.y)
    }
}

/// Host command for platform pointer capture.
///
/// Wire to `setPointerCapture()` / `releasePointerCapture()` (or the
/// window-level listener equivalent) on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CaptureCommand {
    Acquire { pointer_id: PointerId },
    Release { pointer_id: PointerId },
}
