#![forbid(unsafe_code)]

//! Live view registry.
//!
//! Maps node ids to handles of their currently mounted visual surfaces so
//! overlays and the resize controller can measure on-screen geometry without
//! ever storing it in the document tree. Rectangles are read at the moment
//! they are needed, never cached here.
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use pagecraft_core::geometry::Rect;
//! use pagecraft_editor::registry::ViewRegistry;
//! use pagecraft_tree::NodeId;
//!
//! let mut registry = ViewRegistry::new();
//! let id = NodeId::from("c1");
//! registry.register(id.clone(), Some(Rc::new(Rect::new(0.0, 0.0, 120.0, 40.0))));
//! assert_eq!(registry.rect(&id), Some(Rect::new(0.0, 0.0, 120.0, 40.0)));
//! registry.register(id.clone(), None);
//! assert!(!registry.contains(&id));
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use pagecraft_core::geometry::Rect;
use pagecraft_tree::NodeId;
use tracing::trace;

/// A mounted surface that can report its current on-screen bounds.
///
/// Hosts implement this for their native view type. `None` means the surface
/// exists but cannot be measured right now.
pub trait Measure {
    fn bounding_rect(&self) -> Option<Rect>;
}

impl Measure for Rect {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

/// A rectangle the host can move after registration.
impl Measure for Cell<Rect> {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(self.get())
    }
}

/// Shared handle to a mounted surface.
pub type ViewHandle = Rc<dyn Measure>;

/// Registry from node id to live view handle.
///
/// Only the structural renderer's mount and unmount effects write here;
/// everything else reads.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    handles: HashMap<NodeId, ViewHandle>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&NodeId> = self.handles.keys().collect();
        ids.sort();
        f.debug_struct("ViewRegistry").field("ids", &ids).finish()
    }
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or clear the handle for `id`.
    ///
    /// `Some` replaces any previous handle; `None` removes the entry, which
    /// is how an unmount is reported.
    pub fn register(&mut self, id: NodeId, handle: Option<ViewHandle>) {
        match handle {
            Some(handle) => {
                trace!(node_id = %id, "view registered");
                self.handles.insert(id, handle);
            }
            None => self.unregister(&id),
        }
    }

    pub fn unregister(&mut self, id: &NodeId) {
        if self.handles.remove(id).is_some() {
            trace!(node_id = %id, "view unregistered");
        }
    }

    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&ViewHandle> {
        self.handles.get(id)
    }

    /// Current bounds of `id`'s surface.
    ///
    /// Absent handles and non-finite measurements both read as `None`.
    #[must_use]
    pub fn rect(&self, id: &NodeId) -> Option<Rect> {
        let rect = self.handles.get(id)?.bounding_rect()?;
        let finite = [rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|value| value.is_finite());
        finite.then_some(rect)
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.handles.contains_key(id)
    }

    /// Drop every handle whose id fails `keep`. Returns the dropped ids.
    pub fn retain(&mut self, mut keep: impl FnMut(&NodeId) -> bool) -> Vec<NodeId> {
        let mut dropped: Vec<NodeId> = self
            .handles
            .keys()
            .filter(|id| !keep(id))
            .cloned()
            .collect();
        dropped.sort();
        for id in &dropped {
            self.unregister(id);
        }
        dropped
    }

    /// Registered ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.handles.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn clear(&mut self) {
        if !self.handles.is_empty() {
            trace!(count = self.handles.len(), "view registry cleared");
        }
        self.handles.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Detached;

    impl Measure for Detached {
        fn bounding_rect(&self) -> Option<Rect> {
            None
        }
    }

    #[test]
    fn register_replace_and_unregister() {
        let mut registry = ViewRegistry::new();
        let id = NodeId::from("c1");
        registry.register(id.clone(), Some(Rc::new(Rect::new(0.0, 0.0, 10.0, 10.0))));
        registry.register(id.clone(), Some(Rc::new(Rect::new(5.0, 0.0, 20.0, 10.0))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.rect(&id), Some(Rect::new(5.0, 0.0, 20.0, 10.0)));

        registry.register(id.clone(), None);
        assert!(registry.is_empty());
        assert_eq!(registry.rect(&id), None);
    }

    #[test]
    fn rect_is_read_live() {
        let mut registry = ViewRegistry::new();
        let id = NodeId::from("c1");
        let live = Rc::new(Cell::new(Rect::new(0.0, 0.0, 100.0, 20.0)));
        registry.register(id.clone(), Some(live.clone() as ViewHandle));
        live.set(Rect::new(0.0, 0.0, 150.0, 20.0));
        assert_eq!(registry.rect(&id).map(|r| r.width), Some(150.0));
    }

    #[test]
    fn unmeasurable_handles_read_as_absent() {
        let mut registry = ViewRegistry::new();
        registry.register("a".into(), Some(Rc::new(Detached)));
        registry.register(
            "b".into(),
            Some(Rc::new(Rect::new(f64::NAN, 0.0, 1.0, 1.0))),
        );
        assert!(registry.contains(&"a".into()));
        assert_eq!(registry.rect(&"a".into()), None);
        assert_eq!(registry.rect(&"b".into()), None);
    }

    #[test]
    fn retain_reports_dropped_ids() {
        let mut registry = ViewRegistry::new();
        for id in ["a", "b", "c"] {
            registry.register(id.into(), Some(Rc::new(Rect::from_size(1.0, 1.0))));
        }
        let dropped = registry.retain(|id| id.as_str() == "b");
        assert_eq!(dropped, vec![NodeId::from("a"), NodeId::from("c")]);
        assert_eq!(registry.ids(), vec![NodeId::from("b")]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
