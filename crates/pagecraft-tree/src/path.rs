#![forbid(unsafe_code)]

//! Ancestor-chain records for hover and selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeType};

/// One slot per structural depth, each nullable.
///
/// For hover, the slots hold the ancestor chain of the pointer's innermost
/// region (pointer-enter fires on every ancestor). For selection, exactly one
/// slot is populated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathState {
    pub section_id: Option<NodeId>,
    pub row_id: Option<NodeId>,
    pub column_id: Option<NodeId>,
    pub element_id: Option<NodeId>,
}

impl PathState {
    /// The slot for one structural depth.
    #[must_use]
    pub fn slot(&self, node_type: NodeType) -> Option<&NodeId> {
        match node_type {
            NodeType::Section => self.section_id.as_ref(),
            NodeType::Row => self.row_id.as_ref(),
            NodeType::Column => self.column_id.as_ref(),
            NodeType::Element => self.element_id.as_ref(),
        }
    }

    /// Overwrite one slot, leaving the others alone.
    pub fn set_slot(&mut self, node_type: NodeType, id: Option<NodeId>) {
        match node_type {
            NodeType::Section => self.section_id = id,
            NodeType::Row => self.row_id = id,
            NodeType::Column => self.column_id = id,
            NodeType::Element => self.element_id = id,
        }
    }

    /// Hover semantics: set one slot and clear every deeper slot.
    ///
    /// Shallower slots survive, so leaving an inner region while still inside
    /// an outer one keeps the outer hover.
    pub fn hover(&mut self, node_type: NodeType, id: Option<NodeId>) {
        self.set_slot(node_type, id);
        for deeper in [NodeType::Row, NodeType::Column, NodeType::Element] {
            if deeper > node_type {
                self.set_slot(deeper, None);
            }
        }
    }

    /// Selection semantics: exactly one slot populated.
    pub fn select(&mut self, node_type: NodeType, id: NodeId) {
        self.clear();
        self.set_slot(node_type, Some(id));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.section_id.is_none()
            && self.row_id.is_none()
            && self.column_id.is_none()
            && self.element_id.is_none()
    }

    /// Innermost populated slot.
    #[must_use]
    pub fn deepest(&self) -> Option<(NodeType, &NodeId)> {
        [
            NodeType::Element,
            NodeType::Column,
            NodeType::Row,
            NodeType::Section,
        ]
        .into_iter()
        .find_map(|node_type| self.slot(node_type).map(|id| (node_type, id)))
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        [
            &self.section_id,
            &self.row_id,
            &self.column_id,
            &self.element_id,
        ]
        .into_iter()
        .any(|slot| slot.as_ref() == Some(id))
    }

    /// Clear every slot that names one of `removed`. Returns whether anything
    /// changed.
    pub fn forget(&mut self, removed: &BTreeSet<NodeId>) -> bool {
        let mut changed = false;
        for slot in [
            &mut self.section_id,
            &mut self.row_id,
            &mut self.column_id,
            &mut self.element_id,
        ] {
            if slot.as_ref().is_some_and(|id| removed.contains(id)) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> PathState {
        PathState {
            section_id: Some("s1".into()),
            row_id: Some("r1".into()),
            column_id: Some("c1".into()),
            element_id: Some("e1".into()),
        }
    }

    #[test]
    fn hovering_shallower_clears_deeper() {
        let mut path = full();
        path.hover(NodeType::Row, Some("r2".into()));
        assert_eq!(path.section_id, Some("s1".into()));
        assert_eq!(path.row_id, Some("r2".into()));
        assert_eq!(path.column_id, None);
        assert_eq!(path.element_id, None);
    }

    #[test]
    fn hovering_element_keeps_ancestors() {
        let mut path = full();
        path.hover(NodeType::Element, None);
        assert_eq!(path.column_id, Some("c1".into()));
        assert_eq!(path.element_id, None);
    }

    #[test]
    fn select_populates_exactly_one_slot() {
        let mut path = full();
        path.select(NodeType::Column, "c9".into());
        assert_eq!(path.deepest(), Some((NodeType::Column, &NodeId::from("c9"))));
        assert_eq!(path.section_id, None);
        assert_eq!(path.row_id, None);
    }

    #[test]
    fn forget_clears_only_matching_slots() {
        let mut path = full();
        let removed = BTreeSet::from([NodeId::from("c1"), NodeId::from("e1"), NodeId::from("zz")]);
        assert!(path.forget(&removed));
        assert_eq!(path.row_id, Some("r1".into()));
        assert_eq!(path.column_id, None);
        assert_eq!(path.element_id, None);
        assert!(!path.forget(&removed));
    }
}
