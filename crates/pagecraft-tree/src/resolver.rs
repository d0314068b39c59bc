#![forbid(unsafe_code)]

//! Which structural layer owns the outline.
//!
//! Pointer-enter fires on every ancestor of the region under the pointer, so
//! the hover path usually has several slots set at once. Resolving to the
//! most specific layer keeps the outline from flickering between nested
//! boxes as the pointer moves.

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeType};
use crate::path::PathState;

/// Structural depth eligible to show a hover outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverLayer {
    Element,
    Row,
    Section,
}

impl HoverLayer {
    /// Priority order, highest first.
    pub const PRIORITY: [HoverLayer; 3] = [Self::Element, Self::Row, Self::Section];

    #[must_use]
    pub const fn node_type(self) -> NodeType {
        match self {
            Self::Element => NodeType::Element,
            Self::Row => NodeType::Row,
            Self::Section => NodeType::Section,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Row => "row",
            Self::Section => "section",
        }
    }
}

/// Resolve the layer that currently owns the outline.
///
/// Element beats row beats section, considering hover and selection
/// together; with no live hover the selected path alone decides.
#[must_use]
pub fn resolve_hover_layer(hovered: &PathState, selected: &PathState) -> Option<HoverLayer> {
    HoverLayer::PRIORITY.into_iter().find(|layer| {
        let node_type = layer.node_type();
        hovered.slot(node_type).is_some() || selected.slot(node_type).is_some()
    })
}

/// The hovered node owning `layer`, if the hover path (not the selection)
/// populated it.
#[must_use]
pub fn hover_owner(layer: HoverLayer, hovered: &PathState) -> Option<&NodeId> {
    hovered.slot(layer.node_type())
}

/// Layer and id of the selected node, including columns.
#[must_use]
pub fn selected_target(selected: &PathState) -> Option<(NodeType, &NodeId)> {
    selected.deepest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(section: Option<&str>, row: Option<&str>, element: Option<&str>) -> PathState {
        PathState {
            section_id: section.map(NodeId::from),
            row_id: row.map(NodeId::from),
            column_id: None,
            element_id: element.map(NodeId::from),
        }
    }

    #[test]
    fn hovered_element_beats_selected_row() {
        let hovered = path(None, None, Some("e1"));
        let selected = path(None, Some("r1"), None);
        assert_eq!(
            resolve_hover_layer(&hovered, &selected),
            Some(HoverLayer::Element)
        );
    }

    #[test]
    fn selection_is_fallback_without_hover() {
        let selected = path(None, Some("r1"), None);
        assert_eq!(
            resolve_hover_layer(&PathState::default(), &selected),
            Some(HoverLayer::Row)
        );
    }

    #[test]
    fn selected_element_beats_hovered_row() {
        let hovered = path(Some("s1"), Some("r1"), None);
        let selected = path(None, None, Some("e1"));
        assert_eq!(
            resolve_hover_layer(&hovered, &selected),
            Some(HoverLayer::Element)
        );
        assert_eq!(hover_owner(HoverLayer::Element, &hovered), None);
    }

    #[test]
    fn nested_hover_resolves_to_innermost() {
        let hovered = path(Some("s1"), Some("r1"), None);
        assert_eq!(
            resolve_hover_layer(&hovered, &PathState::default()),
            Some(HoverLayer::Row)
        );
        let only_section = path(Some("s1"), None, None);
        assert_eq!(
            resolve_hover_layer(&only_section, &PathState::default()),
            Some(HoverLayer::Section)
        );
    }

    #[test]
    fn nothing_hovered_or_selected() {
        assert_eq!(
            resolve_hover_layer(&PathState::default(), &PathState::default()),
            None
        );
    }

    #[test]
    fn column_selection_has_no_layer_but_is_a_target() {
        let mut selected = PathState::default();
        selected.select(NodeType::Column, "c1".into());
        assert_eq!(resolve_hover_layer(&PathState::default(), &selected), None);
        assert_eq!(
            selected_target(&selected),
            Some((NodeType::Column, &NodeId::from("c1")))
        );
    }
}
