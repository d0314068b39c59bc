#![forbid(unsafe_code)]

//! Node factory and the parent/child legality rule.
//!
//! [`validate_parent_child`] is the one place hierarchy legality is decided;
//! the reducer and the tree validator both route through it.
//!
//! ```text
//! (root) ─▶ Section ─▶ Row ─▶ Column ─▶ Element (leaf)
//! ```

use crate::node::{
    ColumnProps, ElementProps, ElementType, Node, NodeId, NodeIdGenerator, NodeType, Props,
    RowProps, SectionProps,
};

/// Type-default props for a fresh node.
///
/// `element_type` only matters for [`NodeType::Element`]; `None` means text.
#[must_use]
pub fn type_defaults(node_type: NodeType, element_type: Option<ElementType>) -> Props {
    match node_type {
        NodeType::Section => SectionProps::default().into_props(),
        NodeType::Row => RowProps::default().into_props(),
        NodeType::Column => ColumnProps::default().into_props(),
        NodeType::Element => ElementProps::new(element_type.unwrap_or_default()).into_props(),
    }
}

/// Mint a node with a fresh id, merging caller props over the type defaults.
///
/// For elements, an `elementType` entry in `props` selects which content
/// defaults are applied.
#[must_use]
pub fn create_node(
    ids: &mut NodeIdGenerator,
    node_type: NodeType,
    parent_id: Option<NodeId>,
    props: Props,
) -> Node {
    let id = ids.next_id(node_type);
    create_node_with_id(id, node_type, parent_id, props)
}

/// Same as [`create_node`] with a caller-chosen id.
#[must_use]
pub fn create_node_with_id(
    id: NodeId,
    node_type: NodeType,
    parent_id: Option<NodeId>,
    props: Props,
) -> Node {
    let mut merged = type_defaults(node_type, ElementType::from_props(&props));
    merged.extend(props);
    Node {
        id,
        node_type,
        parent_id,
        children_ids: Vec::new(),
        props: merged,
    }
}

/// Whether a node of type `child` may sit directly under `parent`
/// (`None` = the document root level).
#[must_use]
pub const fn is_legal_child(parent: Option<NodeType>, child: NodeType) -> bool {
    match parent {
        None => matches!(child, NodeType::Section),
        Some(NodeType::Section) => matches!(child, NodeType::Row),
        Some(NodeType::Row) => matches!(child, NodeType::Column),
        Some(NodeType::Column) => matches!(child, NodeType::Element),
        Some(NodeType::Element) => false,
    }
}

/// Pure, total legality check between a (possibly absent) parent and a child.
#[must_use]
pub fn validate_parent_child(parent: Option<&Node>, child: &Node) -> bool {
    is_legal_child(parent.map(|node| node.node_type), child.node_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TYPES: [NodeType; 4] = [
        NodeType::Section,
        NodeType::Row,
        NodeType::Column,
        NodeType::Element,
    ];

    #[test]
    fn legality_table_is_exact() {
        for child in TYPES {
            assert_eq!(is_legal_child(None, child), child == NodeType::Section);
        }
        for parent in TYPES {
            for child in TYPES {
                let expected = parent.child_type() == Some(child);
                assert_eq!(
                    is_legal_child(Some(parent), child),
                    expected,
                    "{parent} -> {child}"
                );
            }
        }
    }

    #[test]
    fn element_admits_nothing() {
        let leaf = Node::new("e1", NodeType::Element, Props::new());
        for child in TYPES {
            let node = Node::new("x", child, Props::new());
            assert!(!validate_parent_child(Some(&leaf), &node));
        }
    }

    #[test]
    fn create_node_merges_caller_props_over_defaults() {
        let mut ids = NodeIdGenerator::with_salt(1);
        let mut props = Props::new();
        props.insert("widthFraction".into(), json!(3.0));
        let column = create_node(&mut ids, NodeType::Column, Some("r1".into()), props);
        assert_eq!(column.width_fraction(), 3.0);
        assert_eq!(column.parent_id, Some(NodeId::new("r1")));
        assert!(column.children_ids.is_empty());

        let row = create_node(&mut ids, NodeType::Row, None, Props::new());
        assert_eq!(row.props["gap"], json!(16.0));
        assert_ne!(row.id, column.id);
    }

    #[test]
    fn element_defaults_follow_requested_type() {
        let mut props = Props::new();
        props.insert("elementType".into(), json!("button"));
        props.insert("label".into(), json!("Buy"));
        let node = create_node_with_id("e1".into(), NodeType::Element, None, props);
        assert_eq!(node.element_type(), Some(ElementType::Button));
        assert_eq!(node.props["label"], json!("Buy"));
        assert_eq!(node.props["href"], json!("#"));
    }
}
