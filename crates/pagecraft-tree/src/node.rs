#![forbid(unsafe_code)]

//! Node shapes, identifiers, and type-default property bags.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Open property bag attached to every node.
///
/// Semantics belong to the content renderer and settings panels; the tree
/// engine only reads the handful of keys it needs (`widthFraction`,
/// `minWidth`, `elementType`).
pub type Props = BTreeMap<String, Value>;

/// Opaque, unique node identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a caller-chosen identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NodeId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Structural depth of a node.
///
/// Ordered from outermost to innermost, so `Section < Row < Column < Element`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Section,
    Row,
    Column,
    Element,
}

impl NodeType {
    /// The single node type admitted as a child, or `None` for leaves.
    #[must_use]
    pub const fn child_type(self) -> Option<NodeType> {
        match self {
            Self::Section => Some(Self::Row),
            Self::Row => Some(Self::Column),
            Self::Column => Some(Self::Element),
            Self::Element => None,
        }
    }

    /// Stable label used in logs and generated ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Row => "row",
            Self::Column => "column",
            Self::Element => "element",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content family of an Element leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    #[default]
    Text,
    Image,
    Button,
    Heading,
    Video,
    Divider,
}

impl ElementType {
    /// All element types in declaration order.
    pub const ALL: [ElementType; 6] = [
        Self::Text,
        Self::Image,
        Self::Button,
        Self::Heading,
        Self::Video,
        Self::Divider,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
            Self::Heading => "heading",
            Self::Video => "video",
            Self::Divider => "divider",
        }
    }

    /// Parse the `elementType` prop value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    /// Read the element type out of a property bag.
    #[must_use]
    pub fn from_props(props: &Props) -> Option<Self> {
        props
            .get(ElementProps::ELEMENT_TYPE)
            .and_then(Value::as_str)
            .and_then(Self::parse)
    }
}

/// One entry of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub children_ids: Vec<NodeId>,
    #[serde(default)]
    pub props: Props,
}

impl Node {
    /// Build a childless node with explicit id and props (no defaults applied).
    #[must_use]
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, props: Props) -> Self {
        Self {
            id: id.into(),
            node_type,
            parent_id: None,
            children_ids: Vec::new(),
            props,
        }
    }

    /// Whether this node is a leaf by type.
    #[must_use]
    pub const fn is_leaf_type(&self) -> bool {
        matches!(self.node_type, NodeType::Element)
    }

    /// Column width weight; falls back to the default when absent or invalid.
    #[must_use]
    pub fn width_fraction(&self) -> f64 {
        ColumnProps::width_fraction_of(&self.props)
    }

    /// Column minimum width in pixels, if set.
    #[must_use]
    pub fn min_width(&self) -> Option<f64> {
        ColumnProps::min_width_of(&self.props)
    }

    /// Element content family, if this is an element with a recognised type.
    #[must_use]
    pub fn element_type(&self) -> Option<ElementType> {
        match self.node_type {
            NodeType::Element => ElementType::from_props(&self.props),
            _ => None,
        }
    }
}

/// Default props for a Section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProps {
    pub background: String,
    pub padding_y: f64,
    pub padding_x: f64,
    pub min_height: Option<f64>,
}

impl Default for SectionProps {
    fn default() -> Self {
        Self {
            background: "transparent".to_string(),
            padding_y: 48.0,
            padding_x: 24.0,
            min_height: None,
        }
    }
}

impl SectionProps {
    #[must_use]
    pub fn into_props(self) -> Props {
        let mut props = Props::new();
        props.insert("background".into(), json!(self.background));
        props.insert("paddingY".into(), json!(self.padding_y));
        props.insert("paddingX".into(), json!(self.padding_x));
        if let Some(min_height) = self.min_height {
            props.insert("minHeight".into(), json!(min_height));
        }
        props
    }
}

/// Default props for a Row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowProps {
    pub gap: f64,
    pub padding_y: f64,
    pub padding_x: f64,
}

impl Default for RowProps {
    fn default() -> Self {
        Self {
            gap: 16.0,
            padding_y: 0.0,
            padding_x: 0.0,
        }
    }
}

impl RowProps {
    #[must_use]
    pub fn into_props(self) -> Props {
        let mut props = Props::new();
        props.insert("gap".into(), json!(self.gap));
        props.insert("paddingY".into(), json!(self.padding_y));
        props.insert("paddingX".into(), json!(self.padding_x));
        props
    }
}

/// Default props for a Column.
///
/// `width_fraction` is a relative weight: only ratios between sibling
/// columns matter, never the absolute sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProps {
    pub width_fraction: f64,
    pub min_width: Option<f64>,
}

impl Default for ColumnProps {
    fn default() -> Self {
        Self {
            width_fraction: Self::DEFAULT_WIDTH_FRACTION,
            min_width: None,
        }
    }
}

impl ColumnProps {
    pub const WIDTH_FRACTION: &'static str = "widthFraction";
    pub const MIN_WIDTH: &'static str = "minWidth";
    pub const DEFAULT_WIDTH_FRACTION: f64 = 1.0;

    #[must_use]
    pub fn into_props(self) -> Props {
        let mut props = Props::new();
        props.insert(Self::WIDTH_FRACTION.into(), json!(self.width_fraction));
        if let Some(min_width) = self.min_width {
            props.insert(Self::MIN_WIDTH.into(), json!(min_width));
        }
        props
    }

    /// Read `widthFraction`, falling back to the default unless it is a
    /// positive finite number.
    #[must_use]
    pub fn width_fraction_of(props: &Props) -> f64 {
        props
            .get(Self::WIDTH_FRACTION)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(Self::DEFAULT_WIDTH_FRACTION)
    }

    #[must_use]
    pub fn min_width_of(props: &Props) -> Option<f64> {
        props
            .get(Self::MIN_WIDTH)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite() && *value > 0.0)
    }

    /// Partial props setting only the width weight (what a resize emits).
    #[must_use]
    pub fn width_patch(width_fraction: f64) -> Props {
        let mut props = Props::new();
        props.insert(Self::WIDTH_FRACTION.into(), json!(width_fraction));
        props
    }
}

/// Default props for an Element, keyed by content family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementProps {
    pub element_type: ElementType,
}

impl ElementProps {
    pub const ELEMENT_TYPE: &'static str = "elementType";

    #[must_use]
    pub const fn new(element_type: ElementType) -> Self {
        Self { element_type }
    }

    #[must_use]
    pub fn into_props(self) -> Props {
        let mut props = Props::new();
        props.insert(Self::ELEMENT_TYPE.into(), json!(self.element_type.as_str()));
        let content: Vec<(&str, Value)> = match self.element_type {
            ElementType::Text => vec![
                ("content", json!("Add your text here")),
                ("align", json!("left")),
            ],
            ElementType::Heading => vec![("content", json!("Heading")), ("level", json!(2))],
            ElementType::Image => vec![
                ("src", json!("")),
                ("alt", json!("")),
                ("fit", json!("cover")),
            ],
            ElementType::Button => vec![("label", json!("Click me")), ("href", json!("#"))],
            ElementType::Video => vec![("src", json!("")), ("autoplay", json!(false))],
            ElementType::Divider => vec![("thickness", json!(1)), ("color", json!("#e5e7eb"))],
        };
        for (key, value) in content {
            props.insert(key.to_string(), value);
        }
        props
    }
}

/// Collision-resistant generator for fresh node ids.
///
/// Ids look like `row-5f3a09c1-4`: a per-generator salt keeps ids from two
/// editor sessions apart, and a monotonic counter keeps ids within one
/// session unique.
#[derive(Debug, Clone)]
pub struct NodeIdGenerator {
    salt: u32,
    counter: u64,
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIdGenerator {
    /// Generator salted from the wall clock.
    #[must_use]
    pub fn new() -> Self {
        let nanos = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_salt(splitmix32(nanos))
    }

    /// Deterministic generator for tests and replays.
    #[must_use]
    pub const fn with_salt(salt: u32) -> Self {
        Self { salt, counter: 0 }
    }

    /// Mint the next id for a node of `node_type`.
    pub fn next_id(&mut self, node_type: NodeType) -> NodeId {
        self.counter = self.counter.wrapping_add(1);
        NodeId(format!(
            "{}-{:08x}-{}",
            node_type.as_str(),
            self.salt,
            self.counter
        ))
    }
}

fn splitmix32(seed: u64) -> u32 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_fraction_falls_back_on_garbage() {
        let mut props = Props::new();
        assert_eq!(ColumnProps::width_fraction_of(&props), 1.0);
        props.insert(ColumnProps::WIDTH_FRACTION.into(), json!("wide"));
        assert_eq!(ColumnProps::width_fraction_of(&props), 1.0);
        props.insert(ColumnProps::WIDTH_FRACTION.into(), json!(-2.0));
        assert_eq!(ColumnProps::width_fraction_of(&props), 1.0);
        props.insert(ColumnProps::WIDTH_FRACTION.into(), json!(2.5));
        assert_eq!(ColumnProps::width_fraction_of(&props), 2.5);
    }

    #[test]
    fn element_defaults_carry_type_tag() {
        for kind in ElementType::ALL {
            let props = ElementProps::new(kind).into_props();
            assert_eq!(ElementType::from_props(&props), Some(kind));
        }
    }

    #[test]
    fn generator_ids_are_unique_and_typed() {
        let mut ids = NodeIdGenerator::with_salt(0xabc);
        let first = ids.next_id(NodeType::Row);
        let second = ids.next_id(NodeType::Row);
        assert_ne!(first, second);
        assert_eq!(first.as_str(), "row-00000abc-1");
        assert!(ids.next_id(NodeType::Element).as_str().starts_with("element-"));
    }

    #[test]
    fn node_serializes_with_camel_case_keys() {
        let node = Node::new("c1", NodeType::Column, ColumnProps::default().into_props());
        let value = serde_json::to_value(&node).expect("node serializes");
        assert_eq!(value["type"], json!("column"));
        assert_eq!(value["parentId"], Value::Null);
        assert_eq!(value["childrenIds"], json!([]));
        assert_eq!(value["props"]["widthFraction"], json!(1.0));
    }
}
