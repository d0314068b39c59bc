#![forbid(unsafe_code)]

//! Normalized document tree.
//!
//! Nodes live in a flat persistent map keyed by id; structure is carried by
//! each node's `parent_id` and ordered `children_ids`. Cloning an
//! [`EditorTree`] is O(1) and later writes copy only the touched paths, so
//! the reducer can stage changes on a working copy and discard it on
//! rejection.
//!
//! Invariants checked by [`EditorTree::validate`]:
//!
//! - every map key equals its node's `id`;
//! - every `parent_id` names an existing node whose `children_ids` lists the
//!   child exactly once, and every listed child points back at its parent;
//! - `root_id`, if set, names a parentless Section and is the only parentless
//!   node;
//! - every parent/child pair is legal per [`is_legal_child`];
//! - every node is reachable from the root exactly once (no cycles).

use std::collections::BTreeSet;
use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeId, NodeType};
use crate::path::PathState;
use crate::schema::is_legal_child;

/// One structural invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeInvariantError {
    KeyMismatch {
        key: NodeId,
        node_id: NodeId,
    },
    MissingParent {
        node_id: NodeId,
        parent_id: NodeId,
    },
    ChildNotListed {
        parent_id: NodeId,
        child_id: NodeId,
    },
    DuplicateChild {
        parent_id: NodeId,
        child_id: NodeId,
    },
    MissingChild {
        parent_id: NodeId,
        child_id: NodeId,
    },
    ChildParentMismatch {
        parent_id: NodeId,
        child_id: NodeId,
        actual_parent: Option<NodeId>,
    },
    RootMissing {
        root_id: NodeId,
    },
    RootHasParent {
        root_id: NodeId,
    },
    NodesWithoutRoot {
        count: usize,
    },
    ExtraParentlessNode {
        node_id: NodeId,
    },
    IllegalHierarchy {
        parent_type: Option<NodeType>,
        child_id: NodeId,
        child_type: NodeType,
    },
    Unreachable {
        node_id: NodeId,
    },
}

impl fmt::Display for TreeInvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyMismatch { key, node_id } => {
                write!(f, "node {node_id} stored under key {key}")
            }
            Self::MissingParent { node_id, parent_id } => {
                write!(f, "node {node_id} references missing parent {parent_id}")
            }
            Self::ChildNotListed {
                parent_id,
                child_id,
            } => write!(f, "parent {parent_id} does not list child {child_id}"),
            Self::DuplicateChild {
                parent_id,
                child_id,
            } => write!(f, "child {child_id} listed more than once (last under {parent_id})"),
            Self::MissingChild {
                parent_id,
                child_id,
            } => write!(f, "parent {parent_id} lists missing child {child_id}"),
            Self::ChildParentMismatch {
                parent_id,
                child_id,
                actual_parent,
            } => match actual_parent {
                Some(actual) => write!(
                    f,
                    "parent {parent_id} lists child {child_id} whose parent is {actual}"
                ),
                None => write!(
                    f,
                    "parent {parent_id} lists child {child_id} which has no parent"
                ),
            },
            Self::RootMissing { root_id } => write!(f, "root {root_id} not found"),
            Self::RootHasParent { root_id } => write!(f, "root {root_id} has a parent"),
            Self::NodesWithoutRoot { count } => {
                write!(f, "{count} node(s) present but no root is set")
            }
            Self::ExtraParentlessNode { node_id } => {
                write!(f, "non-root node {node_id} has no parent")
            }
            Self::IllegalHierarchy {
                parent_type,
                child_id,
                child_type,
            } => match parent_type {
                Some(parent_type) => write!(
                    f,
                    "{child_type} {child_id} cannot be a child of a {parent_type}"
                ),
                None => write!(f, "{child_type} {child_id} cannot be the document root"),
            },
            Self::Unreachable { node_id } => {
                write!(f, "node {node_id} is not reachable from the root")
            }
        }
    }
}

impl std::error::Error for TreeInvariantError {}

/// Error loading a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    DuplicateNodeId { node_id: NodeId },
    Invariant(TreeInvariantError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::Invariant(err) => write!(f, "invalid tree: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DuplicateNodeId { .. } => None,
            Self::Invariant(err) => Some(err),
        }
    }
}

/// Canonical serial form of a tree: nodes sorted by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    pub root_id: Option<NodeId>,
    pub nodes: Vec<Node>,
}

impl TreeSnapshot {
    /// Sort nodes by id.
    pub fn canonicalize(&mut self) {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

/// The document: a root id plus a flat id → node map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorTree {
    root_id: Option<NodeId>,
    nodes: OrdMap<NodeId, Node>,
}

impl EditorTree {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a snapshot, rejecting anything that breaks an invariant.
    pub fn from_snapshot(mut snapshot: TreeSnapshot) -> Result<Self, SnapshotError> {
        snapshot.canonicalize();
        let mut nodes = OrdMap::new();
        for node in snapshot.nodes {
            let node_id = node.id.clone();
            if nodes.insert(node_id.clone(), node).is_some() {
                return Err(SnapshotError::DuplicateNodeId { node_id });
            }
        }
        let tree = Self {
            root_id: snapshot.root_id,
            nodes,
        };
        tree.validate().map_err(SnapshotError::Invariant)?;
        Ok(tree)
    }

    /// Export to canonical snapshot form.
    #[must_use]
    pub fn to_snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            root_id: self.root_id.clone(),
            nodes: self.nodes.values().cloned().collect(),
        }
    }

    #[must_use]
    pub fn root_id(&self) -> Option<&NodeId> {
        self.root_id.as_ref()
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root_id.as_ref().and_then(|id| self.nodes.get(id))
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Ordered child ids; empty for unknown ids and leaves.
    #[must_use]
    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children_ids.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, id: &NodeId) -> Option<&Node> {
        self.nodes
            .get(id)
            .and_then(|node| node.parent_id.as_ref())
            .and_then(|parent_id| self.nodes.get(parent_id))
    }

    /// Ancestor ids from the direct parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(id).and_then(|node| node.parent_id.clone());
        while let Some(parent_id) = cursor {
            if out.len() > self.nodes.len() || out.contains(&parent_id) {
                break;
            }
            cursor = self
                .nodes
                .get(&parent_id)
                .and_then(|node| node.parent_id.clone());
            out.push(parent_id);
        }
        out
    }

    /// The subtree rooted at `id` in depth-first pre-order, `id` first.
    ///
    /// Empty when `id` is unknown.
    #[must_use]
    pub fn subtree(&self, id: &NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children_ids.iter().rev().cloned());
            }
            out.push(next);
        }
        out
    }

    /// Every descendant of `id` (excluding `id`), depth-first.
    #[must_use]
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut subtree = self.subtree(id);
        if !subtree.is_empty() {
            subtree.remove(0);
        }
        subtree
    }

    /// Whole document in depth-first pre-order.
    #[must_use]
    pub fn depth_first(&self) -> Vec<NodeId> {
        self.root_id
            .as_ref()
            .map(|root| self.subtree(root))
            .unwrap_or_default()
    }

    /// Ancestor chain of `id` (inclusive) as a [`PathState`].
    #[must_use]
    pub fn path_to(&self, id: &NodeId) -> PathState {
        let mut path = PathState::default();
        let Some(node) = self.nodes.get(id) else {
            return path;
        };
        path.set_slot(node.node_type, Some(node.id.clone()));
        for ancestor_id in self.ancestors(id) {
            if let Some(ancestor) = self.nodes.get(&ancestor_id) {
                path.set_slot(ancestor.node_type, Some(ancestor_id));
            }
        }
        path
    }

    /// First invariant violation, if any.
    pub fn validate(&self) -> Result<(), TreeInvariantError> {
        match self.invariant_report().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    /// Every invariant violation, in a deterministic order.
    #[must_use]
    pub fn invariant_report(&self) -> Vec<TreeInvariantError> {
        let mut issues = Vec::new();

        for (key, node) in self.nodes.iter() {
            if *key != node.id {
                issues.push(TreeInvariantError::KeyMismatch {
                    key: key.clone(),
                    node_id: node.id.clone(),
                });
            }
        }

        match &self.root_id {
            None if !self.nodes.is_empty() => {
                issues.push(TreeInvariantError::NodesWithoutRoot {
                    count: self.nodes.len(),
                });
            }
            None => {}
            Some(root_id) => match self.nodes.get(root_id) {
                None => issues.push(TreeInvariantError::RootMissing {
                    root_id: root_id.clone(),
                }),
                Some(root) => {
                    if root.parent_id.is_some() {
                        issues.push(TreeInvariantError::RootHasParent {
                            root_id: root_id.clone(),
                        });
                    }
                    if !is_legal_child(None, root.node_type) {
                        issues.push(TreeInvariantError::IllegalHierarchy {
                            parent_type: None,
                            child_id: root_id.clone(),
                            child_type: root.node_type,
                        });
                    }
                }
            },
        }

        let listings: BTreeSet<(&NodeId, &NodeId)> = self
            .nodes
            .values()
            .flat_map(|node| node.children_ids.iter().map(move |child| (&node.id, child)))
            .collect();

        for node in self.nodes.values() {
            match &node.parent_id {
                None => {
                    if self.root_id.as_ref() != Some(&node.id) {
                        issues.push(TreeInvariantError::ExtraParentlessNode {
                            node_id: node.id.clone(),
                        });
                    }
                }
                Some(parent_id) => match self.nodes.get(parent_id) {
                    None => issues.push(TreeInvariantError::MissingParent {
                        node_id: node.id.clone(),
                        parent_id: parent_id.clone(),
                    }),
                    Some(parent) => {
                        if !listings.contains(&(&parent.id, &node.id)) {
                            issues.push(TreeInvariantError::ChildNotListed {
                                parent_id: parent_id.clone(),
                                child_id: node.id.clone(),
                            });
                        }
                        if !is_legal_child(Some(parent.node_type), node.node_type) {
                            issues.push(TreeInvariantError::IllegalHierarchy {
                                parent_type: Some(parent.node_type),
                                child_id: node.id.clone(),
                                child_type: node.node_type,
                            });
                        }
                    }
                },
            }

            for child_id in &node.children_ids {
                match self.nodes.get(child_id) {
                    None => issues.push(TreeInvariantError::MissingChild {
                        parent_id: node.id.clone(),
                        child_id: child_id.clone(),
                    }),
                    Some(child) if child.parent_id.as_ref() != Some(&node.id) => {
                        issues.push(TreeInvariantError::ChildParentMismatch {
                            parent_id: node.id.clone(),
                            child_id: child_id.clone(),
                            actual_parent: child.parent_id.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        // Reachability: each node exactly once from the root. Ids are marked
        // when pushed, so a second listing anywhere is caught on sight.
        let mut seen = BTreeSet::new();
        if let Some(root_id) = &self.root_id {
            seen.insert(root_id.clone());
            let mut stack = vec![root_id.clone()];
            while let Some(next) = stack.pop() {
                let Some(node) = self.nodes.get(&next) else {
                    continue;
                };
                for child_id in &node.children_ids {
                    if seen.insert(child_id.clone()) {
                        stack.push(child_id.clone());
                    } else {
                        issues.push(TreeInvariantError::DuplicateChild {
                            parent_id: next.clone(),
                            child_id: child_id.clone(),
                        });
                    }
                }
            }
        }
        for id in self.nodes.keys() {
            if !seen.contains(id) {
                issues.push(TreeInvariantError::Unreachable {
                    node_id: id.clone(),
                });
            }
        }

        issues
    }

    /// Deterministic structural hash (FNV-1a) for logs and diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                *hash ^= u64::from(*byte);
                *hash = hash.wrapping_mul(PRIME);
            }
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_bytes(hash, &(value.len() as u64).to_le_bytes());
            mix_bytes(hash, value.as_bytes());
        }

        fn mix_opt(hash: &mut u64, value: Option<&NodeId>) {
            match value {
                Some(id) => {
                    mix_bytes(hash, &[1]);
                    mix_str(hash, id.as_str());
                }
                None => mix_bytes(hash, &[0]),
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_opt(&mut hash, self.root_id.as_ref());
        for node in self.nodes.values() {
            mix_str(&mut hash, node.id.as_str());
            mix_str(&mut hash, node.node_type.as_str());
            mix_opt(&mut hash, node.parent_id.as_ref());
            mix_bytes(&mut hash, &(node.children_ids.len() as u64).to_le_bytes());
            for child in &node.children_ids {
                mix_str(&mut hash, child.as_str());
            }
            for (key, value) in &node.props {
                mix_str(&mut hash, key);
                mix_str(&mut hash, &value.to_string());
            }
        }
        hash
    }

    pub(crate) fn set_root(&mut self, root_id: Option<NodeId>) {
        self.root_id = root_id;
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn insert_raw(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub(crate) fn remove_raw(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }
}
