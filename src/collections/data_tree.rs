//! Append-only versioned DAG.
//!
//! A [`DataTree`] maps content hashes to nodes carrying a value, a parent
//! hash, a leaf flag, and a timestamp. The head hash is a virtual root:
//! top-level nodes name it as their parent. Invariants maintained across
//! every mutation: a node's parent is the head hash or present in the
//! map, hashes never collide, and `is_leaf` is true exactly when no node
//! names this one as its parent.
//!
//! Nodes are kept in hash order, so sibling and child listings are
//! deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::crypto::hash;

/// One versioned entry in the DAG.
#[derive(Debug, Clone)]
pub struct DagNode<T> {
    /// The stored value.
    pub data: T,
    /// Whether no other node names this one as its parent.
    pub is_leaf: bool,
    /// This node's content hash (its identity in the tree).
    pub hash: String,
    /// The parent's hash, or the head hash for top-level nodes.
    pub parent_hash: String,
    /// When the node was appended.
    pub timestamp: DateTime<Utc>,
}

/// An append-only parent/child version tree with timestamps.
pub struct DataTree<T> {
    head_hash: String,
    nodes: BTreeMap<String, DagNode<T>>,
}

impl<T> Default for DataTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DataTree<T> {
    /// Create a tree with a random head hash.
    pub fn new() -> Self {
        Self {
            head_hash: hash::random_sha256(false),
            nodes: BTreeMap::new(),
        }
    }

    /// Create a tree with an explicit head hash (e.g. when rebuilding a
    /// tree that other records already reference).
    pub fn with_head(head_hash: &str) -> Self {
        Self {
            head_hash: head_hash.to_string(),
            nodes: BTreeMap::new(),
        }
    }

    /// The head hash: the parent to use for top-level insertions.
    pub fn head_hash(&self) -> &str {
        &self.head_hash
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a value under `parent_hash`.
    ///
    /// Without `item_hash`, a fresh random hash is drawn. Returns the
    /// inserted node's hash, or `None` when the parent is unknown or the
    /// hash collides with an existing node.
    pub fn insert(&mut self, data: T, parent_hash: &str, item_hash: Option<&str>) -> Option<String> {
        let hash = match item_hash {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => hash::random_sha256(false),
        };
        let node = DagNode {
            data,
            is_leaf: true,
            hash: hash.clone(),
            parent_hash: parent_hash.to_string(),
            timestamp: Utc::now(),
        };
        if self.insert_node(node) {
            Some(hash)
        } else {
            None
        }
    }

    /// Append a caller-built node (explicit hash and timestamp).
    ///
    /// Returns `false` when the parent is unknown or the hash collides.
    pub fn insert_node(&mut self, node: DagNode<T>) -> bool {
        let parent_known = self.nodes.contains_key(&node.parent_hash);
        if !parent_known && node.parent_hash != self.head_hash {
            return false;
        }
        if self.nodes.contains_key(&node.hash) {
            return false;
        }

        let parent_hash = node.parent_hash.clone();
        self.nodes.insert(node.hash.clone(), node);
        if let Some(parent) = self.nodes.get_mut(&parent_hash) {
            parent.is_leaf = false;
        }
        true
    }

    /// The node stored under `hash`.
    pub fn get(&self, hash: &str) -> Option<&DagNode<T>> {
        self.nodes.get(hash)
    }

    /// Whether a node with this hash exists.
    pub fn contains(&self, hash: &str) -> bool {
        self.nodes.contains_key(hash)
    }

    /// Whether the node under `hash` is currently a leaf.
    pub fn is_leaf(&self, hash: &str) -> bool {
        self.nodes.get(hash).map_or(false, |node| node.is_leaf)
    }

    /// The parent hash of the node under `hash`.
    pub fn parent_of(&self, hash: &str) -> Option<String> {
        self.nodes.get(hash).map(|node| node.parent_hash.clone())
    }

    /// All nodes whose parent is `parent_hash`, in hash order; with
    /// `recursive`, their descendants follow.
    pub fn children_of(&self, parent_hash: &str, recursive: bool) -> Vec<&DagNode<T>> {
        let mut children: Vec<&DagNode<T>> = self
            .nodes
            .values()
            .filter(|node| node.parent_hash == parent_hash)
            .collect();
        if recursive {
            let direct: Vec<String> = children.iter().map(|node| node.hash.clone()).collect();
            for hash in direct {
                children.extend(self.children_of(&hash, true));
            }
        }
        children
    }

    /// Hashes of the node's siblings (same parent, excluding itself).
    pub fn siblings_of(&self, hash: &str) -> Vec<String> {
        match self.parent_of(hash) {
            Some(parent_hash) => self
                .children_of(&parent_hash, false)
                .into_iter()
                .filter(|node| node.hash != hash)
                .map(|node| node.hash.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// All current leaves, in hash order.
    pub fn leaves(&self) -> Vec<&DagNode<T>> {
        self.nodes.values().filter(|node| node.is_leaf).collect()
    }

    /// Every node in the tree, in hash order. The full tree can be
    /// reconstructed from this listing since each node carries its parent.
    pub fn items(&self) -> Vec<&DagNode<T>> {
        self.nodes.values().collect()
    }

    /// Delete the node under `hash`.
    ///
    /// With `delete_children`, the whole subtree goes; otherwise the
    /// children are re-parented to the deleted node's parent (children of
    /// a deleted top-level node become top-level themselves). The former
    /// parent's leaf flag is re-derived afterwards.
    pub fn remove(&mut self, hash: &str, delete_children: bool) {
        let Some(node) = self.nodes.get(hash) else {
            return;
        };
        let reassigned_parent = node.parent_hash.clone();

        let child_hashes: Vec<String> = self
            .nodes
            .values()
            .filter(|child| child.parent_hash == hash)
            .map(|child| child.hash.clone())
            .collect();
        for child_hash in child_hashes {
            if delete_children {
                self.remove(&child_hash, true);
            } else if let Some(child) = self.nodes.get_mut(&child_hash) {
                child.parent_hash = reassigned_parent.clone();
            }
        }

        self.nodes.remove(hash);

        if !reassigned_parent.is_empty() {
            let still_parent = self
                .nodes
                .values()
                .any(|remaining| remaining.parent_hash == reassigned_parent);
            if !still_parent {
                if let Some(parent) = self.nodes.get_mut(&reassigned_parent) {
                    parent.is_leaf = true;
                }
            }
        }
    }

    /// The deepest leaf's hash; equal depths resolve to the *oldest*
    /// timestamp. `None` on an empty tree.
    pub fn deepest(&self) -> Option<String> {
        let mut best: Option<(i64, DateTime<Utc>, String)> = None;
        for leaf in self.nodes.values().filter(|node| node.is_leaf) {
            let depth = self.depth_of(&leaf.hash);
            let candidate = (depth, leaf.timestamp, leaf.hash.clone());
            best = match best {
                None => Some(candidate),
                Some(current) => {
                    if depth > current.0 || (depth == current.0 && leaf.timestamp < current.1) {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        best.map(|(_, _, hash)| hash)
    }

    /// Root-to-node depth: 0 for a top-level node, −1 when absent.
    fn depth_of(&self, hash: &str) -> i64 {
        let Some(mut current) = self.nodes.get(hash) else {
            return -1;
        };
        let mut depth = 0i64;
        while current.parent_hash != self.head_hash {
            match self.nodes.get(&current.parent_hash) {
                Some(parent) => {
                    current = parent;
                    depth += 1;
                }
                // A dangling parent chain; treat the node as top-level.
                None => break,
            }
        }
        depth
    }
}
