//! AVL tree: the search tree with rotation-based rebalancing.
//!
//! [`AvlBalance`] is a [`BalancePolicy`] that restores
//! `|height(left) − height(right)| ≤ 1` at every node an insert or
//! removal unwound through, classifying the imbalance as LL/RR/LR/RL by
//! grandchild heights and applying the matching single or double
//! rotation. Rotations only move child pointers; the height-maintaining
//! setters keep the cached heights correct.

use std::ops::{Deref, DerefMut};

use super::bst::{BalancePolicy, BinarySearchTree};
use super::node::{child_height, NodeRef, TreeNode, TreeValue};

/// The AVL rebalancing policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct AvlBalance;

impl<T: TreeValue> BalancePolicy<T> for AvlBalance {
    fn post_insert(&self, node: NodeRef<T>) -> NodeRef<T> {
        balance(node)
    }

    fn post_remove(&self, node: NodeRef<T>) -> NodeRef<T> {
        balance(node)
    }
}

fn balance<T: TreeValue>(node: NodeRef<T>) -> NodeRef<T> {
    let (left, right) = {
        let guard = node.lock();
        (guard.left(), guard.right())
    };
    let left_height = child_height(&left);
    let right_height = child_height(&right);
    if (left_height - right_height).abs() <= 1 {
        return node;
    }

    if left_height > right_height {
        let heavy = left.expect("left-heavy node must have a left child");
        let (inner_left, inner_right) = {
            let guard = heavy.lock();
            (guard.left(), guard.right())
        };
        if child_height(&inner_left) >= child_height(&inner_right) {
            rotate_right(node)
        } else {
            let new_left = rotate_left(heavy);
            node.lock().set_left(Some(new_left));
            rotate_right(node)
        }
    } else {
        let heavy = right.expect("right-heavy node must have a right child");
        let (inner_left, inner_right) = {
            let guard = heavy.lock();
            (guard.left(), guard.right())
        };
        if child_height(&inner_right) >= child_height(&inner_left) {
            rotate_left(node)
        } else {
            let new_right = rotate_right(heavy);
            node.lock().set_right(Some(new_right));
            rotate_left(node)
        }
    }
}

fn rotate_left<T: TreeValue>(node: NodeRef<T>) -> NodeRef<T> {
    let pivot = node
        .lock()
        .right()
        .expect("left rotation requires a right child");
    let transfer = pivot.lock().left();
    node.lock().set_right(transfer);
    pivot.lock().set_left(Some(node));
    pivot
}

fn rotate_right<T: TreeValue>(node: NodeRef<T>) -> NodeRef<T> {
    let pivot = node
        .lock()
        .left()
        .expect("right rotation requires a left child");
    let transfer = pivot.lock().right();
    node.lock().set_left(transfer);
    pivot.lock().set_right(Some(node));
    pivot
}

/// A self-balancing ordered tree.
///
/// Exposes the full [`BinarySearchTree`] surface through `Deref`; every
/// mutation keeps the AVL invariant.
pub struct AvlTree<T: TreeValue> {
    inner: BinarySearchTree<T>,
}

impl<T: TreeValue> AvlTree<T> {
    /// Create an empty AVL tree over in-memory nodes.
    pub fn new() -> Self {
        Self {
            inner: BinarySearchTree::with_policy(Box::new(AvlBalance)),
        }
    }
}

impl<T: TreeValue> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeValue> Deref for AvlTree<T> {
    type Target = BinarySearchTree<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: TreeValue> DerefMut for AvlTree<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
