//! Tree-node capability and the in-memory realization.
//!
//! Trees never hold parent pointers: nodes own (or reference) only their
//! children, and all structure changes happen through recursive descent.
//! The child setters maintain the cached height invariant
//! `height = 1 + max(height(left), height(right))` with absent children
//! counting as −1, so rotations and removals can rely on heights being
//! current after every pointer change.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;

/// A value that can live in a search tree.
///
/// `Display`/`FromStr` give disk-backed nodes their stable string keys;
/// [`distance`](TreeValue::distance) drives closest-value lookups.
pub trait TreeValue: Clone + Ord + Default + Display + FromStr + Send + 'static {
    /// The ordered magnitude of the gap between two values.
    type Distance: Ord;

    /// How far apart two values are; symmetric.
    fn distance(&self, other: &Self) -> Self::Distance;
}

macro_rules! impl_tree_value_for_int {
    ($($int:ty => $dist:ty),* $(,)?) => {
        $(
            impl TreeValue for $int {
                type Distance = $dist;

                fn distance(&self, other: &Self) -> Self::Distance {
                    self.abs_diff(*other)
                }
            }
        )*
    };
}

impl_tree_value_for_int!(
    i32 => u32,
    i64 => u64,
    u32 => u32,
    u64 => u64,
);

/// Shared handle to a tree node of any storage strategy.
pub type NodeRef<T> = Arc<Mutex<dyn TreeNode<T>>>;

/// The node capability: data, cached height, and two children.
pub trait TreeNode<T: TreeValue>: Send {
    /// The node's value.
    fn data(&self) -> T;

    /// Replace the node's value.
    fn set_data(&mut self, data: T);

    /// The node's cached height (leaves are 0).
    fn height(&self) -> i64;

    /// Overwrite the cached height.
    fn set_height(&mut self, height: i64);

    /// The left child, if any.
    fn left(&self) -> Option<NodeRef<T>>;

    /// The right child, if any.
    fn right(&self) -> Option<NodeRef<T>>;

    /// Replace the left child, recomputing this node's height.
    fn set_left(&mut self, child: Option<NodeRef<T>>);

    /// Replace the right child, recomputing this node's height.
    fn set_right(&mut self, child: Option<NodeRef<T>>);

    /// Release any backing storage held for this node.
    fn discard(&mut self) {}
}

/// Height of an optional child (−1 when absent).
pub fn child_height<T: TreeValue>(child: &Option<NodeRef<T>>) -> i64 {
    child.as_ref().map_or(-1, |node| node.lock().height())
}

/// A tree node owning its children inline.
pub struct MemoryNode<T: TreeValue> {
    data: T,
    height: i64,
    left: Option<NodeRef<T>>,
    right: Option<NodeRef<T>>,
}

impl<T: TreeValue> MemoryNode<T> {
    /// Create an empty node awaiting data.
    pub fn new() -> Self {
        Self {
            data: T::default(),
            height: 0,
            left: None,
            right: None,
        }
    }
}

impl<T: TreeValue> Default for MemoryNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeValue> TreeNode<T> for MemoryNode<T> {
    fn data(&self) -> T {
        self.data.clone()
    }

    fn set_data(&mut self, data: T) {
        self.data = data;
    }

    fn height(&self) -> i64 {
        self.height
    }

    fn set_height(&mut self, height: i64) {
        self.height = height;
    }

    fn left(&self) -> Option<NodeRef<T>> {
        self.left.clone()
    }

    fn right(&self) -> Option<NodeRef<T>> {
        self.right.clone()
    }

    fn set_left(&mut self, child: Option<NodeRef<T>>) {
        self.height = 1 + child_height(&child).max(child_height(&self.right));
        self.left = child;
    }

    fn set_right(&mut self, child: Option<NodeRef<T>>) {
        self.height = 1 + child_height(&child).max(child_height(&self.left));
        self.right = child;
    }
}

/// Creates the nodes a tree grows through, fixing the storage strategy.
pub trait NodeAllocator<T: TreeValue>: Send {
    /// Allocate a fresh, empty node.
    fn allocate(&self) -> NodeRef<T>;
}

/// The default allocator: plain in-memory nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryNodeAllocator;

impl<T: TreeValue> NodeAllocator<T> for MemoryNodeAllocator {
    fn allocate(&self) -> NodeRef<T> {
        Arc::new(Mutex::new(MemoryNode::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: i64) -> NodeRef<i64> {
        let node: NodeRef<i64> = Arc::new(Mutex::new(MemoryNode::new()));
        node.lock().set_data(value);
        node
    }

    #[test]
    fn test_height_maintenance_on_child_assignment() {
        let root = leaf(10);
        assert_eq!(root.lock().height(), 0);

        root.lock().set_left(Some(leaf(5)));
        assert_eq!(root.lock().height(), 1);

        let tall_right = leaf(20);
        tall_right.lock().set_right(Some(leaf(30)));
        root.lock().set_right(Some(tall_right));
        assert_eq!(root.lock().height(), 2);

        // Detaching the taller side shrinks the height again.
        root.lock().set_right(None);
        assert_eq!(root.lock().height(), 1);
        root.lock().set_left(None);
        assert_eq!(root.lock().height(), 0);
    }

    #[test]
    fn test_int_distance() {
        assert_eq!(7i64.distance(&3), 4);
        assert_eq!(3i64.distance(&7), 4);
        assert_eq!((-5i64).distance(&5), 10);
        assert_eq!(5u32.distance(&5), 0);
    }
}
