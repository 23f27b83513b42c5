//! Pairing Heap implementation
//!
//! A pairing heap is a type of heap-ordered tree with:
//! - O(1) insert and merge
//! - O(log n) amortized extract_min and delete
//! - o(log n) amortized decrease_key (in fact, better than log n)
//!
//! The pairing heap is simpler than Fibonacci heaps while still providing
//! excellent amortized performance for decrease_key operations. There is a
//! single tree; its root is the minimum. Insert and merge meld a tree with the
//! root, and extract_min combines the root's children with the classic
//! two-pass pairing: meld neighbours left to right, then fold the results
//! right to left.
//!
//! Children of a node are kept in an index ring in the node's [`Arena`], the
//! same representation the Fibonacci heap uses, with the most recently
//! melded child first.

use crate::arena::{Arena, NodeKey, Siblings};
use crate::invariants::InvariantViolation;
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use index_ring as ring;
use log::debug;
use std::fmt;

/// Handle to an element in a Pairing heap
///
/// Like [`FibonacciHandle`](crate::fibonacci::FibonacciHandle), the handle
/// names its node's arena segment, follows the element through merges and
/// is rejected once the element is gone.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PairingHandle {
    node: NodeKey,
}

impl Handle for PairingHandle {}

struct Node<T, P> {
    item: T,
    priority: P,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
}

impl<T, P> Siblings for Node<T, P> {
    fn left(&self) -> NodeKey {
        self.left
    }
    fn right(&self) -> NodeKey {
        self.right
    }
    fn set_left(&mut self, left: NodeKey) {
        self.left = left;
    }
    fn set_right(&mut self, right: NodeKey) {
        self.right = right;
    }
}

/// Pairing Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::pairing::PairingHeap;
///
/// let mut heap = PairingHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Some((&1, &"item")));
/// ```
pub struct PairingHeap<T, P: Ord> {
    arena: Arena<Node<T, P>>,
    root: Option<NodeKey>,
}

impl<T, P: Ord> PairingHeap<T, P> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn insert(&mut self, priority: P, item: T) -> PairingHandle {
        let node = self.arena.insert_with_key(|key| Node {
            item,
            priority,
            parent: None,
            child: None,
            left: key,
            right: key,
        });
        self.meld_into_root(node);
        self.verify();
        PairingHandle { node }
    }

    pub fn find_min(&self) -> Option<(&P, &T)> {
        self.root.map(|key| {
            let node = &self.arena[key];
            (&node.priority, &node.item)
        })
    }

    pub fn extract_min(&mut self) -> Option<(P, T)> {
        let root = self.root?;
        self.root = self.combine_children(root);
        let node = self.arena.remove(root)?;
        self.verify();
        Some((node.priority, node.item))
    }

    /// Moves every element of `other` into this heap in O(1). Handles issued
    /// by `other` keep working on `self`.
    pub fn merge(&mut self, other: Self) {
        let Some(other_root) = other.root else {
            return;
        };
        let moved = other.arena.len();
        self.arena.append(other.arena);
        self.meld_into_root(other_root);
        debug!("merged {moved} nodes into pairing heap of {}", self.len());
        self.verify();
    }

    /// Lowers the priority of the element behind `handle`
    ///
    /// A node that now beats its parent is cut out with its subtree and
    /// melded with the root.
    pub fn decrease_key(&mut self, handle: &PairingHandle, new_priority: P) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;
        if new_priority > self.arena[node].priority {
            debug!("rejected decrease_key on {node:?}: priority would increase");
            return Err(HeapError::PriorityNotDecreased);
        }
        self.arena[node].priority = new_priority;

        if let Some(parent) = self.arena[node].parent {
            if self.arena[node].priority < self.arena[parent].priority {
                self.detach(node);
                self.meld_into_root(node);
            }
        }
        self.verify();
        Ok(())
    }

    /// Removes the element behind `handle` and returns it
    pub fn delete(&mut self, handle: &PairingHandle) -> Result<(P, T), HeapError> {
        let node = self.resolve(handle)?;
        self.unlink(node);
        let removed = self.arena.remove(node).ok_or(HeapError::InvalidHandle)?;
        self.verify();
        Ok((removed.priority, removed.item))
    }

    /// Sets the priority of the element behind `handle` to any value,
    /// keeping the handle valid
    pub fn update(&mut self, handle: &PairingHandle, new_priority: P) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;
        if new_priority <= self.arena[node].priority {
            return self.decrease_key(handle, new_priority);
        }
        self.unlink(node);
        self.arena[node].priority = new_priority;
        self.meld_into_root(node);
        self.verify();
        Ok(())
    }

    pub fn get(&self, handle: &PairingHandle) -> Result<(&P, &T), HeapError> {
        let node = &self.arena[self.resolve(handle)?];
        Ok((&node.priority, &node.item))
    }

    pub fn contains(&self, handle: &PairingHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Iterates over all elements in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> {
        self.arena.values().map(|node| (&node.priority, &node.item))
    }

    /// Checks heap order, ring closure, parent links and the element count
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let stored = self.arena.len();
        let Some(root) = self.root else {
            return if stored == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::Count { reachable: 0, stored })
            };
        };
        match self.arena.get(root) {
            Some(node) if node.parent.is_none() && ring::is_singleton(&self.arena, root) => {}
            _ => return Err(InvariantViolation::MinNotRoot),
        }

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            reachable += 1;
            if reachable > stored {
                return Err(InvariantViolation::Count { reachable, stored });
            }
            let node = &self.arena[key];
            let Some(first) = node.child else {
                continue;
            };
            ring::check(&self.arena, first, stored)?;
            for child in ring::iter(&self.arena, first) {
                let child_node = &self.arena[child];
                if child_node.parent != Some(key) {
                    return Err(InvariantViolation::ParentLink { node: child });
                }
                if child_node.priority < node.priority {
                    return Err(InvariantViolation::HeapOrder { node: child });
                }
                stack.push(child);
            }
        }
        if reachable != stored {
            return Err(InvariantViolation::Count { reachable, stored });
        }
        Ok(())
    }

    #[inline]
    fn verify(&self) {
        #[cfg(any(test, feature = "verify"))]
        if let Err(violation) = self.validate() {
            panic!("pairing heap invariant violated: {violation}");
        }
    }

    #[inline]
    fn resolve(&self, handle: &PairingHandle) -> Result<NodeKey, HeapError> {
        self.arena.resolve(handle.node)
    }

    /// Melds two singleton roots; the larger becomes the first child of the
    /// smaller. Returns the surviving root.
    fn meld(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (parent, child) = if self.arena[b].priority < self.arena[a].priority {
            (b, a)
        } else {
            (a, b)
        };
        let first = self.arena[parent].child;
        ring::splice(&mut self.arena, Some(child), first);
        self.arena[parent].child = Some(child);
        self.arena[child].parent = Some(parent);
        parent
    }

    fn meld_into_root(&mut self, node: NodeKey) {
        self.root = Some(match self.root {
            None => node,
            Some(root) => self.meld(root, node),
        });
    }

    /// Cuts `node` and its subtree out of its parent's child ring.
    fn detach(&mut self, node: NodeKey) {
        let Some(parent) = self.arena[node].parent.take() else {
            return;
        };
        let rest = ring::remove(&mut self.arena, node);
        if self.arena[parent].child == Some(node) {
            self.arena[parent].child = rest;
        }
    }

    /// Takes `node` out of the tree, leaving it a childless singleton whose
    /// slot is still allocated. Its children are paired up and put back.
    fn unlink(&mut self, node: NodeKey) {
        self.detach(node);
        let subtree = self.combine_children(node);
        if self.root == Some(node) {
            self.root = subtree;
        } else if let Some(subtree) = subtree {
            self.meld_into_root(subtree);
        }
    }

    /// Two-pass pairing of the children of `node` into a single tree.
    fn combine_children(&mut self, node: NodeKey) -> Option<NodeKey> {
        let first = self.arena[node].child.take()?;
        let children: Vec<NodeKey> = ring::iter(&self.arena, first).collect();
        for &child in &children {
            ring::make_circular(&mut self.arena, child);
            self.arena[child].parent = None;
        }

        let mut pairs = Vec::with_capacity(children.len() / 2 + 1);
        let mut trees = children.into_iter();
        while let Some(a) = trees.next() {
            pairs.push(match trees.next() {
                Some(b) => self.meld(a, b),
                None => a,
            });
        }

        let mut result = pairs.pop()?;
        while let Some(pair) = pairs.pop() {
            result = self.meld(pair, result);
        }
        Some(result)
    }
}

impl<T, P: Ord> Default for PairingHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, P: Ord + fmt::Debug> fmt::Debug for PairingHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("len", &self.len())
            .field("min", &self.find_min())
            .finish()
    }
}

impl<T, P: Ord> FromIterator<(P, T)> for PairingHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord> Extend<(P, T)> for PairingHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.insert(priority, item);
        }
    }
}

impl<T, P: Ord> Heap<T, P> for PairingHeap<T, P> {
    fn new() -> Self {
        Self::with_capacity(0)
    }

    fn is_empty(&self) -> bool {
        PairingHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        PairingHeap::len(self)
    }

    fn push(&mut self, priority: P, item: T) {
        self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.find_min()
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.extract_min()
    }

    fn merge(&mut self, other: Self) {
        PairingHeap::merge(self, other)
    }

    fn clear(&mut self) {
        PairingHeap::clear(self)
    }
}

impl<T, P: Ord> DecreaseKeyHeap<T, P> for PairingHeap<T, P> {
    type Handle = PairingHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        PairingHeap::decrease_key(self, handle, new_priority)
    }

    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError> {
        PairingHeap::delete(self, handle)
    }

    fn update(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        PairingHeap::update(self, handle, new_priority)
    }

    fn get(&self, handle: &Self::Handle) -> Result<(&P, &T), HeapError> {
        PairingHeap::get(self, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T, P: Ord>(heap: &mut PairingHeap<T, P>) -> Vec<P> {
        std::iter::from_fn(|| heap.extract_min().map(|(p, _)| p)).collect()
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = PairingHeap::new();
        assert!(heap.is_empty());

        let _h1 = heap.insert(5, "a");
        let _h2 = heap.insert(3, "b");
        let _h3 = heap.insert(7, "c");

        assert_eq!(heap.find_min(), Some((&3, &"b")));

        let min = heap.extract_min();
        assert_eq!(min, Some((3, "b")));
        assert_eq!(heap.find_min(), Some((&5, &"a")));
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = PairingHeap::new();
        let h1 = heap.insert(10, "a");
        let _h2 = heap.insert(20, "b");
        let h3 = heap.insert(30, "c");

        assert_eq!(heap.find_min(), Some((&10, &"a")));

        heap.decrease_key(&h1, 5).unwrap();
        assert_eq!(heap.find_min(), Some((&5, &"a")));

        heap.decrease_key(&h3, 1).unwrap();
        assert_eq!(heap.find_min(), Some((&1, &"c")));
        assert_eq!(heap.decrease_key(&h3, 2), Err(HeapError::PriorityNotDecreased));
    }

    #[test]
    fn test_merge() {
        let mut heap1 = PairingHeap::new();
        heap1.insert(5, "a");
        heap1.insert(10, "b");

        let mut heap2 = PairingHeap::new();
        heap2.insert(3, "c");
        heap2.insert(7, "d");

        heap1.merge(heap2);
        assert_eq!(heap1.find_min(), Some((&3, &"c")));
        assert_eq!(drain(&mut heap1), vec![3, 5, 7, 10]);
    }

    #[test]
    fn test_delete_root_and_interior() {
        let mut heap = PairingHeap::new();
        let handles: Vec<_> = (0..20).map(|p| heap.insert(p, ())).collect();
        heap.extract_min();

        assert_eq!(heap.delete(&handles[1]), Ok((1, ())));
        assert_eq!(heap.delete(&handles[13]), Ok((13, ())));
        assert_eq!(heap.delete(&handles[13]), Err(HeapError::InvalidHandle));

        let expected: Vec<i32> = (2..20).filter(|&p| p != 13).collect();
        assert_eq!(drain(&mut heap), expected);
    }

    #[test]
    fn test_update_both_directions() {
        let mut heap = PairingHeap::new();
        let handles: Vec<_> = (0..8).map(|p| heap.insert(p, p)).collect();
        heap.extract_min();

        heap.update(&handles[1], 50).unwrap();
        assert_eq!(heap.find_min(), Some((&2, &2)));
        heap.update(&handles[7], -1).unwrap();
        assert_eq!(heap.find_min(), Some((&-1, &7)));
        assert_eq!(drain(&mut heap), vec![-1, 2, 3, 4, 5, 6, 50]);
    }

    #[test]
    fn test_handles_from_other_heap() {
        let mut heap1 = PairingHeap::new();
        let mut heap2: PairingHeap<(), i32> = PairingHeap::new();
        let h = heap1.insert(1, ());
        let g = heap1.insert(3, ());
        heap2.insert(2, ());
        assert_eq!(heap2.get(&h), Err(HeapError::InvalidHandle));

        heap2.merge(heap1);
        assert_eq!(heap2.len(), 3);
        assert_eq!(heap2.get(&h), Ok((&1, &())));
        assert_eq!(heap2.delete(&h), Ok((1, ())));
        heap2.decrease_key(&g, 0).unwrap();
        assert_eq!(drain(&mut heap2), vec![0, 2]);
        assert_eq!(heap2.get(&g), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_merge_chain_keeps_every_handle() {
        let mut acc = PairingHeap::new();
        let mut handles = Vec::new();
        for p in 0..40 {
            let mut single = PairingHeap::new();
            handles.push(single.insert(100 + p, p));
            single.merge(acc);
            acc = single;
        }
        assert_eq!(acc.len(), 40);
        assert_eq!(acc.arena.segment_count(), 40);

        for (p, handle) in handles.iter().enumerate().rev() {
            acc.decrease_key(handle, p as i32).unwrap();
        }
        assert_eq!(acc.extract_min(), Some((0, 0)));
        assert_eq!(acc.delete(&handles[39]), Ok((39, 39)));
        assert_eq!(drain(&mut acc), (1..39).collect::<Vec<_>>());
        assert_eq!(acc.arena.segment_count(), 1);
    }
}
