//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert and find_min
//! - O(1) amortized decrease_key
//! - O(log n) amortized extract_min and delete
//! - O(1) merge: a root ring splice plus handing over the absorbed heap's arena segments
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked ring, and so are the children of every node. The
//! heap maintains a pointer to the minimum root.
//!
//! All work is deferred: insert and merge only splice rings, and the trees are
//! only consolidated (roots of equal degree linked until all degrees differ)
//! when the minimum is extracted. Decrease-key cuts a node that violates heap
//! order out to the root ring, and cascades the cut up through ancestors that
//! have already lost a child. Together these keep every tree of degree `d`
//! at least `F(d+2)` nodes large, so degrees stay O(log n).
//!
//! Nodes live in an [`Arena`] and links are arena keys, so rings are
//! index-based and every splice goes through [`index_ring`].

use crate::arena::{Arena, NodeKey, Siblings};
use crate::invariants::InvariantViolation;
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use index_ring as ring;
use log::{debug, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

/// Handle to an element in a Fibonacci heap
///
/// The handle names the arena segment its node lives in. Using it with a
/// heap that does not hold that segment, after its element was removed, or
/// after the heap was cleared is rejected with [`HeapError::InvalidHandle`].
/// Merging keeps it valid: it then addresses the element inside the heap
/// that absorbed its own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    node: NodeKey,
}

impl Handle for FibonacciHandle {}

struct Node<T, P> {
    item: T,
    priority: P,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
    degree: usize,
    marked: bool,
}

impl<T, P> Siblings for Node<T, P> {
    #[inline]
    fn left(&self) -> NodeKey {
        self.left
    }
    #[inline]
    fn right(&self) -> NodeKey {
        self.right
    }
    #[inline]
    fn set_left(&mut self, left: NodeKey) {
        self.left = left;
    }
    #[inline]
    fn set_right(&mut self, right: NodeKey) {
        self.right = right;
    }
}

/// Counters of the structural work done by a heap
///
/// Every unit here is O(1) pointer work, so the sum tracks the real cost of
/// a sequence of operations independently of wall-clock noise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkStats {
    /// Trees linked under another root during consolidation
    pub links: u64,
    /// Nodes cut from their parent (decrease_key, cascading cuts, delete)
    pub cuts: u64,
    /// Roots visited by consolidation
    pub roots_scanned: u64,
}

impl WorkStats {
    /// Total units of structural work
    pub fn total(&self) -> u64 {
        self.links + self.cuts + self.roots_scanned
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Some((&1, &"item")));
/// assert_eq!(heap.extract_min(), Some((1, "item")));
/// assert_eq!(heap.len(), 1);
/// ```
pub struct FibonacciHeap<T, P: Ord> {
    arena: Arena<Node<T, P>>,
    min: Option<NodeKey>,
    stats: WorkStats,
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` elements before the
    /// arena reallocates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            min: None,
            stats: WorkStats::default(),
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Structural work done by this heap so far
    pub fn work_stats(&self) -> WorkStats {
        self.stats
    }

    /// Inserts an element and returns a handle to it
    ///
    /// The new node becomes a singleton tree in the root ring. O(1).
    pub fn insert(&mut self, priority: P, item: T) -> FibonacciHandle {
        let node = self.arena.insert_with_key(|key| Node {
            item,
            priority,
            parent: None,
            child: None,
            left: key,
            right: key,
            degree: 0,
            marked: false,
        });
        self.add_root(node);
        self.verify();
        FibonacciHandle { node }
    }

    /// Returns the minimum priority and its item, or `None` if empty. O(1).
    pub fn find_min(&self) -> Option<(&P, &T)> {
        self.min.map(|key| {
            let node = &self.arena[key];
            (&node.priority, &node.item)
        })
    }

    /// Removes and returns the minimum, or `None` if empty
    ///
    /// Promotes the minimum's children to roots and consolidates the root
    /// ring. O(log n) amortized.
    pub fn extract_min(&mut self) -> Option<(P, T)> {
        let min = self.unlink_min()?;
        let node = self.arena.remove(min)?;
        self.verify();
        Some((node.priority, node.item))
    }

    /// Moves every element of `other` into this heap
    ///
    /// The two root rings are spliced and the cached minimum is the smaller
    /// of the two; no trees are linked until the next extraction. `other`'s
    /// nodes stay where they are, so handles it issued keep working on
    /// `self`. O(1) in the number of elements.
    pub fn merge(&mut self, other: Self) {
        let Some(other_min) = other.min else {
            return;
        };
        let moved = other.arena.len();
        self.arena.append(other.arena);

        match self.min {
            None => self.min = Some(other_min),
            Some(min) => {
                ring::splice(&mut self.arena, Some(min), Some(other_min));
                if self.arena[other_min].priority < self.arena[min].priority {
                    self.min = Some(other_min);
                }
            }
        }
        debug!(
            "merged {moved} nodes into fibonacci heap of {} ({} segments)",
            self.len(),
            self.arena.segment_count()
        );
        self.verify();
    }

    /// Lowers the priority of the element behind `handle`
    ///
    /// A node that now compares smaller than its parent is cut to the root
    /// ring; the cut then cascades up through marked ancestors. O(1) amortized.
    ///
    /// # Errors
    /// Rejects the call without touching the heap if the handle is invalid
    /// or if `new_priority` is greater than the current priority.
    pub fn decrease_key(&mut self, handle: &FibonacciHandle, new_priority: P) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;
        if new_priority > self.arena[node].priority {
            debug!("rejected decrease_key on {node:?}: priority would increase");
            return Err(HeapError::PriorityNotDecreased);
        }
        self.arena[node].priority = new_priority;

        if let Some(parent) = self.arena[node].parent {
            if self.arena[node].priority < self.arena[parent].priority {
                self.cut(node, parent);
                self.cascading_cut(parent);
            }
        }
        if let Some(min) = self.min {
            if self.arena[node].priority < self.arena[min].priority {
                self.min = Some(node);
            }
        }
        self.verify();
        Ok(())
    }

    /// Removes the element behind `handle` and returns it
    ///
    /// The node is cut to the root ring as if its priority had dropped below
    /// every other, then extracted as the minimum.
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<(P, T), HeapError> {
        let node = self.resolve(handle)?;
        self.promote_to_min(node);
        self.unlink_min();
        let removed = self.arena.remove(node).ok_or(HeapError::InvalidHandle)?;
        self.verify();
        Ok((removed.priority, removed.item))
    }

    /// Sets the priority of the element behind `handle` to any value
    ///
    /// Lowering is a [`decrease_key`](Self::decrease_key). Raising detaches the
    /// node like [`delete`](Self::delete) does, keeping its slot, and inserts it
    /// again as a new root, so the handle stays valid.
    pub fn update(&mut self, handle: &FibonacciHandle, new_priority: P) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;
        if new_priority <= self.arena[node].priority {
            return self.decrease_key(handle, new_priority);
        }
        self.promote_to_min(node);
        self.unlink_min();
        self.arena[node].priority = new_priority;
        self.add_root(node);
        self.verify();
        Ok(())
    }

    /// Returns the priority and item behind `handle`
    pub fn get(&self, handle: &FibonacciHandle) -> Result<(&P, &T), HeapError> {
        let node = &self.arena[self.resolve(handle)?];
        Ok((&node.priority, &node.item))
    }

    /// Returns true if `handle` names an element of this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Drops every element. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.min = None;
    }

    /// Iterates over all elements in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> {
        self.arena.values().map(|node| (&node.priority, &node.item))
    }

    /// Checks every structural invariant of the heap
    ///
    /// Walks all rings and trees: ring closure, parent links, heap order,
    /// degree consistency, unmarked roots, the `F(d+2)` subtree size bound,
    /// the cached minimum and the element count. O(n).
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let stored = self.arena.len();
        let Some(min) = self.min else {
            return if stored == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::Count { reachable: 0, stored })
            };
        };
        match self.arena.get(min) {
            Some(node) if node.parent.is_none() => {}
            _ => return Err(InvariantViolation::MinNotRoot),
        }
        ring::check(&self.arena, min, stored)?;

        let mut reachable = 0;
        for root in ring::iter(&self.arena, min) {
            let node = &self.arena[root];
            if node.parent.is_some() {
                return Err(InvariantViolation::ParentLink { node: root });
            }
            if node.marked {
                return Err(InvariantViolation::MarkedRoot { node: root });
            }
            if node.priority < self.arena[min].priority {
                return Err(InvariantViolation::MinNotMinimal { node: root });
            }
            reachable += self.validate_tree(root, stored)?;
            if reachable > stored {
                return Err(InvariantViolation::Count { reachable, stored });
            }
        }
        if reachable != stored {
            return Err(InvariantViolation::Count { reachable, stored });
        }
        Ok(())
    }

    /// Validates one tree and returns its size.
    fn validate_tree(&self, root: NodeKey, limit: usize) -> Result<usize, InvariantViolation> {
        let mut preorder = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            preorder.push(key);
            if preorder.len() > limit {
                return Err(InvariantViolation::Count {
                    reachable: preorder.len(),
                    stored: limit,
                });
            }
            let node = &self.arena[key];
            let Some(first) = node.child else {
                if node.degree != 0 {
                    return Err(InvariantViolation::Degree {
                        node: key,
                        stored: node.degree,
                        actual: 0,
                    });
                }
                continue;
            };
            let children = ring::check(&self.arena, first, limit)?;
            if children != node.degree {
                return Err(InvariantViolation::Degree {
                    node: key,
                    stored: node.degree,
                    actual: children,
                });
            }
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

        // Reverse preorder visits every node after all of its descendants.
        let mut sizes: FxHashMap<NodeKey, usize> = FxHashMap::default();
        for &key in preorder.iter().rev() {
            let size = sizes.get(&key).copied().unwrap_or(0) + 1;
            sizes.insert(key, size);
            let node = &self.arena[key];
            if size < fibonacci_number(node.degree + 2) {
                return Err(InvariantViolation::DegreeBound {
                    node: key,
                    degree: node.degree,
                    size,
                });
            }
            if let Some(parent) = node.parent {
                *sizes.entry(parent).or_insert(0) += size;
            }
        }
        Ok(preorder.len())
    }

    #[inline]
    fn verify(&self) {
        #[cfg(any(test, feature = "verify"))]
        if let Err(violation) = self.validate() {
            panic!("fibonacci heap invariant violated: {violation}");
        }
    }

    #[inline]
    fn resolve(&self, handle: &FibonacciHandle) -> Result<NodeKey, HeapError> {
        self.arena.resolve(handle.node)
    }

    /// Splices a singleton node into the root ring and updates the minimum.
    fn add_root(&mut self, node: NodeKey) {
        match self.min {
            None => self.min = Some(node),
            Some(min) => {
                ring::insert_before(&mut self.arena, min, node);
                if self.arena[node].priority < self.arena[min].priority {
                    self.min = Some(node);
                }
            }
        }
    }

    /// Cuts `node` to the root ring and designates it the minimum without
    /// comparing, as if its priority were below every other.
    fn promote_to_min(&mut self, node: NodeKey) {
        if let Some(parent) = self.arena[node].parent {
            self.cut(node, parent);
            self.cascading_cut(parent);
        }
        self.min = Some(node);
    }

    /// Takes the minimum root out of the structure, leaving its slot allocated.
    ///
    /// The minimum's children join the root ring, the minimum leaves it, and
    /// the remaining roots are consolidated. Returns the detached key, which
    /// is left as a childless singleton.
    fn unlink_min(&mut self) -> Option<NodeKey> {
        let min = self.min?;

        if let Some(first) = self.arena[min].child.take() {
            let mut child = first;
            loop {
                let node = &mut self.arena[child];
                node.parent = None;
                node.marked = false;
                child = node.right;
                if child == first {
                    break;
                }
            }
            ring::splice(&mut self.arena, Some(min), Some(first));
            self.arena[min].degree = 0;
        }

        match ring::remove(&mut self.arena, min) {
            None => self.min = None,
            Some(next) => self.consolidate(next),
        }
        Some(min)
    }

    /// Links roots of equal degree until every root degree is distinct, then
    /// recomputes the minimum.
    fn consolidate(&mut self, start: NodeKey) {
        let roots: Vec<NodeKey> = ring::iter(&self.arena, start).collect();
        self.stats.roots_scanned += roots.len() as u64;

        let mut by_degree: SmallVec<[Option<NodeKey>; 64]> = SmallVec::new();
        for &root in &roots {
            let mut tree = root;
            let mut degree = self.arena[tree].degree;
            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                match by_degree[degree].take() {
                    None => {
                        by_degree[degree] = Some(tree);
                        break;
                    }
                    Some(mut other) => {
                        if self.arena[other].priority < self.arena[tree].priority {
                            std::mem::swap(&mut tree, &mut other);
                        }
                        self.link(other, tree);
                        degree += 1;
                    }
                }
            }
        }

        self.min = None;
        let mut remaining = 0;
        for root in by_degree.into_iter().flatten() {
            remaining += 1;
            let smaller = match self.min {
                None => true,
                Some(min) => self.arena[root].priority < self.arena[min].priority,
            };
            if smaller {
                self.min = Some(root);
            }
        }
        trace!("consolidated {} roots into {remaining}", roots.len());
    }

    /// Makes root `child` a child of root `parent`.
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        ring::remove(&mut self.arena, child);
        let first = self.arena[parent].child;
        self.arena[parent].child = ring::splice(&mut self.arena, first, Some(child));
        self.arena[parent].degree += 1;

        let node = &mut self.arena[child];
        node.parent = Some(parent);
        node.marked = false;
        self.stats.links += 1;
    }

    /// Removes `node` from the child ring of `parent` and makes it a root.
    fn cut(&mut self, node: NodeKey, parent: NodeKey) {
        let rest = ring::remove(&mut self.arena, node);
        let parent_node = &mut self.arena[parent];
        if parent_node.child == Some(node) {
            parent_node.child = rest;
        }
        parent_node.degree -= 1;

        let cut_node = &mut self.arena[node];
        cut_node.parent = None;
        cut_node.marked = false;
        self.add_root(node);
        self.stats.cuts += 1;
        trace!("cut {node:?} from {parent:?}");
    }

    /// Walks up from `node`: marked ancestors are cut, the first unmarked
    /// non-root is marked and stops the cascade.
    fn cascading_cut(&mut self, mut node: NodeKey) {
        while let Some(parent) = self.arena[node].parent {
            if !self.arena[node].marked {
                self.arena[node].marked = true;
                return;
            }
            self.cut(node, parent);
            node = parent;
        }
    }
}

/// `F(k)` with `F(0) = 0` and `F(1) = 1`, saturating.
fn fibonacci_number(k: usize) -> usize {
    let (mut a, mut b) = (0usize, 1usize);
    for _ in 0..k {
        (a, b) = (b, a.saturating_add(b));
    }
    a
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, P: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len())
            .field("min", &self.find_min())
            .finish()
    }
}

impl<T, P: Ord> FromIterator<(P, T)> for FibonacciHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord> Extend<(P, T)> for FibonacciHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.insert(priority, item);
        }
    }
}

impl<T, P: Ord> Heap<T, P> for FibonacciHeap<T, P> {
    fn new() -> Self {
        Self::with_capacity(0)
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
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
        FibonacciHeap::merge(self, other)
    }

    fn clear(&mut self) {
        FibonacciHeap::clear(self)
    }
}

impl<T, P: Ord> DecreaseKeyHeap<T, P> for FibonacciHeap<T, P> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_priority)
    }

    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError> {
        FibonacciHeap::delete(self, handle)
    }

    fn update(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        FibonacciHeap::update(self, handle, new_priority)
    }

    fn get(&self, handle: &Self::Handle) -> Result<(&P, &T), HeapError> {
        FibonacciHeap::get(self, handle)
    }
}
