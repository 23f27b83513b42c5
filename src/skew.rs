//! Skew Heap implementation
//!
//! A skew heap is a self-adjusting leftist heap: it keeps no rank at all and
//! instead swaps the children of every node on the merge path. That swap is
//! enough for an amortized bound:
//!
//! - O(log n) amortized insert, extract_min and merge
//! - O(1) find_min
//!
//! A single merge path can still be O(n) long, so melding is iterative.
//! Like the leftist heap, the skew heap implements [`Heap`] only.

use crate::traits::Heap;
use log::debug;
use std::fmt;

type Link<T, P> = Option<Box<Node<T, P>>>;

struct Node<T, P> {
    item: T,
    priority: P,
    left: Link<T, P>,
    right: Link<T, P>,
}

/// Melds two skew trees.
///
/// Walks the right paths, parking the smaller root of each step with its
/// right subtree taken. Unwinding moves each parked node's left child to the
/// right and hangs the melded rest on the left.
fn meld<T, P: Ord>(mut a: Link<T, P>, mut b: Link<T, P>) -> Link<T, P> {
    let mut path: Vec<Box<Node<T, P>>> = Vec::new();
    let mut merged = loop {
        match (a, b) {
            (None, rest) | (rest, None) => break rest,
            (Some(x), Some(y)) => {
                let (mut top, other) = if y.priority < x.priority { (y, x) } else { (x, y) };
                a = top.right.take();
                b = Some(other);
                path.push(top);
            }
        }
    };

    while let Some(mut node) = path.pop() {
        node.right = node.left.take();
        node.left = merged;
        merged = Some(node);
    }
    merged
}

/// Skew Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::skew::SkewHeap;
///
/// let mut heap = SkewHeap::new();
/// heap.insert(5, "a");
/// heap.insert(3, "b");
/// assert_eq!(heap.find_min(), Some((&3, &"b")));
/// assert_eq!(heap.extract_min(), Some((3, "b")));
/// ```
pub struct SkewHeap<T, P: Ord> {
    root: Link<T, P>,
    len: usize,
}

impl<T, P: Ord> SkewHeap<T, P> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn insert(&mut self, priority: P, item: T) {
        let node = Box::new(Node {
            item,
            priority,
            left: None,
            right: None,
        });
        self.root = meld(Some(node), self.root.take());
        self.len += 1;
    }

    pub fn find_min(&self) -> Option<(&P, &T)> {
        self.root.as_ref().map(|node| (&node.priority, &node.item))
    }

    pub fn extract_min(&mut self) -> Option<(P, T)> {
        let root = self.root.take()?;
        let Node {
            item,
            priority,
            left,
            right,
        } = *root;
        self.root = meld(right, left);
        self.len -= 1;
        Some((priority, item))
    }

    pub fn merge(&mut self, mut other: Self) {
        debug!("melding skew heaps of {} and {}", self.len, other.len);
        self.root = meld(self.root.take(), other.root.take());
        self.len += std::mem::take(&mut other.len);
    }

    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node<T, P>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Iterates over all elements in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> {
        let mut stack: Vec<&Node<T, P>> = self.root.as_deref().into_iter().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
            Some((&node.priority, &node.item))
        })
    }

    /// Returns true if heap order and the element count hold.
    pub fn is_valid(&self) -> bool {
        let mut count = 0;
        let mut stack: Vec<&Node<T, P>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            for child in [&node.left, &node.right].into_iter().flatten() {
                if child.priority < node.priority {
                    return false;
                }
                stack.push(child);
            }
        }
        count == self.len
    }
}

impl<T, P: Ord> Drop for SkewHeap<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, P: Ord> Default for SkewHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, P: Ord + fmt::Debug> fmt::Debug for SkewHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkewHeap")
            .field("len", &self.len)
            .field("min", &self.find_min())
            .finish()
    }
}

impl<T, P: Ord> FromIterator<(P, T)> for SkewHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord> Extend<(P, T)> for SkewHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.insert(priority, item);
        }
    }
}

impl<T, P: Ord> Heap<T, P> for SkewHeap<T, P> {
    fn new() -> Self {
        SkewHeap::new()
    }

    fn is_empty(&self) -> bool {
        SkewHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        self.len
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
        SkewHeap::merge(self, other)
    }

    fn clear(&mut self) {
        SkewHeap::clear(self)
    }
}
