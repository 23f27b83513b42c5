//! Leftist Heap implementation
//!
//! A leftist heap is a binary tree that is heap-ordered and *leftist*: the
//! rank (length of the right spine) of every left child is at least the rank
//! of its right sibling. The right spine is therefore O(log n) long, and
//! melding two heaps only walks their right spines:
//!
//! - O(log n) worst-case insert, extract_min and merge
//! - O(1) find_min
//!
//! There are no handles and no decrease_key; the leftist heap implements
//! [`Heap`] only.

use crate::traits::Heap;
use log::debug;
use std::fmt;

type Link<T, P> = Option<Box<Node<T, P>>>;

struct Node<T, P> {
    item: T,
    priority: P,
    rank: usize,
    left: Link<T, P>,
    right: Link<T, P>,
}

fn rank<T, P>(link: &Link<T, P>) -> usize {
    link.as_ref().map_or(0, |node| node.rank)
}

/// Melds two leftist trees along their right spines.
///
/// The spine is walked iteratively: the smaller root of each step is parked
/// on a stack with its right subtree taken, then the stack is unwound
/// bottom-up, swapping children wherever the leftist property would break.
fn meld<T, P: Ord>(mut a: Link<T, P>, mut b: Link<T, P>) -> Link<T, P> {
    let mut spine: Vec<Box<Node<T, P>>> = Vec::new();
    let mut merged = loop {
        match (a, b) {
            (None, rest) | (rest, None) => break rest,
            (Some(x), Some(y)) => {
                let (mut top, other) = if y.priority < x.priority { (y, x) } else { (x, y) };
                a = top.right.take();
                b = Some(other);
                spine.push(top);
            }
        }
    };

    while let Some(mut node) = spine.pop() {
        node.right = merged;
        if rank(&node.left) < rank(&node.right) {
            std::mem::swap(&mut node.left, &mut node.right);
        }
        node.rank = rank(&node.right) + 1;
        merged = Some(node);
    }
    merged
}

/// Leftist Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::leftist::LeftistHeap;
///
/// let mut heap = LeftistHeap::new();
/// heap.insert(5, "a");
/// heap.insert(3, "b");
/// assert_eq!(heap.extract_min(), Some((3, "b")));
/// ```
pub struct LeftistHeap<T, P: Ord> {
    root: Link<T, P>,
    len: usize,
}

impl<T, P: Ord> LeftistHeap<T, P> {
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
            rank: 1,
            left: None,
            right: None,
        });
        self.root = meld(self.root.take(), Some(node));
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
            ..
        } = *root;
        self.root = meld(left, right);
        self.len -= 1;
        Some((priority, item))
    }

    pub fn merge(&mut self, mut other: Self) {
        debug!("melding leftist heaps of {} and {}", self.len, other.len);
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

    /// Returns true if heap order, the leftist property, the stored ranks
    /// and the element count all hold.
    pub fn is_valid(&self) -> bool {
        let mut count = 0;
        let mut stack: Vec<&Node<T, P>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            if rank(&node.left) < rank(&node.right) || node.rank != rank(&node.right) + 1 {
                return false;
            }
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

impl<T, P: Ord> Drop for LeftistHeap<T, P> {
    fn drop(&mut self) {
        // Degenerate left spines can be n deep; free them without recursion.
        self.clear();
    }
}

impl<T, P: Ord> Default for LeftistHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, P: Ord + fmt::Debug> fmt::Debug for LeftistHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeftistHeap")
            .field("len", &self.len)
            .field("min", &self.find_min())
            .finish()
    }
}

impl<T, P: Ord> FromIterator<(P, T)> for LeftistHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord> Extend<(P, T)> for LeftistHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.insert(priority, item);
        }
    }
}

impl<T, P: Ord> Heap<T, P> for LeftistHeap<T, P> {
    fn new() -> Self {
        LeftistHeap::new()
    }

    fn is_empty(&self) -> bool {
        LeftistHeap::is_empty(self)
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
        LeftistHeap::merge(self, other)
    }

    fn clear(&mut self) {
        LeftistHeap::clear(self)
    }
}
