//! Index-based circular doubly-linked rings.
//!
//! This crate provides the ring primitives used by the heaps in
//! `mergeable-heaps`, expressed over indices instead of pointers. Nodes live
//! in some external table (a `Vec`, a slot map, an arena) and the table
//! implements [`RingLinks`] to expose each node's `next`/`prev` fields.
//!
//! # Circular vs Linear Lists
//!
//! In a circular list:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head or tail - any node can be the "entry point"
//! - Splicing two rings together is O(1)
//! - Iteration wraps around (must track starting point)
//!
//! Every operation here is total: given keys that are members of
//! well-formed rings, it leaves well-formed rings behind. That keeps the
//! pointer surgery in heap consolidation and cutting a sequence of small
//! splice calls that can be checked one at a time with [`check`].
//!
//! # Example
//!
//! ```rust
//! use index_ring::{make_circular, insert_before, iter, RingLinks};
//!
//! struct Table {
//!     next: Vec<usize>,
//!     prev: Vec<usize>,
//! }
//!
//! impl RingLinks<usize> for Table {
//!     fn next(&self, key: usize) -> usize { self.next[key] }
//!     fn prev(&self, key: usize) -> usize { self.prev[key] }
//!     fn set_next(&mut self, key: usize, next: usize) { self.next[key] = next }
//!     fn set_prev(&mut self, key: usize, prev: usize) { self.prev[key] = prev }
//! }
//!
//! let mut table = Table { next: vec![0; 3], prev: vec![0; 3] };
//! for k in 0..3 {
//!     make_circular(&mut table, k);
//! }
//! insert_before(&mut table, 0, 1);
//! insert_before(&mut table, 0, 2);
//!
//! let order: Vec<usize> = iter(&table, 0).collect();
//! assert_eq!(order, vec![0, 1, 2]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;

/// Access to the `next`/`prev` fields of nodes stored in some table.
///
/// A node that is not part of a larger ring must be its own singleton ring
/// (`next(k) == k` and `prev(k) == k`); there is no "unlinked" state.
pub trait RingLinks<K: Copy + Eq> {
    /// Gets the key following `key` in its ring.
    fn next(&self, key: K) -> K;

    /// Gets the key preceding `key` in its ring.
    fn prev(&self, key: K) -> K;

    /// Sets the key following `key`.
    fn set_next(&mut self, key: K, next: K);

    /// Sets the key preceding `key`.
    fn set_prev(&mut self, key: K, prev: K);
}

/// Makes a single node into a circular list of one element.
///
/// After this, `next(key) == key` and `prev(key) == key`.
#[inline]
pub fn make_circular<K, S>(links: &mut S, key: K)
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    links.set_next(key, key);
    links.set_prev(key, key);
}

/// Returns true if `key` is alone in its ring.
#[inline]
pub fn is_singleton<K, S>(links: &S, key: K) -> bool
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    links.next(key) == key
}

/// Inserts the singleton `new` before `at`.
///
/// Since rings have no head, inserting before the entry point puts `new`
/// at the "end" of a traversal that starts from `at`.
#[inline]
pub fn insert_before<K, S>(links: &mut S, at: K, new: K)
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    debug_assert!(is_singleton(links, new), "new is already in a ring");

    let prev = links.prev(at);

    links.set_next(prev, new);
    links.set_prev(new, prev);
    links.set_next(new, at);
    links.set_prev(at, new);
}

/// Removes `key` from its ring and makes it a singleton.
///
/// Returns the node that followed `key`, which is an entry point into what
/// is left of the ring, or `None` if `key` was alone.
#[inline]
pub fn remove<K, S>(links: &mut S, key: K) -> Option<K>
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    let next = links.next(key);
    if next == key {
        return None;
    }
    let prev = links.prev(key);

    links.set_next(prev, next);
    links.set_prev(next, prev);
    make_circular(links, key);
    Some(next)
}

/// Splices two rings together.
///
/// The nodes of `b` end up between the last node of `a` and `a` itself, so a
/// traversal from `a` visits all of `a`'s ring and then all of `b`'s. The
/// merge relinks four fields and is O(1).
///
/// If either is `None`, returns the other. `a` and `b` must belong to
/// different rings; splicing a ring with itself splits it instead.
#[inline]
pub fn splice<K, S>(links: &mut S, a: Option<K>, b: Option<K>) -> Option<K>
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    match (a, b) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (Some(a), Some(b)) => {
            let a_last = links.prev(a);
            let b_last = links.prev(b);

            links.set_next(a_last, b);
            links.set_prev(b, a_last);
            links.set_next(b_last, a);
            links.set_prev(a, b_last);
            Some(a)
        }
    }
}

/// Iterator over a ring, starting at the entry point and stopping before it
/// wraps around.
pub struct Iter<'a, K, S: ?Sized> {
    links: &'a S,
    start: K,
    cursor: Option<K>,
}

impl<K, S> Iterator for Iter<'_, K, S>
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.cursor?;
        let next = self.links.next(current);
        self.cursor = if next == self.start { None } else { Some(next) };
        Some(current)
    }
}

/// Iterates the ring containing `start`, beginning at `start`.
///
/// The ring must not be modified while iterating; collect the keys first
/// if the loop body relinks nodes.
pub fn iter<K, S>(links: &S, start: K) -> Iter<'_, K, S>
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    Iter {
        links,
        start,
        cursor: Some(start),
    }
}

/// Counts the nodes of the ring containing `start`.
pub fn count<K, S>(links: &S, start: K) -> usize
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    iter(links, start).count()
}

/// A broken ring found by [`check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError<K> {
    /// `prev(next(node))` is not `node`.
    BrokenPrevLink {
        /// Node whose successor does not point back at it
        node: K,
        /// The successor in question
        next: K,
    },
    /// Following `next` from `start` did not come back within the limit.
    NotClosed {
        /// Entry point of the traversal
        start: K,
    },
}

impl<K: fmt::Debug> fmt::Display for RingError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::BrokenPrevLink { node, next } => {
                write!(f, "prev link of {next:?} does not point back to {node:?}")
            }
            RingError::NotClosed { start } => {
                write!(f, "ring entered at {start:?} does not close")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<K: fmt::Debug> std::error::Error for RingError<K> {}

/// Verifies the ring containing `start` and returns its size.
///
/// Checks that `next`/`prev` are mutual inverses along the ring and that
/// following `next` returns to `start` after at most `limit` steps.
pub fn check<K, S>(links: &S, start: K, limit: usize) -> Result<usize, RingError<K>>
where
    K: Copy + Eq,
    S: RingLinks<K> + ?Sized,
{
    let mut len = 0;
    let mut current = start;
    loop {
        let next = links.next(current);
        if links.prev(next) != current {
            return Err(RingError::BrokenPrevLink {
                node: current,
                next,
            });
        }
        len += 1;
        if next == start {
            return Ok(len);
        }
        if len >= limit {
            return Err(RingError::NotClosed { start });
        }
        current = next;
    }
}
