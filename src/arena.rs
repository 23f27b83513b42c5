//! Arena storage for heap nodes
//!
//! Every handle-addressable heap in this crate keeps its nodes in
//! [`slotmap`] storage and links them with [`NodeKey`] indices instead of
//! pointers. This gives:
//!
//! - Contiguous node storage (better cache locality than one `Box` per node)
//! - Slot recycling through the slot map's free list
//! - Generational keys, so a key whose node was removed is detected as stale
//!   instead of silently aliasing a recycled slot
//!
//! # Segments
//!
//! An arena is a list of segments, each one slot map stamped with a
//! process-unique [`SegmentId`]. A [`NodeKey`] names a segment and a slot in
//! it. New nodes always go into the arena's home segment.
//!
//! Merging two heaps appends the absorbed arena's segments to the surviving
//! one ([`Arena::append`]). No node moves and no link is rewritten, so every
//! key the absorbed heap handed out keeps naming the same node. The cost is
//! proportional to the smaller of the two segment counts, never to the
//! number of nodes. Segments that run empty are dropped, and a key into a
//! dropped segment no longer resolves.

use crate::traits::HeapError;
use index_ring::RingLinks;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    struct SlotKey;
}

/// Process-unique identity of an arena segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SegmentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Key of a node: its segment and its slot within that segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    segment: SegmentId,
    slot: SlotKey,
}

/// Nodes that sit in a sibling ring
///
/// `left`/`right` are the ring's `prev`/`next` fields.
pub(crate) trait Siblings {
    fn left(&self) -> NodeKey;
    fn right(&self) -> NodeKey;
    fn set_left(&mut self, left: NodeKey);
    fn set_right(&mut self, right: NodeKey);
}

#[derive(Debug)]
struct Segment<N> {
    id: SegmentId,
    slots: SlotMap<SlotKey, N>,
}

impl<N> Segment<N> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            id: SegmentId::fresh(),
            slots: SlotMap::with_capacity_and_key(capacity),
        }
    }
}

/// Segmented node storage owned by exactly one heap
///
/// `segments[0]` is the home segment and always exists.
#[derive(Debug)]
pub(crate) struct Arena<N> {
    segments: Vec<Segment<N>>,
    positions: FxHashMap<SegmentId, usize>,
    len: usize,
}

impl<N> Arena<N> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let home = Segment::with_capacity(capacity);
        let mut positions = FxHashMap::default();
        positions.insert(home.id, 0);
        Self {
            segments: vec![home],
            positions,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of segments currently held, the home segment included
    #[inline]
    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    fn position(&self, segment: SegmentId) -> Option<usize> {
        if self.segments[0].id == segment {
            Some(0)
        } else {
            self.positions.get(&segment).copied()
        }
    }

    /// Inserts a node built from its own key, so it can start as a
    /// singleton ring pointing at itself.
    pub(crate) fn insert_with_key(&mut self, f: impl FnOnce(NodeKey) -> N) -> NodeKey {
        let home = &mut self.segments[0];
        let segment = home.id;
        let slot = home.slots.insert_with_key(|slot| f(NodeKey { segment, slot }));
        self.len += 1;
        NodeKey { segment, slot }
    }

    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<N> {
        let position = self.position(key.segment)?;
        let node = self.segments[position].slots.remove(key.slot)?;
        self.len -= 1;
        if position != 0 && self.segments[position].slots.is_empty() {
            self.retire(position);
        }
        Some(node)
    }

    /// Drops the empty segment at `position`; the last segment takes its place.
    fn retire(&mut self, position: usize) {
        let retired = self.segments.swap_remove(position);
        self.positions.remove(&retired.id);
        if let Some(moved) = self.segments.get(position) {
            self.positions.insert(moved.id, position);
        }
    }

    #[inline]
    pub(crate) fn get(&self, key: NodeKey) -> Option<&N> {
        let position = self.position(key.segment)?;
        self.segments[position].slots.get(key.slot)
    }

    /// Checks that a handle's key names a live node of this arena.
    #[inline]
    pub(crate) fn resolve(&self, key: NodeKey) -> Result<NodeKey, HeapError> {
        match self.get(key) {
            Some(_) => Ok(key),
            None => Err(HeapError::InvalidHandle),
        }
    }

    /// Drops every node and every segment but the home one. Keys handed out
    /// before the clear stay stale forever.
    pub(crate) fn clear(&mut self) {
        self.segments.truncate(1);
        self.segments[0].slots.clear();
        let home = self.segments[0].id;
        self.positions.retain(|&id, _| id == home);
        self.len = 0;
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &N> {
        self.segments.iter().flat_map(|segment| segment.slots.values())
    }

    /// Takes over every node of `other` without moving any of them.
    ///
    /// The arena holding fewer segments gives its segments to the other one,
    /// so a long chain of merges moves each segment O(log n) times. Keys into
    /// either arena stay valid.
    pub(crate) fn append(&mut self, mut other: Arena<N>) {
        if other.segments.len() > self.segments.len() {
            std::mem::swap(self, &mut other);
        }
        self.len += other.len;
        for segment in other.segments {
            if segment.slots.is_empty() {
                continue;
            }
            self.positions.insert(segment.id, self.segments.len());
            self.segments.push(segment);
        }
    }
}

impl<N> Index<NodeKey> for Arena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        let position = if self.segments[0].id == key.segment {
            0
        } else {
            self.positions[&key.segment]
        };
        &self.segments[position].slots[key.slot]
    }
}

impl<N> IndexMut<NodeKey> for Arena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        let position = if self.segments[0].id == key.segment {
            0
        } else {
            self.positions[&key.segment]
        };
        &mut self.segments[position].slots[key.slot]
    }
}

impl<N: Siblings> RingLinks<NodeKey> for Arena<N> {
    #[inline]
    fn next(&self, key: NodeKey) -> NodeKey {
        self[key].right()
    }

    #[inline]
    fn prev(&self, key: NodeKey) -> NodeKey {
        self[key].left()
    }

    #[inline]
    fn set_next(&mut self, key: NodeKey, next: NodeKey) {
        self[key].set_right(next);
    }

    #[inline]
    fn set_prev(&mut self, key: NodeKey, prev: NodeKey) {
        self[key].set_left(prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Cell {
        value: i32,
        link: NodeKey,
    }

    #[test]
    fn test_segment_ids_are_unique() {
        let mut a: Arena<i32> = Arena::with_capacity(0);
        let mut b: Arena<i32> = Arena::with_capacity(0);
        let ka = a.insert_with_key(|_| 1);
        let kb = b.insert_with_key(|_| 1);
        assert_eq!(ka.slot, kb.slot);
        assert_ne!(ka, kb);
    }

    #[test]
    fn test_resolve_rejects_foreign_and_stale_keys() {
        let mut a: Arena<i32> = Arena::with_capacity(4);
        let mut b: Arena<i32> = Arena::with_capacity(4);

        let key = a.insert_with_key(|_| 42);
        b.insert_with_key(|_| 7);
        assert_eq!(a.resolve(key), Ok(key));
        assert_eq!(b.resolve(key), Err(HeapError::InvalidHandle));

        assert_eq!(a.remove(key), Some(42));
        assert_eq!(a.resolve(key), Err(HeapError::InvalidHandle));
        assert_eq!(a.len(), 0);
    }

    #[test]
    fn test_slots_are_recycled_with_new_generation() {
        let mut arena: Arena<i32> = Arena::with_capacity(1);
        let first = arena.insert_with_key(|_| 1);
        arena.remove(first);
        let second = arena.insert_with_key(|_| 2);

        assert_ne!(first, second);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&2));
    }

    #[test]
    fn test_clear_invalidates_keys() {
        let mut arena: Arena<i32> = Arena::with_capacity(2);
        let key = arena.insert_with_key(|_| 7);
        let mut other: Arena<i32> = Arena::with_capacity(1);
        let appended = other.insert_with_key(|_| 8);
        arena.append(other);

        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.segment_count(), 1);
        assert_eq!(arena.resolve(key), Err(HeapError::InvalidHandle));
        assert_eq!(arena.resolve(appended), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_append_keeps_keys_and_links() {
        let mut left: Arena<Cell> = Arena::with_capacity(2);
        let mut right: Arena<Cell> = Arena::with_capacity(2);
        left.insert_with_key(|k| Cell { value: 0, link: k });

        let a = right.insert_with_key(|k| Cell { value: 1, link: k });
        let b = right.insert_with_key(|_| Cell { value: 2, link: a });
        right[a].link = b;

        left.append(right);
        assert_eq!(left.len(), 3);
        assert_eq!(left.segment_count(), 2);
        assert_eq!(left[a].value, 1);
        assert_eq!(left[a].link, b);
        assert_eq!(left[b].link, a);

        let c = left.insert_with_key(|k| Cell { value: 3, link: k });
        assert_eq!(left[c].value, 3);
    }

    #[test]
    fn test_append_gives_the_smaller_segment_list_away() {
        let mut big: Arena<i32> = Arena::with_capacity(0);
        let mut keys = vec![big.insert_with_key(|_| 0)];
        for value in 1..4 {
            let mut single: Arena<i32> = Arena::with_capacity(1);
            keys.push(single.insert_with_key(|_| value));
            big.append(single);
        }
        assert_eq!(big.segment_count(), 4);

        let mut fresh: Arena<i32> = Arena::with_capacity(1);
        keys.push(fresh.insert_with_key(|_| 4));
        fresh.append(big);

        assert_eq!(fresh.segment_count(), 5);
        assert_eq!(fresh.len(), 5);
        for (value, &key) in keys.iter().enumerate() {
            assert_eq!(fresh.get(key), Some(&(value as i32)));
        }
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let mut arena: Arena<i32> = Arena::with_capacity(1);
        let home = arena.insert_with_key(|_| 0);
        let mut first: Arena<i32> = Arena::with_capacity(1);
        let a = first.insert_with_key(|_| 1);
        let mut second: Arena<i32> = Arena::with_capacity(1);
        let b = second.insert_with_key(|_| 2);
        arena.append(first);
        arena.append(second);
        assert_eq!(arena.segment_count(), 3);

        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.segment_count(), 2);
        assert_eq!(arena[b], 2);
        assert_eq!(arena.resolve(a), Err(HeapError::InvalidHandle));

        // The home segment stays even when empty.
        assert_eq!(arena.remove(home), Some(0));
        assert_eq!(arena.segment_count(), 2);
        assert_eq!(arena.remove(b), Some(2));
        assert_eq!(arena.segment_count(), 1);
        assert_eq!(arena.len(), 0);
    }
}
