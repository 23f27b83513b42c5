//! Mergeable priority queues for Rust
//!
//! This crate provides min-heaps over `(priority, item)` pairs that can be
//! merged, with handle-based `decrease_key`, `delete` and `update` on the
//! heaps that support them.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert, decrease_key, and merge; O(log n) amortized delete-min
//! - **Pairing Heap**: O(1) insert and merge; O(log n) amortized delete-min; o(log n) amortized decrease_key
//! - **Leftist Heap**: O(log n) worst-case insert, delete-min and merge; no handles
//! - **Skew Heap**: the self-adjusting leftist heap, O(log n) amortized; no handles
//! - **StdHeap**: a `BinaryHeap`-style wrapper over any of the above
//! - **Pathfinding**: Dijkstra's algorithm driven by `decrease_key`
//!
//! Handle-based heaps keep their nodes in a segmented slot-map arena.
//! Handles are plain `Copy` values that stay valid across merges; a handle
//! whose element is gone, or that came from an unrelated heap, is rejected
//! with [`HeapError::InvalidHandle`] instead of touching memory it does not
//! own.
//!
//! Every heap can check its own structure with `validate()`. Enabling the
//! `verify` cargo feature runs that check after every mutating operation.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::fibonacci::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1");
//! let _handle2 = heap.insert(3, "item2");
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.find_min(), Some((&1, &"item1")));
//!
//! let mut other = FibonacciHeap::new();
//! let handle3 = other.insert(4, "item3");
//! heap.merge(other);
//! heap.decrease_key(&handle3, 0).unwrap();
//! assert_eq!(heap.extract_min(), Some((0, "item3")));
//! ```

pub mod arena;
pub mod fibonacci;
pub mod invariants;
pub mod leftist;
pub mod pairing;
pub mod pathfinding;
pub mod skew;
pub mod stdlib_compat;
pub mod traits;

// Re-export the main traits for convenience
pub use invariants::InvariantViolation;
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
