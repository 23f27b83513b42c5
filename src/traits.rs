//! Trait interface shared by the heaps in this crate
//!
//! Two tiers:
//!
//! - [`Heap`]: meldable min-heap over `(priority, item)` pairs
//! - [`DecreaseKeyHeap`]: a [`Heap`] that hands out handles, through which
//!   single elements can be re-prioritized or removed
//!
//! Code that only needs push/pop/merge (such as
//! [`StdHeap`](crate::stdlib_compat::StdHeap)) is written against [`Heap`];
//! graph searches that lower tentative distances, such as
//! [`dijkstra`](crate::pathfinding::dijkstra), need [`DecreaseKeyHeap`].

use thiserror::Error;

/// Rejected handle operation
///
/// Both variants are caller contract violations. They are detected before
/// the heap is touched, so a rejected call leaves the heap exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The new priority compares greater than the current priority
    #[error("new priority is greater than the current priority")]
    PriorityNotDecreased,
    /// The handle does not name a live element of this heap
    #[error("handle is no longer valid (element was removed or belongs to another heap)")]
    InvalidHandle,
}

/// Opaque reference to one element of a [`DecreaseKeyHeap`]
///
/// Handles are small `Copy` values. A handle that outlives its element, or
/// that is used with a heap that did not issue it, is rejected with
/// [`HeapError::InvalidHandle`].
pub trait Handle: Copy + PartialEq + Eq {}

/// Meldable min-heap
///
/// The ordering key and the payload are stored side by side: `P` is
/// compared, `T` never is. Use `()` as the item type, or
/// [`StdHeap`](crate::stdlib_compat::StdHeap), when the value is its own
/// priority.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::Heap;
/// use mergeable_heaps::leftist::LeftistHeap;
///
/// let mut tasks = LeftistHeap::new();
/// tasks.push(30, "deploy");
/// tasks.push(10, "build");
///
/// let mut urgent = LeftistHeap::new();
/// urgent.push(20, "test");
/// tasks.merge(urgent);
///
/// assert_eq!(tasks.peek(), Some((&10, &"build")));
/// assert_eq!(tasks.pop(), Some((10, "build")));
/// assert_eq!(tasks.pop(), Some((20, "test")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Returns an empty heap
    fn new() -> Self;

    fn is_empty(&self) -> bool;

    /// Number of stored elements
    fn len(&self) -> usize;

    /// Adds `item` with `priority`
    ///
    /// O(1) for the Fibonacci and pairing heaps, O(log n) for the leftist heap.
    fn push(&mut self, priority: P, item: T);

    /// The smallest priority with its item, or `None` when empty. O(1).
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes the element with the smallest priority
    ///
    /// Among equal priorities, which one comes out first is unspecified.
    /// O(log n), amortized for the Fibonacci and pairing heaps.
    fn pop(&mut self) -> Option<(P, T)>;

    /// Moves every element of `other` into `self`
    fn merge(&mut self, other: Self);

    /// Removes every element, leaving the heap as if freshly constructed
    fn clear(&mut self);
}

/// Heap with handle-based access to individual elements
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{Heap, DecreaseKeyHeap};
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// let mut distances = FibonacciHeap::new();
/// let far = distances.push_with_handle(10, 'b');
/// distances.push(7, 'c');
///
/// distances.decrease_key(&far, 5).unwrap();
/// assert_eq!(distances.peek(), Some((&5, &'b')));
/// assert_eq!(distances.delete(&far), Ok((5, 'b')));
/// assert_eq!(distances.peek(), Some((&7, &'c')));
/// ```
pub trait DecreaseKeyHeap<T, P: Ord>: Heap<T, P> {
    type Handle: Handle;

    /// Like [`Heap::push`], but returns a handle to the new element
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Lowers the priority of the element behind `handle`
    ///
    /// A priority equal to the current one is accepted and changes nothing
    /// structurally.
    ///
    /// # Errors
    /// - `HeapError::InvalidHandle` if the handle does not name a live element
    /// - `HeapError::PriorityNotDecreased` if `new_priority` is greater than
    ///   the current priority
    ///
    /// O(1) amortized for the Fibonacci heap, o(log n) amortized for the
    /// pairing heap.
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element behind `handle` and returns it. O(log n) amortized.
    ///
    /// # Errors
    /// `HeapError::InvalidHandle` if the handle does not name a live element.
    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;

    /// Moves the element behind `handle` to any priority
    ///
    /// Lowering (or keeping) the priority behaves like `decrease_key`; raising
    /// it detaches the element and reinserts it. The handle remains valid in
    /// both cases.
    ///
    /// # Errors
    /// `HeapError::InvalidHandle` if the handle does not name a live element.
    fn update(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Reads the element behind `handle`
    ///
    /// # Errors
    /// `HeapError::InvalidHandle` if the handle does not name a live element.
    fn get(&self, handle: &Self::Handle) -> Result<(&P, &T), HeapError>;
}
