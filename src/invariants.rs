//! Structural invariant violations reported by `validate()`
//!
//! The heaps never produce these on their own; `validate()` exists so tests
//! (and builds with the `verify` feature) can check the whole structure after
//! every mutation.

use crate::arena::NodeKey;
use index_ring::RingError;
use thiserror::Error;

/// A broken structural invariant, naming the node where it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A sibling ring does not close, or `left`/`right` are not inverses
    #[error("broken sibling ring: {0}")]
    Ring(#[from] RingError<NodeKey>),
    /// A node compares smaller than its parent
    #[error("node {node:?} is smaller than its parent")]
    HeapOrder { node: NodeKey },
    /// A node's parent link disagrees with the ring it sits in
    #[error("node {node:?} has a parent link that does not match its position")]
    ParentLink { node: NodeKey },
    /// A node's stored degree is not the size of its child ring
    #[error("node {node:?} stores degree {stored} but has {actual} children")]
    Degree {
        node: NodeKey,
        stored: usize,
        actual: usize,
    },
    /// A root carries a mark
    #[error("root {node:?} is marked")]
    MarkedRoot { node: NodeKey },
    /// A subtree is smaller than its root's degree allows
    #[error("node {node:?} of degree {degree} roots only {size} nodes")]
    DegreeBound {
        node: NodeKey,
        degree: usize,
        size: usize,
    },
    /// The cached minimum is missing or is not a root
    #[error("cached minimum does not name a root")]
    MinNotRoot,
    /// A root compares smaller than the cached minimum
    #[error("root {node:?} is smaller than the cached minimum")]
    MinNotMinimal { node: NodeKey },
    /// The nodes reachable from the roots are not exactly the stored nodes
    #[error("{reachable} nodes reachable but {stored} stored")]
    Count { reachable: usize, stored: usize },
}
