//! Dijkstra's shortest paths driven by `decrease_key`
//!
//! The search keeps one heap entry per discovered node. When a shorter path
//! to an open node is found, its entry is lowered in place with
//! [`DecreaseKeyHeap::decrease_key`] instead of pushing a duplicate, so the
//! open set never holds more than one entry per node.
//!
//! Only lightweight indices are stored in the heap rather than full node
//! data. A fast hash map (using FxHash) maps node states to their index in a
//! table of per-node metadata.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::pathfinding::{SearchNode, dijkstra};
//! use mergeable_heaps::pairing::PairingHeap;
//!
//! // Node carries its goal coordinates
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..*self }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra::<_, PairingHeap<_, _>>(&start).unwrap();
//! assert_eq!(cost, 4); // Manhattan distance
//! assert_eq!(path.len(), 5);
//! ```

use crate::traits::DecreaseKeyHeap;
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::ops::Add;

/// Trait for types that can be used as path costs.
///
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
///
/// The node carries all context needed to generate its successors and to
/// decide whether it is a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost of the edge to them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool {
        false
    }
}

type NodeIndex = usize;

struct Entry<N: SearchNode, H> {
    node: N,
    distance: N::Cost,
    /// Heap handle while the node is open
    handle: Option<H>,
    came_from: Option<NodeIndex>,
}

/// Open set plus per-node metadata for one search
struct Search<N: SearchNode, H: DecreaseKeyHeap<NodeIndex, N::Cost>> {
    heap: H,
    entries: Vec<Entry<N, H::Handle>>,
    index: FxHashMap<N, NodeIndex>,
}

impl<N, H> Search<N, H>
where
    N: SearchNode,
    H: DecreaseKeyHeap<NodeIndex, N::Cost>,
{
    fn new(start: &N) -> Self {
        let mut search = Search {
            heap: H::new(),
            entries: Vec::new(),
            index: FxHashMap::default(),
        };
        search.relax(start.clone(), N::Cost::default(), None);
        search
    }

    /// Records a path of length `distance` to `node`, pushing it or lowering
    /// its heap entry if the path is new or shorter.
    fn relax(&mut self, node: N, distance: N::Cost, came_from: Option<NodeIndex>) {
        let Some(&idx) = self.index.get(&node) else {
            let idx = self.entries.len();
            let handle = self.heap.push_with_handle(distance, idx);
            self.index.insert(node.clone(), idx);
            self.entries.push(Entry {
                node,
                distance,
                handle: Some(handle),
                came_from,
            });
            return;
        };

        let entry = &mut self.entries[idx];
        let Some(handle) = entry.handle else {
            return;
        };
        if distance < entry.distance {
            // Open handles are live and the distance strictly drops.
            let lowered = self.heap.decrease_key(&handle, distance);
            debug_assert!(lowered.is_ok(), "open node {idx} rejected {lowered:?}");
            entry.distance = distance;
            entry.came_from = came_from;
        }
    }

    /// Settles the closest open node and returns its index.
    fn settle(&mut self) -> Option<NodeIndex> {
        let (distance, idx) = self.heap.pop()?;
        let entry = &mut self.entries[idx];
        entry.handle = None;
        debug_assert!(distance == entry.distance);
        trace!("settled node {idx}");
        Some(idx)
    }

    fn expand(&mut self, idx: NodeIndex) {
        let base = self.entries[idx].distance;
        for (next, edge) in self.entries[idx].node.successors() {
            self.relax(next, base + edge, Some(idx));
        }
    }

    fn path_to(&self, mut idx: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[idx].node.clone()];
        while let Some(prev) = self.entries[idx].came_from {
            path.push(self.entries[prev].node.clone());
            idx = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from `start` until a node whose `is_goal()`
/// returns true is settled.
///
/// # Type Parameters
/// - `N`: The node type implementing [`SearchNode`]
/// - `H`: The heap used as the open set
///
/// # Returns
/// - `Some((path, cost))` with the path from start to goal (inclusive)
/// - `None` if no goal is reachable
///
/// # Example
/// ```rust
/// use mergeable_heaps::pathfinding::{SearchNode, dijkstra};
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Node {
///     value: i32,
///     goal: i32,
/// }
///
/// impl SearchNode for Node {
///     type Cost = u32;
///
///     fn successors(&self) -> Vec<(Self, u32)> {
///         if self.value < 100 {
///             vec![(Node { value: self.value + 1, goal: self.goal }, 1)]
///         } else {
///             vec![]
///         }
///     }
///
///     fn is_goal(&self) -> bool {
///         self.value == self.goal
///     }
/// }
///
/// let start = Node { value: 0, goal: 5 };
/// let (path, cost) = dijkstra::<_, FibonacciHeap<_, _>>(&start).unwrap();
/// assert_eq!(cost, 5);
/// assert_eq!(path.len(), 6);
/// ```
pub fn dijkstra<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<NodeIndex, N::Cost>,
{
    let mut search: Search<N, H> = Search::new(start);
    while let Some(idx) = search.settle() {
        if search.entries[idx].node.is_goal() {
            return Some((search.path_to(idx), search.entries[idx].distance));
        }
        search.expand(idx);
    }
    None
}

/// Returns every node reachable from `start` with its shortest distance,
/// in the order the nodes were settled (non-decreasing distance).
///
/// `is_goal()` is ignored; the graph reachable from `start` must be finite.
pub fn shortest_distances<N, H>(start: &N) -> Vec<(N, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<NodeIndex, N::Cost>,
{
    let mut search: Search<N, H> = Search::new(start);
    let mut settled = Vec::new();
    while let Some(idx) = search.settle() {
        search.expand(idx);
        settled.push(idx);
    }
    debug!("settled {} nodes", settled.len());
    settled
        .into_iter()
        .map(|idx| {
            let entry = &search.entries[idx];
            (entry.node.clone(), entry.distance)
        })
        .collect()
}
