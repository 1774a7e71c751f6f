//! RTree implementation.

use crate::geometry::{ensure_same_dimension, Point, Rect};
use crate::spatial_index::SpatialIndex;

use super::rtree_config::RTreeConfig;
use super::rtree_types::{EntryKind, Node, NodeId, RTreeStats, SpatialResult};

/// An in-memory R-Tree mapping bounding rectangles to payloads.
///
/// Nodes live in an arena owned by the tree and are addressed by [`NodeId`].
/// Each node records its parent's id, so rectangle growth and splits can be
/// propagated upward without shared ownership. Slots of nodes removed during
/// deletion are recycled by later splits.
///
/// The tree has no internal synchronization. Mutation takes `&mut self`, so
/// callers sharing a tree across threads must wrap it in a lock of their
/// choice (a readers-writer lock allows concurrent searches).
///
/// # Examples
///
/// ```rust
/// use rtree_spatial::{Point, RTree, Rect};
///
/// let mut tree = RTree::new(2, 1, 2).unwrap();
/// let a = Rect::from_corners(Point::from([0.0, 0.0]), Point::from([1.0, 1.0])).unwrap();
/// let b = Rect::from_corners(Point::from([5.0, 5.0]), Point::from([6.0, 6.0])).unwrap();
/// tree.insert(a, "A").unwrap();
/// tree.insert(b, "B").unwrap();
///
/// let nearest = tree.nearest_neighbor(&Point::from([0.0, 0.0])).unwrap();
/// assert_eq!(nearest, Some(&"A"));
/// ```
#[derive(Debug, Clone)]
pub struct RTree<T> {
    pub(crate) config: RTreeConfig,
    pub(crate) nodes: Vec<Node<T>>,
    /// Free node slots for reuse
    pub(crate) free_nodes: Vec<NodeId>,
    pub(crate) root: NodeId,
    pub(crate) size: usize,
}

impl<T> RTree<T> {
    /// Create an empty R-Tree.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfig`](crate::SpatialError::InvalidConfig)
    /// if `min_entries` is zero or exceeds half of `max_entries`, or if the
    /// dimension is zero.
    pub fn new(dimension: usize, min_entries: usize, max_entries: usize) -> SpatialResult<Self> {
        Self::with_config(RTreeConfig::new(dimension, min_entries, max_entries))
    }

    /// Create an empty R-Tree from a configuration.
    pub fn with_config(config: RTreeConfig) -> SpatialResult<Self> {
        config.validate()?;
        log::debug!(
            "Creating R-Tree with dimension {} and fill bounds ({}, {})",
            config.dimension(),
            config.min_entries(),
            config.max_entries()
        );
        Ok(Self {
            config,
            nodes: vec![Node::new(0, None)],
            free_nodes: Vec::new(),
            root: 0,
            size: 0,
        })
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension()
    }

    /// Number of stored objects.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of levels in the tree; a lone leaf root has depth 1.
    pub fn depth(&self) -> usize {
        self.node(self.root).level as usize + 1
    }

    /// Get statistics about the tree shape.
    pub fn stats(&self) -> RTreeStats {
        let mut stats = RTreeStats {
            total_entries: self.size as u64,
            tree_height: self.node(self.root).level,
            ..RTreeStats::default()
        };

        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            stats.node_count += 1;
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            stack.extend(node.entries.iter().filter_map(|e| e.child()));
        }
        stats
    }

    /// Removes every object, leaving an empty leaf root.
    pub fn clear(&mut self) {
        log::debug!("Clearing R-Tree holding {} entries", self.size);
        self.nodes = vec![Node::new(0, None)];
        self.free_nodes.clear();
        self.root = 0;
        self.size = 0;
    }

    /// Every stored (rectangle, payload) pair, in no particular order.
    pub fn entries(&self) -> Vec<(&Rect, &T)> {
        let mut results = Vec::with_capacity(self.size);
        self.collect_entries_recursive(self.root, &mut results);
        results
    }

    fn collect_entries_recursive<'a>(&'a self, id: NodeId, results: &mut Vec<(&'a Rect, &'a T)>) {
        for entry in &self.node(id).entries {
            match &entry.kind {
                EntryKind::Leaf(payload) => results.push((&entry.rect, payload)),
                EntryKind::Internal(child) => self.collect_entries_recursive(*child, results),
            }
        }
    }

    pub(crate) fn check_rect(&self, rect: &Rect) -> SpatialResult<()> {
        ensure_same_dimension(self.dimension(), rect.dimension())
    }

    pub(crate) fn check_point(&self, point: &Point) -> SpatialResult<()> {
        ensure_same_dimension(self.dimension(), point.dimension())
    }

    // ------------------------------------------------------------------------
    // Arena management
    // ------------------------------------------------------------------------

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id]
    }

    /// Store a node, reusing a free slot when one is available
    pub(crate) fn allocate_node(&mut self, node: Node<T>) -> NodeId {
        if let Some(id) = self.free_nodes.pop() {
            self.nodes[id] = node;
            id
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Release a node slot and hand back its contents
    pub(crate) fn free_node(&mut self, id: NodeId) -> Node<T> {
        self.free_nodes.push(id);
        std::mem::replace(&mut self.nodes[id], Node::new(0, None))
    }

    /// Recompute the MBR of `id` and store it in the parent's entry
    pub(crate) fn refresh_parent_rect(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let Some(bbox) = self.node(id).compute_bbox() else {
            return;
        };
        if let Some(idx) = self.node(parent).child_index(id) {
            self.node_mut(parent).entries[idx].rect = bbox;
        }
    }
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self {
            config: RTreeConfig::default(),
            nodes: vec![Node::new(0, None)],
            free_nodes: Vec::new(),
            root: 0,
            size: 0,
        }
    }
}

// ============================================================================
// SpatialIndex Trait Implementation
// ============================================================================

impl<T: PartialEq> SpatialIndex<T> for RTree<T> {
    fn insert(&mut self, rect: Rect, payload: T) -> SpatialResult<()> {
        RTree::insert(self, rect, payload)
    }

    fn delete(&mut self, payload: &T) -> bool {
        RTree::delete(self, payload)
    }

    fn remove(&mut self, rect: &Rect, payload: &T) -> SpatialResult<bool> {
        RTree::remove(self, rect, payload)
    }

    fn search_intersect(&self, rect: &Rect) -> SpatialResult<Vec<&T>> {
        RTree::search_intersect(self, rect)
    }

    fn search_contains(&self, rect: &Rect) -> SpatialResult<Vec<&T>> {
        RTree::search_contains(self, rect)
    }

    fn nearest_neighbors(&self, k: usize, point: &Point) -> SpatialResult<Vec<(&T, f64)>> {
        RTree::nearest_neighbors(self, k, point)
    }

    fn within_distance(&self, point: &Point, distance: f64) -> SpatialResult<Vec<(&T, f64)>> {
        RTree::within_distance(self, point, distance)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        RTree::clear(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
