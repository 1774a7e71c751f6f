//! Range search and branch-and-bound nearest neighbor search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::{Point, Rect};

use super::rtree_impl::RTree;
use super::rtree_types::{EntryKind, NodeId, SpatialResult};

/// What a queued nearest neighbor candidate refers to
#[derive(Debug, Clone, Copy)]
enum Target {
    Node(NodeId),
    /// Leaf node and entry position of a stored object
    Object(NodeId, usize),
}

/// Queue element ordered so that `BinaryHeap` pops the smallest `min_dist`
#[derive(Debug, Clone, Copy)]
struct Candidate {
    min_dist: f64,
    target: Target,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.min_dist == other.min_dist
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smaller distance = higher priority
        other.min_dist.total_cmp(&self.min_dist)
    }
}

/// The best candidates found so far, ascending by squared distance
struct Neighbors<'a, T> {
    k: usize,
    found: Vec<(&'a T, f64)>,
    /// Squared distance beyond which nothing is accepted
    limit: f64,
}

impl<'a, T> Neighbors<'a, T> {
    fn new(k: usize, limit: f64) -> Self {
        Self {
            k,
            found: Vec::new(),
            limit,
        }
    }

    /// Worst accepted squared distance; the limit until the list is full
    fn worst(&self) -> f64 {
        if self.found.len() < self.k {
            self.limit
        } else {
            self.found.last().map_or(self.limit, |(_, d)| *d)
        }
    }

    fn offer(&mut self, payload: &'a T, dist: f64) {
        if dist > self.limit || (self.found.len() >= self.k && dist >= self.worst()) {
            return;
        }
        let pos = self.found.partition_point(|(_, d)| *d <= dist);
        self.found.insert(pos, (payload, dist));
        self.found.truncate(self.k);
    }

    fn into_sorted(self) -> Vec<(&'a T, f64)> {
        self.found
            .into_iter()
            .map(|(payload, dist)| (payload, dist.sqrt()))
            .collect()
    }
}

impl<T> RTree<T> {
    /// Find every object whose rectangle intersects `rect`.
    ///
    /// Objects that merely touch `rect` along a boundary are not returned.
    pub fn search_intersect(&self, rect: &Rect) -> SpatialResult<Vec<&T>> {
        self.check_rect(rect)?;
        let mut results = Vec::new();
        self.search_recursive(self.root, rect, &mut results);
        Ok(results)
    }

    /// Find every object whose rectangle lies entirely inside `rect`.
    pub fn search_contains(&self, rect: &Rect) -> SpatialResult<Vec<&T>> {
        self.check_rect(rect)?;
        let mut results = Vec::new();
        self.search_contained_recursive(self.root, rect, &mut results);
        Ok(results)
    }

    /// Find every object whose rectangle contains `point`, boundary included.
    pub fn search_point(&self, point: &Point) -> SpatialResult<Vec<&T>> {
        self.check_point(point)?;
        let mut results = Vec::new();
        self.search_point_recursive(self.root, point, &mut results);
        Ok(results)
    }

    /// The object nearest to `point`, or `None` for an empty tree.
    pub fn nearest_neighbor(&self, point: &Point) -> SpatialResult<Option<&T>> {
        Ok(self
            .nearest_neighbors(1, point)?
            .into_iter()
            .next()
            .map(|(payload, _)| payload))
    }

    /// Find the `k` objects nearest to `point`.
    ///
    /// The distance to an object is the Euclidean distance from `point` to
    /// the closest point of its rectangle (zero when inside). Results are
    /// sorted nearest first and hold `min(k, size)` pairs.
    pub fn nearest_neighbors(&self, k: usize, point: &Point) -> SpatialResult<Vec<(&T, f64)>> {
        self.check_point(point)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        Ok(self.find_nearest(point, Neighbors::new(k, f64::INFINITY)))
    }

    /// Find every object within `distance` of `point`, nearest first.
    pub fn within_distance(&self, point: &Point, distance: f64) -> SpatialResult<Vec<(&T, f64)>> {
        self.check_point(point)?;
        if !(distance >= 0.0) {
            return Ok(Vec::new());
        }
        Ok(self.find_nearest(point, Neighbors::new(usize::MAX, distance * distance)))
    }

    /// Recursive search for intersecting entries.
    /// Only descends into children whose rectangle touches the query.
    fn search_recursive<'a>(&'a self, id: NodeId, query: &Rect, results: &mut Vec<&'a T>) {
        for entry in &self.node(id).entries {
            match &entry.kind {
                EntryKind::Leaf(payload) => {
                    if entry.rect.intersects_unchecked(query) {
                        results.push(payload);
                    }
                }
                EntryKind::Internal(child) => {
                    if entry.rect.touches_unchecked(query) {
                        self.search_recursive(*child, query, results);
                    }
                }
            }
        }
    }

    /// Recursive search for contained entries
    fn search_contained_recursive<'a>(&'a self, id: NodeId, query: &Rect, results: &mut Vec<&'a T>) {
        for entry in &self.node(id).entries {
            match &entry.kind {
                EntryKind::Leaf(payload) => {
                    if query.contains_rect_unchecked(&entry.rect) {
                        results.push(payload);
                    }
                }
                EntryKind::Internal(child) => {
                    // A contained entry can sit in a child that only
                    // partially overlaps the query
                    if entry.rect.touches_unchecked(query) {
                        self.search_contained_recursive(*child, query, results);
                    }
                }
            }
        }
    }

    fn search_point_recursive<'a>(&'a self, id: NodeId, point: &Point, results: &mut Vec<&'a T>) {
        for entry in &self.node(id).entries {
            if !entry.rect.contains_point_unchecked(point) {
                continue;
            }
            match &entry.kind {
                EntryKind::Leaf(payload) => results.push(payload),
                EntryKind::Internal(child) => self.search_point_recursive(*child, point, results),
            }
        }
    }

    /// Best-first traversal ordered by `min_dist`.
    ///
    /// Stops as soon as the closest queued candidate is farther than the
    /// worst accepted neighbor, since `min_dist` never overestimates. For a
    /// single neighbor, children are also pruned against the smallest
    /// `min_max_dist` among their siblings.
    fn find_nearest<'a>(&'a self, point: &Point, mut neighbors: Neighbors<'a, T>) -> Vec<(&'a T, f64)> {
        let mut queue = BinaryHeap::new();
        self.enqueue_children(self.root, point, &neighbors, &mut queue);

        while let Some(candidate) = queue.pop() {
            if candidate.min_dist > neighbors.worst() {
                break;
            }

            match candidate.target {
                Target::Object(leaf, idx) => {
                    if let EntryKind::Leaf(payload) = &self.node(leaf).entries[idx].kind {
                        neighbors.offer(payload, candidate.min_dist);
                    }
                }
                Target::Node(id) => self.enqueue_children(id, point, &neighbors, &mut queue),
            }
        }

        neighbors.into_sorted()
    }

    fn enqueue_children(
        &self,
        id: NodeId,
        point: &Point,
        neighbors: &Neighbors<'_, T>,
        queue: &mut BinaryHeap<Candidate>,
    ) {
        let node = self.node(id);
        let mut bound = neighbors.worst();

        if neighbors.k == 1 && !node.is_leaf() {
            let min_max = node
                .entries
                .iter()
                .map(|e| point.min_max_dist_unchecked(&e.rect))
                .fold(f64::INFINITY, f64::min);
            bound = bound.min(min_max);
        }

        for (idx, entry) in node.entries.iter().enumerate() {
            let min_dist = point.min_dist_unchecked(&entry.rect);
            if min_dist > bound {
                continue;
            }
            let target = match entry.kind {
                EntryKind::Leaf(_) => Target::Object(id, idx),
                EntryKind::Internal(child) => Target::Node(child),
            };
            queue.push(Candidate { min_dist, target });
        }
    }
}
