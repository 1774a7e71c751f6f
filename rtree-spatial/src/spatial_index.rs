//! SpatialIndex trait definition.

use crate::geometry::{Point, Rect};
use crate::rtree::rtree_types::SpatialResult;

/// Represents a spatial index mapping rectangles to payloads.
///
/// This trait defines the interface for spatial indexing operations, so
/// callers can hold an index behind `dyn SpatialIndex<T>` independent of the
/// tree configuration.
pub trait SpatialIndex<T> {
    /// Adds an object with its bounding rectangle.
    fn insert(&mut self, rect: Rect, payload: T) -> SpatialResult<()>;

    /// Removes one object equal to `payload`, searching the whole index.
    fn delete(&mut self, payload: &T) -> bool;

    /// Removes the object stored under `rect` that equals `payload`.
    fn remove(&mut self, rect: &Rect, payload: &T) -> SpatialResult<bool>;

    /// Finds the objects whose rectangle intersects `rect`.
    fn search_intersect(&self, rect: &Rect) -> SpatialResult<Vec<&T>>;

    /// Finds the objects whose rectangle lies inside `rect`.
    fn search_contains(&self, rect: &Rect) -> SpatialResult<Vec<&T>>;

    /// Finds the K nearest objects to a point using branch-and-bound search.
    fn nearest_neighbors(&self, k: usize, point: &Point) -> SpatialResult<Vec<(&T, f64)>>;

    /// Finds the nearest object to a point.
    fn nearest_neighbor(&self, point: &Point) -> SpatialResult<Option<&T>> {
        Ok(self
            .nearest_neighbors(1, point)?
            .into_iter()
            .next()
            .map(|(payload, _)| payload))
    }

    /// Finds objects within a specific distance of a point (range query).
    fn within_distance(&self, point: &Point, distance: f64) -> SpatialResult<Vec<(&T, f64)>>;

    /// Gets the number of stored objects.
    fn size(&self) -> usize;

    /// Clears all data from the index.
    fn clear(&mut self);
}
