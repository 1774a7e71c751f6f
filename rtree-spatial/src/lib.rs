//! # RTree Spatial - Multidimensional R-Tree Index
//!
//! This crate provides an in-memory R-Tree storing axis-aligned bounding
//! rectangles together with arbitrary payloads, answering range and nearest
//! neighbor queries without scanning every object.
//!
//! ## Features
//!
//! - **Any Dimension**: fixed per tree at construction time
//! - **Quadratic Split**: classic Guttman insertion with configurable fill
//!   bounds `(m, M)`
//! - **Condensing Delete**: underfull nodes are dissolved and their entries
//!   reinserted, keeping the tree height-balanced
//! - **Range Queries**: intersection, containment and point queries
//! - **Nearest Neighbors**: best-first branch-and-bound search pruned with
//!   `min_dist` and `min_max_dist`
//!
//! The tree is not internally synchronized. Mutating operations take
//! `&mut self`; share a tree across threads behind a lock.
//!
//! ## R-Tree API
//!
//! ```rust
//! use rtree_spatial::{Point, RTree, Rect};
//!
//! # fn main() -> Result<(), rtree_spatial::SpatialError> {
//! let mut tree = RTree::new(2, 2, 8)?;
//!
//! tree.insert(Rect::new(&Point::from([0.0, 0.0]), &[10.0, 10.0])?, 1)?;
//! tree.insert(Rect::new(&Point::from([20.0, 20.0]), &[5.0, 5.0])?, 2)?;
//!
//! let query = Rect::new(&Point::from([5.0, 5.0]), &[10.0, 10.0])?;
//! assert_eq!(tree.search_intersect(&query)?, vec![&1]);
//!
//! let nearest = tree.nearest_neighbors(1, &Point::from([19.0, 19.0]))?;
//! assert_eq!(nearest[0].0, &2);
//!
//! assert!(tree.delete(&1));
//! assert_eq!(tree.size(), 1);
//! # Ok(())
//! # }
//! ```

pub mod geometry;
pub mod rtree;
pub mod spatial_index;

// Re-export geometry types
pub use geometry::{Point, Rect};

// Re-export R-Tree types
pub use rtree::{
    IntegrityReport, NodeId, RTree, RTreeConfig, RTreeStats, SpatialError, SpatialResult,
};
pub use spatial_index::SpatialIndex;
