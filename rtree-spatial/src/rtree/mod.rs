//! In-memory R-Tree implementation.
//!
//! This module provides a dynamic R-Tree designed around an arena of nodes:
//! - Quadratic split on overflow, with splits propagated to the root
//! - Condensing delete that reinserts entries of underfull nodes at their
//!   original level, keeping the tree height-balanced
//! - Range queries and best-first nearest neighbor search with
//!   `min_dist`/`min_max_dist` pruning
//!
//! Nodes are addressed by index and carry their parent's index, so upward
//! propagation never needs shared ownership.

pub mod rtree_config;
pub mod rtree_constants;
pub mod rtree_integrity;
pub mod rtree_types;
mod rtree_delete;
mod rtree_impl;
mod rtree_insert;
mod rtree_search;
mod rtree_split;

pub use rtree_config::RTreeConfig;
pub use rtree_constants::{DEFAULT_DIMENSION, DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES};
pub use rtree_impl::RTree;
pub use rtree_integrity::IntegrityReport;
pub use rtree_types::{NodeId, RTreeStats, SpatialError, SpatialResult};
