//! Core types and data structures for the R-Tree.
//!
//! This module defines the fundamental types used throughout the R-Tree:
//! - Error types and result types
//! - Node and entry types (leaf and internal entries)
//! - Statistics structures

use thiserror::Error;

use crate::geometry::Rect;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations.
///
/// All of them describe caller misuse. They are reported synchronously and
/// never retried; a rejected operation leaves the tree unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Non-positive length {length} in dimension {dimension}")]
    NonPositiveLength { dimension: usize, length: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Node ID - index of a node slot in the tree's arena
pub type NodeId = usize;

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about the shape of an R-Tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RTreeStats {
    /// Number of stored objects
    pub total_entries: u64,
    /// Number of live nodes, leaves included
    pub node_count: u64,
    /// Number of leaf nodes
    pub leaf_count: u64,
    /// Level of the root (0 when the root is a leaf)
    pub tree_height: u32,
}

// ============================================================================
// Node Types
// ============================================================================

/// What an entry points at.
#[derive(Debug, Clone)]
pub(crate) enum EntryKind<T> {
    /// Caller payload, found only in leaves
    Leaf(T),
    /// Owned child node, found only in internal nodes
    Internal(NodeId),
}

/// A bounding rectangle paired with a payload or a child node.
///
/// The rectangle is always the exact MBR of what the entry references.
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    pub(crate) rect: Rect,
    pub(crate) kind: EntryKind<T>,
}

impl<T> Entry<T> {
    pub(crate) fn leaf(rect: Rect, payload: T) -> Self {
        Self {
            rect,
            kind: EntryKind::Leaf(payload),
        }
    }

    pub(crate) fn internal(rect: Rect, child: NodeId) -> Self {
        Self {
            rect,
            kind: EntryKind::Internal(child),
        }
    }

    pub(crate) fn child(&self) -> Option<NodeId> {
        match self.kind {
            EntryKind::Internal(id) => Some(id),
            EntryKind::Leaf(_) => None,
        }
    }
}

/// A node in the R-Tree arena.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// Height from leaf level (leaves are 0)
    pub(crate) level: u32,
    /// Parent node; `None` for the root
    pub(crate) parent: Option<NodeId>,
    pub(crate) entries: Vec<Entry<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(level: u32, parent: Option<NodeId>) -> Self {
        Self {
            level,
            parent,
            entries: Vec::new(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.level == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the bounding box enclosing all entries, `None` when empty
    pub(crate) fn compute_bbox(&self) -> Option<Rect> {
        let mut iter = self.entries.iter();
        let first = iter.next()?.rect.clone();
        Some(iter.fold(first, |acc, e| acc.union_unchecked(&e.rect)))
    }

    /// Position of the entry referencing `child`
    pub(crate) fn child_index(&self, child: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.child() == Some(child))
    }
}
