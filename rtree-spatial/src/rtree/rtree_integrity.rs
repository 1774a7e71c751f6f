//! Structural integrity checking.
//!
//! Walks the tree from the root and verifies every maintained invariant:
//! - non-root nodes hold between `min_entries` and `max_entries` entries
//! - all leaves sit at level 0 and each child is one level below its parent
//! - every internal rectangle is exactly the MBR of its child
//! - parent links point back at the node holding the entry
//! - the object count matches the number of leaf entries

use super::rtree_impl::RTree;
use super::rtree_types::{EntryKind, NodeId};

/// Result of an integrity check
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes checked
    pub nodes_checked: u64,
    /// Leaf entries counted
    pub entries_counted: u64,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_counted: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    /// Check the structural invariants of the tree.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();

        let root = self.node(self.root);
        if root.parent.is_some() {
            report.fail(format!("Root {} has a parent link", self.root));
        }
        if root.len() > self.config.max_entries() {
            report.fail(format!("Root {} holds {} entries", self.root, root.len()));
        }

        self.check_node(self.root, &mut report);

        if report.entries_counted != self.size as u64 {
            report.fail(format!(
                "Size is {} but {} leaf entries were found",
                self.size, report.entries_counted
            ));
        }

        if !report.is_valid {
            log::warn!("R-Tree integrity check failed: {:?}", report.errors);
        }
        report
    }

    fn check_node(&self, id: NodeId, report: &mut IntegrityReport) {
        report.nodes_checked += 1;
        let node = self.node(id);

        if id != self.root {
            let len = node.len();
            if len < self.config.min_entries() || len > self.config.max_entries() {
                report.fail(format!(
                    "Node {} at level {} holds {} entries",
                    id, node.level, len
                ));
            }
        }

        for entry in &node.entries {
            match &entry.kind {
                EntryKind::Leaf(_) => {
                    report.entries_counted += 1;
                    if !node.is_leaf() {
                        report.fail(format!("Object stored in internal node {}", id));
                    }
                }
                EntryKind::Internal(child_id) => {
                    let child = self.node(*child_id);
                    if child.level + 1 != node.level {
                        report.fail(format!(
                            "Child {} at level {} under node {} at level {}",
                            child_id, child.level, id, node.level
                        ));
                    }
                    if child.parent != Some(id) {
                        report.fail(format!(
                            "Child {} links to parent {:?} instead of {}",
                            child_id, child.parent, id
                        ));
                    }
                    if child.compute_bbox().as_ref() != Some(&entry.rect) {
                        report.fail(format!(
                            "Entry rectangle {} in node {} is not the MBR of child {}",
                            entry.rect, id, child_id
                        ));
                    }
                    self.check_node(*child_id, report);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{Point, Rect};
    use crate::rtree::rtree_impl::RTree;

    fn filled_tree() -> RTree<u32> {
        let mut tree = RTree::new(2, 2, 4).unwrap();
        for i in 0..40u32 {
            let p = Point::from([(i % 8) as f64, (i / 8) as f64]);
            tree.insert(Rect::new(&p, &[0.5, 0.5]).unwrap(), i).unwrap();
        }
        tree
    }

    #[test]
    fn test_integrity_empty_tree() {
        let tree: RTree<u32> = RTree::new(2, 2, 4).unwrap();
        let report = tree.check_integrity();
        assert!(report.is_valid);
        assert_eq!(report.nodes_checked, 1);
        assert_eq!(report.entries_counted, 0);
    }

    #[test]
    fn test_integrity_populated_tree() {
        let tree = filled_tree();
        let report = tree.check_integrity();
        assert!(report.is_valid, "{:?}", report.errors);
        assert_eq!(report.entries_counted, 40);
        assert_eq!(report.nodes_checked, tree.stats().node_count);
    }

    #[test]
    fn test_integrity_detects_stale_rect() {
        let mut tree = filled_tree();
        let root = tree.root;
        tree.node_mut(root).entries[0].rect = Rect::from_point(&Point::from([100.0, 100.0]));

        let report = tree.check_integrity();
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("not the MBR")));
    }

    #[test]
    fn test_integrity_detects_size_mismatch() {
        let mut tree = filled_tree();
        tree.size += 1;
        let report = tree.check_integrity();
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.starts_with("Size is 41")));
    }

    #[test]
    fn test_integrity_detects_underfull_node() {
        let mut tree = filled_tree();
        let root = tree.root;
        let child = tree.node(root).entries[0].child().unwrap();
        let keep = tree.node(child).entries[0].clone();
        tree.node_mut(child).entries = vec![keep];

        let report = tree.check_integrity();
        assert!(!report.is_valid);
    }
}
