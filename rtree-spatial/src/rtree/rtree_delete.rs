//! Deletion: FindLeaf, CondenseTree and root collapse.

use crate::geometry::Rect;

use super::rtree_impl::RTree;
use super::rtree_types::{Entry, EntryKind, NodeId, SpatialResult};

impl<T> RTree<T> {
    /// Remove one object equal to `payload`, wherever it is stored.
    ///
    /// Without a rectangle to steer by, every subtree may have to be visited.
    /// Prefer [`RTree::remove`] when the object's rectangle is known.
    ///
    /// Returns `true` if an object was found and removed.
    pub fn delete(&mut self, payload: &T) -> bool
    where
        T: PartialEq,
    {
        self.delete_where(None, |candidate| candidate == payload)
    }

    /// Remove the object stored under exactly `rect` that equals `payload`.
    ///
    /// Only subtrees whose rectangle contains `rect` are searched.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`](crate::SpatialError::DimensionMismatch)
    /// if `rect` does not match the tree's dimension.
    pub fn remove(&mut self, rect: &Rect, payload: &T) -> SpatialResult<bool>
    where
        T: PartialEq,
    {
        self.remove_with(rect, |candidate| candidate == payload)
    }

    /// Like [`RTree::remove`], identifying the object with a caller supplied
    /// predicate instead of `PartialEq`.
    pub fn remove_with<F>(&mut self, rect: &Rect, matches: F) -> SpatialResult<bool>
    where
        F: Fn(&T) -> bool,
    {
        self.check_rect(rect)?;
        Ok(self.delete_where(Some(rect), matches))
    }

    fn delete_where<F>(&mut self, rect: Option<&Rect>, matches: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let Some((leaf, idx)) = self.find_leaf(self.root, rect, &matches) else {
            log::trace!("Entry to delete was not found");
            return false;
        };

        self.node_mut(leaf).entries.remove(idx);
        self.size -= 1;
        log::trace!("Removed entry from leaf {}", leaf);

        self.condense_tree(leaf);
        self.collapse_root();
        true
    }

    /// Locate the leaf and position of the first matching object. All
    /// subtrees that could hold it are checked since rectangles overlap.
    fn find_leaf<F>(&self, id: NodeId, rect: Option<&Rect>, matches: &F) -> Option<(NodeId, usize)>
    where
        F: Fn(&T) -> bool,
    {
        let node = self.node(id);
        for (idx, entry) in node.entries.iter().enumerate() {
            match &entry.kind {
                EntryKind::Leaf(payload) => {
                    if rect.map_or(true, |r| entry.rect == *r) && matches(payload) {
                        return Some((id, idx));
                    }
                }
                EntryKind::Internal(child) => {
                    if rect.map_or(true, |r| entry.rect.contains_rect_unchecked(r)) {
                        if let Some(found) = self.find_leaf(*child, rect, matches) {
                            return Some(found);
                        }
                    }
                }
            }
        }
        None
    }

    /// Walk from `leaf` to the root. Underfull nodes are unlinked and their
    /// entries collected; the rest get their parent rectangles refreshed.
    /// Collected entries are then reinserted at the level they came from.
    fn condense_tree(&mut self, leaf: NodeId) {
        let mut orphans: Vec<(Entry<T>, u32)> = Vec::new();
        let mut id = leaf;

        while let Some(parent) = self.node(id).parent {
            if self.node(id).len() < self.config.min_entries() {
                if let Some(idx) = self.node(parent).child_index(id) {
                    self.node_mut(parent).entries.remove(idx);
                }
                let removed = self.free_node(id);
                let level = removed.level;
                orphans.extend(removed.entries.into_iter().map(|e| (e, level)));
            } else {
                self.refresh_parent_rect(id);
            }
            id = parent;
        }

        if orphans.is_empty() {
            return;
        }

        log::debug!("Condensing tree, reinserting {} orphaned entries", orphans.len());
        for (entry, level) in orphans {
            self.insert_entry(entry, level);
        }
    }

    /// While the root is internal with a single child, promote that child.
    fn collapse_root(&mut self) {
        loop {
            let root = self.node(self.root);
            if root.is_leaf() || root.len() != 1 {
                return;
            }
            let Some(child) = root.entries[0].child() else {
                return;
            };

            let old_root = self.root;
            self.free_node(old_root);
            self.node_mut(child).parent = None;
            self.root = child;

            log::debug!("Root collapsed, tree height is now {}", self.depth());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{Point, Rect};
    use crate::rtree::rtree_impl::RTree;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(&Point::from([x, y]), &[w, h]).unwrap()
    }

    fn grid_tree(n: u32, min: usize, max: usize) -> RTree<u32> {
        let mut tree = RTree::new(2, min, max).unwrap();
        for i in 0..n {
            let x = (i % 10) as f64 * 2.0;
            let y = (i / 10) as f64 * 2.0;
            tree.insert(rect(x, y, 1.0, 1.0), i).unwrap();
        }
        tree
    }

    #[test]
    fn test_delete_missing() {
        let mut tree = grid_tree(10, 2, 4);
        assert!(!tree.delete(&100));
        assert_eq!(tree.size(), 10);

        let mut empty: RTree<u32> = RTree::new(2, 2, 4).unwrap();
        assert!(!empty.delete(&1));
    }

    #[test]
    fn test_delete_single() {
        let mut tree = grid_tree(1, 2, 4);
        assert!(tree.delete(&0));
        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 1);
        assert!(tree.check_integrity().is_valid);
    }

    #[test]
    fn test_remove_requires_matching_rect() {
        let mut tree = grid_tree(30, 2, 4);
        assert!(!tree.remove(&rect(0.0, 0.0, 5.0, 5.0), &0).unwrap());
        assert!(!tree.remove(&rect(0.0, 0.0, 1.0, 1.0), &1).unwrap());
        assert!(tree.remove(&rect(0.0, 0.0, 1.0, 1.0), &0).unwrap());
        assert_eq!(tree.size(), 29);
        assert!(tree.search_intersect(&rect(0.0, 0.0, 1.0, 1.0)).unwrap().is_empty());
    }

    #[test]
    fn test_remove_with_comparator() {
        let mut tree: RTree<(u32, &str)> = RTree::new(2, 2, 4).unwrap();
        tree.insert(rect(0.0, 0.0, 1.0, 1.0), (1, "a")).unwrap();
        tree.insert(rect(0.0, 0.0, 1.0, 1.0), (2, "b")).unwrap();

        let removed = tree
            .remove_with(&rect(0.0, 0.0, 1.0, 1.0), |(id, _)| *id == 2)
            .unwrap();
        assert!(removed);
        assert_eq!(tree.entries()[0].1, &(1, "a"));
    }

    #[test]
    fn test_remove_dimension_mismatch() {
        let mut tree = grid_tree(5, 2, 4);
        let bad = Rect::from_point(&Point::from([0.0]));
        assert!(tree.remove(&bad, &0).is_err());
        assert_eq!(tree.size(), 5);
    }

    #[test]
    fn test_delete_all_keeps_invariants() {
        let mut tree = grid_tree(100, 2, 4);
        for i in 0..100u32 {
            assert!(tree.delete(&i), "missing {}", i);
            let report = tree.check_integrity();
            assert!(report.is_valid, "after delete {}: {:?}", i, report.errors);
            assert_eq!(tree.size(), (99 - i) as usize);
        }
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.stats().node_count, 1);
    }

    #[test]
    fn test_delete_in_reverse_shrinks_height() {
        let mut tree = grid_tree(100, 2, 4);
        let tall = tree.depth();
        assert!(tall >= 3);

        for i in (5..100u32).rev() {
            assert!(tree.remove(&rect((i % 10) as f64 * 2.0, (i / 10) as f64 * 2.0, 1.0, 1.0), &i).unwrap());
        }
        assert!(tree.depth() < tall);
        assert!(tree.check_integrity().is_valid);

        let mut remaining: Vec<u32> = tree.entries().into_iter().map(|(_, id)| *id).collect();
        remaining.sort_unstable();
        assert_eq!(remaining, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_delete_then_reinsert() {
        let mut tree = grid_tree(50, 2, 4);
        let target = rect(4.0, 2.0, 1.0, 1.0);

        assert!(tree.delete(&12));
        assert_eq!(tree.size(), 49);
        tree.insert(target.clone(), 12).unwrap();
        assert_eq!(tree.size(), 50);

        let found = tree.search_intersect(&target).unwrap();
        assert_eq!(found, vec![&12]);
        assert!(tree.check_integrity().is_valid);
    }

    #[test]
    fn test_delete_duplicate_payloads_one_at_a_time() {
        let mut tree = RTree::new(2, 1, 3).unwrap();
        for i in 0..6 {
            tree.insert(rect(i as f64, 0.0, 1.0, 1.0), "dup").unwrap();
        }
        for remaining in (0..6).rev() {
            assert!(tree.delete(&"dup"));
            assert_eq!(tree.size(), remaining);
        }
        assert!(!tree.delete(&"dup"));
    }
}
