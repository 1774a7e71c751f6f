//! Insertion: ChooseLeaf, node splitting and AdjustTree.

use crate::geometry::Rect;

use super::rtree_impl::RTree;
use super::rtree_split::quadratic_split;
use super::rtree_types::{Entry, Node, NodeId, SpatialResult};

impl<T> RTree<T> {
    /// Insert an object with its bounding rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`](crate::SpatialError::DimensionMismatch)
    /// if `rect` does not match the tree's dimension; the tree is left
    /// unchanged.
    pub fn insert(&mut self, rect: Rect, payload: T) -> SpatialResult<()> {
        self.check_rect(&rect)?;
        log::trace!("Inserting entry at {}", rect);

        self.insert_entry(Entry::leaf(rect, payload), 0);
        self.size += 1;
        Ok(())
    }

    /// Insert an entry into a node at `level`, splitting and propagating
    /// upward as needed. Leaf objects go in at level 0; subtrees orphaned by
    /// deletion re-enter at the level they were removed from.
    pub(crate) fn insert_entry(&mut self, entry: Entry<T>, level: u32) {
        let target = self.choose_node(&entry.rect, level);

        if let Some(child) = entry.child() {
            self.node_mut(child).parent = Some(target);
        }
        self.node_mut(target).entries.push(entry);

        let split = self.split_if_overfull(target);
        self.adjust_tree(target, split);
    }

    /// Descend from the root to the node at `level` whose rectangle needs the
    /// least enlargement to cover `rect`.
    fn choose_node(&self, rect: &Rect, level: u32) -> NodeId {
        let mut current = self.root;

        loop {
            let node = self.node(current);
            if node.level <= level {
                return current;
            }

            // Choose child with minimum enlargement, then minimum area
            let mut best: Option<(NodeId, f64, f64)> = None;
            for entry in &node.entries {
                let Some(child) = entry.child() else {
                    continue;
                };
                let enlargement = entry.rect.enlargement_unchecked(rect);
                let area = entry.rect.size();

                let better = match best {
                    None => true,
                    Some((_, best_enlargement, best_area)) => {
                        enlargement < best_enlargement
                            || (enlargement == best_enlargement && area < best_area)
                    }
                };
                if better {
                    best = Some((child, enlargement, area));
                }
            }

            match best {
                Some((child, _, _)) => current = child,
                None => return current,
            }
        }
    }

    /// Split `id` if it holds more than `max_entries`, returning the new
    /// sibling.
    pub(crate) fn split_if_overfull(&mut self, id: NodeId) -> Option<NodeId> {
        if self.node(id).len() > self.config.max_entries() {
            Some(self.split_node(id))
        } else {
            None
        }
    }

    /// Split an overfull node. The first group stays in `id`, the second
    /// moves to a newly allocated sibling at the same level.
    fn split_node(&mut self, id: NodeId) -> NodeId {
        let (level, parent) = {
            let node = self.node(id);
            (node.level, node.parent)
        };
        let entries = std::mem::take(&mut self.node_mut(id).entries);
        let (remaining, moved) = quadratic_split(entries, self.config.min_entries());

        log::debug!(
            "Splitting node {} at level {} into {} + {} entries",
            id,
            level,
            remaining.len(),
            moved.len()
        );

        self.node_mut(id).entries = remaining;

        let sibling = self.allocate_node(Node::new(level, parent));
        for child in moved.iter().filter_map(|e| e.child()) {
            self.node_mut(child).parent = Some(sibling);
        }
        self.node_mut(sibling).entries = moved;
        sibling
    }

    /// Walk from `id` to the root, refreshing each node's rectangle in its
    /// parent and installing split siblings, splitting parents in turn.
    fn adjust_tree(&mut self, mut id: NodeId, mut split: Option<NodeId>) {
        while let Some(parent) = self.node(id).parent {
            self.refresh_parent_rect(id);

            if let Some(sibling) = split.take() {
                if let Some(bbox) = self.node(sibling).compute_bbox() {
                    self.node_mut(sibling).parent = Some(parent);
                    self.node_mut(parent).entries.push(Entry::internal(bbox, sibling));
                }
                split = self.split_if_overfull(parent);
            }

            id = parent;
        }

        if let Some(sibling) = split {
            self.grow_root(sibling);
        }
    }

    /// Replace the root with a new node holding the old root and its split
    /// sibling.
    fn grow_root(&mut self, sibling: NodeId) {
        let old_root = self.root;
        let level = self.node(old_root).level + 1;

        let mut new_root = Node::new(level, None);
        for child in [old_root, sibling] {
            if let Some(bbox) = self.node(child).compute_bbox() {
                new_root.entries.push(Entry::internal(bbox, child));
            }
        }

        let new_root_id = self.allocate_node(new_root);
        self.node_mut(old_root).parent = Some(new_root_id);
        self.node_mut(sibling).parent = Some(new_root_id);
        self.root = new_root_id;

        log::debug!("Root split, tree height is now {}", level + 1);
    }
}
