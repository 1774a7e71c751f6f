//! Quadratic node split.
//!
//! Seeds are the pair of entries that would waste the most area if placed in
//! the same node. The remaining entries are then assigned one at a time,
//! always taking next the entry with the strongest preference for one group.
//! Ties are broken deterministically:
//! - seeds: first maximal pair in index order
//! - next entry: first entry with the maximal preference
//! - assignment: smaller group area, then fewer entries, then the first group

use std::cmp::Ordering;

use crate::geometry::Rect;

use super::rtree_types::Entry;

/// One side of a split with its running bounding box
struct Group<T> {
    entries: Vec<Entry<T>>,
    bbox: Rect,
}

impl<T> Group<T> {
    fn new(seed: Entry<T>) -> Self {
        Self {
            bbox: seed.rect.clone(),
            entries: vec![seed],
        }
    }

    fn push(&mut self, entry: Entry<T>) {
        self.bbox = self.bbox.union_unchecked(&entry.rect);
        self.entries.push(entry);
    }

    fn absorb(&mut self, rest: Vec<Entry<T>>) {
        for entry in rest {
            self.push(entry);
        }
    }
}

/// Redistribute an overfull node's entries into two groups, each holding at
/// least `min_entries` entries.
pub(crate) fn quadratic_split<T>(
    mut entries: Vec<Entry<T>>,
    min_entries: usize,
) -> (Vec<Entry<T>>, Vec<Entry<T>>) {
    if entries.len() < 2 {
        return (entries, Vec::new());
    }

    let (seed1, seed2) = pick_seeds(&entries);
    let entry2 = entries.remove(seed2);
    let entry1 = entries.remove(seed1);

    let mut group1 = Group::new(entry1);
    let mut group2 = Group::new(entry2);

    while !entries.is_empty() {
        // Hand everything left to a group that needs it to reach minimum fill
        if group1.entries.len() + entries.len() <= min_entries {
            group1.absorb(std::mem::take(&mut entries));
            break;
        }
        if group2.entries.len() + entries.len() <= min_entries {
            group2.absorb(std::mem::take(&mut entries));
            break;
        }

        let idx = pick_next(&entries, &group1.bbox, &group2.bbox);
        let entry = entries.remove(idx);

        if prefers_first(&group1, &group2, &entry.rect) {
            group1.push(entry);
        } else {
            group2.push(entry);
        }
    }

    (group1.entries, group2.entries)
}

/// Find the two entries that would waste most area if grouped together
fn pick_seeds<T>(entries: &[Entry<T>]) -> (usize, usize) {
    let mut max_waste = f64::NEG_INFINITY;
    let mut seeds = (0, 1);

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (a, b) = (&entries[i].rect, &entries[j].rect);
            let waste = a.union_unchecked(b).size() - a.size() - b.size();
            if waste > max_waste {
                max_waste = waste;
                seeds = (i, j);
            }
        }
    }

    seeds
}

/// Entry whose enlargement cost differs most between the two groups
fn pick_next<T>(entries: &[Entry<T>], bbox1: &Rect, bbox2: &Rect) -> usize {
    let mut max_diff = f64::NEG_INFINITY;
    let mut next = 0;

    for (i, entry) in entries.iter().enumerate() {
        let d1 = bbox1.enlargement_unchecked(&entry.rect);
        let d2 = bbox2.enlargement_unchecked(&entry.rect);
        let diff = (d1 - d2).abs();
        if diff > max_diff {
            max_diff = diff;
            next = i;
        }
    }

    next
}

fn prefers_first<T>(group1: &Group<T>, group2: &Group<T>, rect: &Rect) -> bool {
    let d1 = group1.bbox.enlargement_unchecked(rect);
    let d2 = group2.bbox.enlargement_unchecked(rect);

    d1.total_cmp(&d2)
        .then_with(|| group1.bbox.size().total_cmp(&group2.bbox.size()))
        .then_with(|| group1.entries.len().cmp(&group2.entries.len()))
        != Ordering::Greater
}
