//! Best-first nearest-neighbor search.
//!
//! Nodes are expanded in order of their minimum distance to the query point
//! using a [`MinQueue`]. Anything whose minimum distance is not below the
//! current best can be skipped, since no entry inside it can be closer.

use crate::priority_queue::MinQueue;

use super::rtree_impl::RTree;
use super::rtree_types::{Entry, Neighbor, NodeId};

impl<P> RTree<P> {
    /// Find the leaf entry closest to the point `(x, y)`.
    ///
    /// Distance is the Euclidean distance from the point to the nearest
    /// point of the entry's rectangle; points inside a rectangle are at
    /// distance 0. Returns `None` for an empty tree. On ties any one of the
    /// closest entries may be returned.
    pub fn nearest_neighbor(&self, x: f64, y: f64) -> Option<Neighbor<'_, P>> {
        let mut queue: MinQueue<NodeId> = MinQueue::new();
        queue.push(0.0, self.root);

        let mut best_distance = f64::INFINITY;
        let mut best: Option<&Entry<P>> = None;

        while let Some((key, node_id)) = queue.pop() {
            if key >= best_distance {
                continue;
            }

            for entry in &self.node_at(node_id).entries {
                let distance = entry.rect.min_distance(x, y);
                if distance >= best_distance {
                    continue;
                }
                match entry.child_id() {
                    Some(child) => queue.push(distance, child),
                    None => {
                        best_distance = distance;
                        best = Some(entry);
                    }
                }
            }
        }

        let entry = best?.as_spatial()?;
        Some(Neighbor {
            entry,
            distance: best_distance,
        })
    }

    /// Find up to `k` leaf entries closest to `(x, y)`, nearest first.
    pub fn nearest_neighbors(&self, x: f64, y: f64, k: usize) -> Vec<Neighbor<'_, P>> {
        self.nearest_within(x, y, k, f64::INFINITY)
    }

    /// Like [`RTree::nearest_neighbors`], but only entries at most
    /// `max_distance` away are returned. Subtrees beyond the limit are never
    /// expanded.
    pub fn nearest_within(
        &self,
        x: f64,
        y: f64,
        k: usize,
        max_distance: f64,
    ) -> Vec<Neighbor<'_, P>> {
        let mut found: Vec<Neighbor<'_, P>> = Vec::with_capacity(k.min(self.len()) + 1);
        if k == 0 || max_distance.is_nan() {
            return found;
        }

        // The limit itself is inclusive; once k entries are held, only
        // strictly closer ones can displace the last.
        let out_of_reach = |found: &Vec<Neighbor<'_, P>>, distance: f64| {
            if found.len() < k {
                distance > max_distance
            } else {
                distance >= found[k - 1].distance
            }
        };

        let mut queue: MinQueue<NodeId> = MinQueue::new();
        queue.push(0.0, self.root);

        while let Some((key, node_id)) = queue.pop() {
            if out_of_reach(&found, key) {
                continue;
            }

            for entry in &self.node_at(node_id).entries {
                let distance = entry.rect.min_distance(x, y);
                if out_of_reach(&found, distance) {
                    continue;
                }
                if let Some(child) = entry.child_id() {
                    queue.push(distance, child);
                } else if let Some(view) = entry.as_spatial() {
                    let slot = found.partition_point(|n| n.distance <= distance);
                    found.insert(
                        slot,
                        Neighbor {
                            entry: view,
                            distance,
                        },
                    );
                    found.truncate(k);
                }
            }
        }

        found
    }
}
