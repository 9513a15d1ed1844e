//! SpatialIndex trait definition.

use crate::bounding_box::BoundingBox;
use crate::rtree::{EntryId, RTree};

/// Common surface of a rectangle index keyed by [`EntryId`].
///
/// [`RTree`] implements it; so can brute-force indexes used to cross-check
/// query results.
pub trait SpatialIndex<P> {
    /// Adds a rectangle and returns the id assigned to it.
    fn add(&mut self, key: BoundingBox, payload: P) -> EntryId;

    /// Removes the entry with this rectangle and id.
    fn remove(&mut self, key: &BoundingBox, id: EntryId) -> bool;

    /// Finds the ids of entries intersecting `key`.
    fn find_intersecting_keys(&self, key: &BoundingBox) -> Vec<EntryId>;

    /// Finds the ids of entries lying inside `key`.
    fn find_contained_keys(&self, key: &BoundingBox) -> Vec<EntryId>;

    /// Finds up to `k` entries nearest to a point, closest first.
    fn find_nearest(
        &self,
        center_x: f64,
        center_y: f64,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<(EntryId, f64)>;

    /// Finds entries within a specific distance of a point.
    fn find_within_distance(&self, center_x: f64, center_y: f64, distance: f64) -> Vec<(EntryId, f64)> {
        self.find_nearest(center_x, center_y, usize::MAX, Some(distance))
    }

    /// Gets the number of entries.
    fn size(&self) -> u64;

    /// Clears all entries.
    fn clear(&mut self);
}

impl<P> SpatialIndex<P> for RTree<P> {
    fn add(&mut self, key: BoundingBox, payload: P) -> EntryId {
        self.insert(key, payload)
    }

    fn remove(&mut self, key: &BoundingBox, id: EntryId) -> bool {
        self.remove_entry(key, id)
    }

    fn find_intersecting_keys(&self, key: &BoundingBox) -> Vec<EntryId> {
        self.find_intersecting(key)
    }

    fn find_contained_keys(&self, key: &BoundingBox) -> Vec<EntryId> {
        self.find_contained(key)
    }

    fn find_nearest(
        &self,
        center_x: f64,
        center_y: f64,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<(EntryId, f64)> {
        if k == 1 && max_distance.is_none() {
            return self
                .nearest_neighbor(center_x, center_y)
                .map(|n| (n.entry.id, n.distance))
                .into_iter()
                .collect();
        }

        let limit = max_distance.unwrap_or(f64::INFINITY);
        self.nearest_within(center_x, center_y, k, limit)
            .into_iter()
            .map(|n| (n.entry.id, n.distance))
            .collect()
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn clear(&mut self) {
        RTree::clear(self)
    }
}
