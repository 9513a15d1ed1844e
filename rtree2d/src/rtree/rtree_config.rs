//! Node capacity configuration.

use serde::{Deserialize, Serialize};

use super::rtree_constants::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES, MIN_NODE_CAPACITY};
use super::rtree_types::{SpatialError, SpatialResult};

/// Fill thresholds of an R-Tree.
///
/// A node holding more than `max_entries` entries is split; a non-root node
/// holding fewer than `min_entries` is dissolved during condensation and
/// its entries reinserted.
///
/// # Examples
///
/// ```rust
/// use rtree2d::{RTree, RTreeConfig};
///
/// let config = RTreeConfig::new().with_max_entries(8).with_min_entries(3);
/// let tree: RTree<u32> = RTree::with_config(config).expect("valid thresholds");
/// assert_eq!(tree.config().max_entries, 8);
///
/// // min above max is rejected when the tree is built
/// let bad = RTreeConfig::new().with_max_entries(4).with_min_entries(5);
/// assert!(RTree::<u32>::with_config(bad).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTreeConfig {
    pub max_entries: usize,
    pub min_entries: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RTreeConfig {
    /// Creates a configuration with the default thresholds (4 and 2).
    pub fn new() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            min_entries: DEFAULT_MIN_ENTRIES,
        }
    }

    /// Sets the split threshold.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the underflow threshold.
    pub fn with_min_entries(mut self, min_entries: usize) -> Self {
        self.min_entries = min_entries;
        self
    }

    /// Checks the thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns `SpatialError::InvalidConfig` when `max_entries` is below 2,
    /// `min_entries` is zero, or `min_entries` exceeds `max_entries`.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.max_entries < MIN_NODE_CAPACITY {
            return Err(SpatialError::InvalidConfig(format!(
                "max_entries must be at least {}, got {}",
                MIN_NODE_CAPACITY, self.max_entries
            )));
        }
        if self.min_entries == 0 {
            return Err(SpatialError::InvalidConfig(
                "min_entries must be at least 1".into(),
            ));
        }
        if self.min_entries > self.max_entries {
            return Err(SpatialError::InvalidConfig(format!(
                "min_entries ({}) exceeds max_entries ({})",
                self.min_entries, self.max_entries
            )));
        }
        Ok(())
    }
}
