//! # rtree2d - Two-Dimensional R-Tree
//!
//! This crate provides an in-memory R-Tree over axis-aligned rectangles
//! with `f32` coordinates.
//!
//! ## Features
//!
//! - **Dynamic Updates**: Insert with least-enlargement descent and node
//!   splitting, delete with condensation and reinsertion
//! - **Overlap Search**: Visit every entry whose rectangle intersects a query
//! - **Nearest Neighbor**: Best-first search driven by a binary min-heap
//! - **Persistence**: Save and load the tree shape in a compact
//!   little-endian binary format
//! - **Self-Check**: Verify parent links, tight bounds and balance
//!
//! ## Quick Start
//!
//! ```rust
//! use rtree2d::{BoundingBox, RTree};
//!
//! let mut tree = RTree::new();
//! let home = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
//! let id = tree.insert(home, "home");
//! tree.insert(BoundingBox::new(10.0, 10.0, 11.0, 11.0), "work");
//!
//! assert_eq!(tree.find_intersecting(&BoundingBox::new(0.5, 0.5, 3.0, 3.0)), vec![id]);
//!
//! let nearest = tree.nearest_neighbor(2.0, 2.0).expect("tree is not empty");
//! assert_eq!(nearest.entry.payload, Some(&"home"));
//!
//! assert_eq!(tree.remove(&home, id), Some("home"));
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! ## Persistence
//!
//! ```rust,no_run
//! use rtree2d::{BoundingBox, RTree};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = RTree::new();
//! tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), ());
//! tree.save("shapes.rtree")?;
//!
//! // Payloads are not stored; loaded entries are numbered in pre-order
//! let loaded: RTree<()> = RTree::load("shapes.rtree")?;
//! assert_eq!(loaded.len(), 1);
//! # Ok(())
//! # }
//! ```

// Core R-Tree modules
pub mod bounding_box;
pub mod priority_queue;
pub mod rtree;
pub mod spatial_index;

// Re-export R-Tree types
pub use bounding_box::BoundingBox;
pub use priority_queue::MinQueue;
pub use rtree::{
    EntryId, IntegrityReport, Neighbor, NodeId, RTree, RTreeConfig, RTreeStats, SpatialEntry,
    SpatialError, SpatialResult, DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES,
};
pub use spatial_index::SpatialIndex;
