//! In-memory R-Tree over 2D rectangles.
//!
//! This module provides a Guttman-style R-Tree with:
//! - Least-enlargement leaf selection and midpoint node splits
//! - Deletion with condensation and reinsertion of orphaned entries
//! - Best-first nearest-neighbor search
//! - A compact recursive binary format for saving and loading the tree shape
//!
//! Nodes are kept in an index arena; parent links are arena ids rather than
//! owning pointers.

pub mod rtree_constants;
pub mod rtree_types;
pub mod rtree_config;
pub mod integrity;
mod node_arena;
mod rtree_impl;
mod condense;
mod nearest;
mod persistence;

pub use integrity::IntegrityReport;
pub use rtree_config::RTreeConfig;
pub use rtree_constants::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES, MAX_LOAD_DEPTH};
pub use rtree_impl::RTree;
pub use rtree_types::{
    Entry, EntryId, EntryKind, Neighbor, Node, NodeId, RTreeStats, SpatialEntry, SpatialError,
    SpatialResult,
};
