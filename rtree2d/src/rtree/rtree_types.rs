//! Core types and data structures for the R-Tree.
//!
//! This module defines the fundamental types used throughout the R-Tree:
//! - Error types and result types
//! - Node and entry types
//! - Query result views
//! - Statistics structures

use crate::bounding_box::BoundingBox;
use std::io;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<bincode::error::EncodeError> for SpatialError {
    fn from(err: bincode::error::EncodeError) -> Self {
        match err {
            bincode::error::EncodeError::Io { inner, .. } => SpatialError::Io(inner),
            other => SpatialError::Serialization(other.to_string()),
        }
    }
}

impl From<bincode::error::DecodeError> for SpatialError {
    fn from(err: bincode::error::DecodeError) -> Self {
        match err {
            bincode::error::DecodeError::Io { inner, .. } => SpatialError::Io(inner),
            other => SpatialError::Serialization(other.to_string()),
        }
    }
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Identity of a leaf entry, assigned by the tree on insertion.
pub type EntryId = u64;

// ============================================================================
// Statistics
// ============================================================================

/// Shape statistics of an R-Tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RTreeStats {
    pub total_entries: u64,
    pub node_count: u64,
    pub leaf_count: u64,
    pub tree_height: u32,
}

// ============================================================================
// Node Types
// ============================================================================

/// Slot index of a node inside the tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena slot of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// What an entry points at.
///
/// Internal nodes only ever hold `Child` entries and leaves only ever hold
/// `Payload` entries; [`Entry::child`] and [`Entry::leaf`] are the only
/// constructors.
#[derive(Debug, Clone)]
pub enum EntryKind<P> {
    /// Subtree rooted at another node
    Child(NodeId),
    /// User data of a leaf entry. `data` is `None` after a reload.
    Payload { id: EntryId, data: Option<P> },
}

/// A rectangle plus the child node or payload it describes.
#[derive(Debug, Clone)]
pub struct Entry<P> {
    pub rect: BoundingBox,
    pub kind: EntryKind<P>,
}

impl<P> Entry<P> {
    pub(crate) fn child(rect: BoundingBox, child: NodeId) -> Self {
        Self {
            rect,
            kind: EntryKind::Child(child),
        }
    }

    pub(crate) fn leaf(rect: BoundingBox, id: EntryId, data: Option<P>) -> Self {
        Self {
            rect,
            kind: EntryKind::Payload { id, data },
        }
    }

    /// Child node of an internal entry
    pub fn child_id(&self) -> Option<NodeId> {
        match self.kind {
            EntryKind::Child(child) => Some(child),
            EntryKind::Payload { .. } => None,
        }
    }

    /// Identity of a leaf entry
    pub fn entry_id(&self) -> Option<EntryId> {
        match self.kind {
            EntryKind::Child(_) => None,
            EntryKind::Payload { id, .. } => Some(id),
        }
    }

    pub(crate) fn as_spatial(&self) -> Option<SpatialEntry<'_, P>> {
        match &self.kind {
            EntryKind::Child(_) => None,
            EntryKind::Payload { id, data } => Some(SpatialEntry {
                id: *id,
                rect: self.rect,
                payload: data.as_ref(),
            }),
        }
    }
}

/// A tree node: leaf flag, entries and a non-owning parent link.
///
/// `entries` may transiently hold `max_entries + 1` items between an insert
/// and the split that follows it.
#[derive(Debug, Clone)]
pub struct Node<P> {
    pub leaf: bool,
    pub entries: Vec<Entry<P>>,
    pub parent: Option<NodeId>,
}

impl<P> Node<P> {
    pub(crate) fn new(leaf: bool) -> Self {
        Self {
            leaf,
            entries: Vec::new(),
            parent: None,
        }
    }

    /// Get the bounding box enclosing all entries
    pub fn compute_bbox(&self) -> BoundingBox {
        BoundingBox::bounding(self.entries.iter().map(|e| &e.rect))
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry pointing at `child`
    pub(crate) fn child_slot(&self, child: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| matches!(e.kind, EntryKind::Child(c) if c == child))
    }
}

// ============================================================================
// Query views
// ============================================================================

/// Read-only view of a leaf entry handed out by queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry<'a, P> {
    pub id: EntryId,
    pub rect: BoundingBox,
    pub payload: Option<&'a P>,
}

/// A leaf entry together with its distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, P> {
    pub entry: SpatialEntry<'a, P>,
    pub distance: f64,
}
