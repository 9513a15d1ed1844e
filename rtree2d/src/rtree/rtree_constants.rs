//! Constants for the R-Tree implementation.

/// Default maximum number of entries per node
pub const DEFAULT_MAX_ENTRIES: usize = 4;

/// Default minimum entries before underflow
pub const DEFAULT_MIN_ENTRIES: usize = 2;

/// Smallest usable node capacity; a split needs two halves
pub const MIN_NODE_CAPACITY: usize = 2;

/// Deepest node nesting accepted when decoding a persisted tree
pub const MAX_LOAD_DEPTH: usize = 64;
