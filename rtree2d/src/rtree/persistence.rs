//! Binary save/load of the tree shape.
//!
//! A tree is written as one recursive node record, starting at the root:
//!
//! ```text
//! node   := header entry*
//! header := is_leaf: u8, entry_count: i32
//! entry  := min_x: f32, min_y: f32, max_x: f32, max_y: f32, [node]
//! ```
//!
//! Internal entries are followed immediately by their child's node record;
//! leaf entries carry only the rectangle. All values use bincode's legacy
//! fixed-width little-endian encoding. Payloads and entry ids are not
//! stored: a loaded tree numbers its leaf entries `0..len` in pre-order and
//! every payload is `None`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;

use super::node_arena::NodeArena;
use super::rtree_config::RTreeConfig;
use super::rtree_constants::MAX_LOAD_DEPTH;
use super::rtree_impl::RTree;
use super::rtree_types::{Entry, EntryId, Node, NodeId, SpatialError, SpatialResult};

/// Leading record of every persisted node
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct NodeHeader {
    is_leaf: bool,
    entry_count: i32,
}

impl<P> RTree<P> {
    /// Write the tree to `writer`, root first.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> SpatialResult<()> {
        self.write_node(self.root, writer)
    }

    fn write_node<W: Write>(&self, node_id: NodeId, writer: &mut W) -> SpatialResult<()> {
        let node = self.node_at(node_id);
        let entry_count = i32::try_from(node.len()).map_err(|_| {
            SpatialError::Serialization(format!("node {:?} has too many entries", node_id))
        })?;

        let header = NodeHeader {
            is_leaf: node.leaf,
            entry_count,
        };
        bincode::serde::encode_into_std_write(header, writer, bincode::config::legacy())?;

        for entry in &node.entries {
            bincode::serde::encode_into_std_write(entry.rect, writer, bincode::config::legacy())?;
            if let Some(child) = entry.child_id() {
                self.write_node(child, writer)?;
            }
        }
        Ok(())
    }

    /// Save the tree to a file, replacing any existing file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> SpatialResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::debug!("saved {} entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Read one tree record from `reader`.
    ///
    /// The tree is built from scratch; on error nothing is returned and no
    /// existing tree is touched. Bytes after the root record are left unread.
    pub fn read_from<R: Read>(reader: &mut R, config: RTreeConfig) -> SpatialResult<Self> {
        config.validate()?;

        let mut decoder = TreeDecoder {
            reader,
            config,
            nodes: NodeArena::new(),
            next_id: 0,
            leaf_depth: None,
        };
        let root = decoder.decode_node(None, 0)?;

        Ok(RTree::from_parts(config, decoder.nodes, root, decoder.next_id))
    }

    /// Load a tree saved with the default thresholds.
    pub fn load<T: AsRef<Path>>(path: T) -> SpatialResult<Self> {
        Self::load_with_config(path, RTreeConfig::default())
    }

    /// Load a tree, interpreting node capacities against `config`.
    ///
    /// # Errors
    ///
    /// Fails with `SpatialError::Io` if the file cannot be read or ends
    /// early, and with `SpatialError::Serialization` if the contents are not
    /// a well-formed tree or are followed by extra bytes.
    pub fn load_with_config<T: AsRef<Path>>(path: T, config: RTreeConfig) -> SpatialResult<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let tree = Self::read_from(&mut reader, config)?;

        let mut probe = [0u8; 1];
        if reader.read(&mut probe)? != 0 {
            return Err(SpatialError::Serialization(format!(
                "trailing data after tree record in {}",
                path.display()
            )));
        }

        log::debug!(
            "loaded {} entries from {}, height {}",
            tree.len(),
            path.display(),
            tree.height()
        );
        Ok(tree)
    }
}

struct TreeDecoder<'r, R, P> {
    reader: &'r mut R,
    config: RTreeConfig,
    nodes: NodeArena<P>,
    next_id: EntryId,
    leaf_depth: Option<usize>,
}

impl<R: Read, P> TreeDecoder<'_, R, P> {
    fn decode_node(&mut self, parent: Option<NodeId>, depth: usize) -> SpatialResult<NodeId> {
        if depth >= MAX_LOAD_DEPTH {
            return Err(SpatialError::Serialization(format!(
                "node nesting exceeds {} levels",
                MAX_LOAD_DEPTH
            )));
        }

        let header: NodeHeader =
            bincode::serde::decode_from_std_read(&mut *self.reader, bincode::config::legacy())?;

        let count = usize::try_from(header.entry_count).map_err(|_| {
            SpatialError::Serialization(format!("negative entry count {}", header.entry_count))
        })?;
        if count > self.config.max_entries {
            return Err(SpatialError::Serialization(format!(
                "node with {} entries exceeds capacity {}",
                count, self.config.max_entries
            )));
        }
        if !header.is_leaf && count == 0 {
            return Err(SpatialError::Serialization(
                "internal node without children".into(),
            ));
        }

        if header.is_leaf {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(SpatialError::Serialization(format!(
                        "leaf at depth {} but earlier leaves are at depth {}",
                        depth, expected
                    )));
                }
                Some(_) => {}
            }
        }

        let node_id = self.nodes.allocate(Node {
            leaf: header.is_leaf,
            entries: Vec::with_capacity(count),
            parent,
        });

        for _ in 0..count {
            let rect: BoundingBox =
                bincode::serde::decode_from_std_read(&mut *self.reader, bincode::config::legacy())?;
            if !rect.is_valid() {
                return Err(SpatialError::Serialization(format!(
                    "malformed rectangle {}",
                    rect
                )));
            }

            let entry = if header.is_leaf {
                let id = self.next_id;
                self.next_id += 1;
                Entry::leaf(rect, id, None)
            } else {
                let child = self.decode_node(Some(node_id), depth + 1)?;
                let covered = self
                    .nodes
                    .get(child)
                    .map(|node| node.compute_bbox())
                    .unwrap_or_else(BoundingBox::empty);
                if !rect.contains(&covered) {
                    return Err(SpatialError::Serialization(format!(
                        "child rectangle {} does not cover its entries {}",
                        rect, covered
                    )));
                }
                Entry::child(rect, child)
            };

            if let Some(node) = self.nodes.get_mut(node_id) {
                node.entries.push(entry);
            }
        }

        Ok(node_id)
    }
}
