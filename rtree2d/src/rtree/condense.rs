//! Deletion and tree condensation.
//!
//! After a leaf entry is removed, the path from its leaf to the root is
//! walked once. Underfull non-root nodes are unlinked from their parent and
//! their subtrees flattened into a list of orphaned leaf entries; every
//! surviving node on the path gets its parent entry re-tightened. The root is
//! then shrunk and the orphans reinserted.

use crate::bounding_box::BoundingBox;

use super::rtree_impl::RTree;
use super::rtree_types::{Entry, EntryId, EntryKind, NodeId};

impl<P> RTree<P> {
    /// Remove the entry stored under `rect` with the given id and return its
    /// payload.
    ///
    /// Returns `None` when no such entry exists, or when the entry exists but
    /// carries no payload (entries of a reloaded tree). Use
    /// [`RTree::remove_entry`] to tell the two apart.
    pub fn remove(&mut self, rect: &BoundingBox, id: EntryId) -> Option<P> {
        match self.take_entry(rect, id)?.kind {
            EntryKind::Payload { data, .. } => data,
            EntryKind::Child(_) => None,
        }
    }

    /// Remove the entry stored under `rect` with the given id.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove_entry(&mut self, rect: &BoundingBox, id: EntryId) -> bool {
        self.take_entry(rect, id).is_some()
    }

    fn take_entry(&mut self, rect: &BoundingBox, id: EntryId) -> Option<Entry<P>> {
        let (leaf, slot) = self.find_leaf(self.root, rect, id)?;
        let entry = self.node_at_mut(leaf).entries.remove(slot);
        self.entry_count = self.entry_count.saturating_sub(1);

        self.condense_tree(leaf);
        Some(entry)
    }

    /// Locate the leaf slot holding the entry with this rectangle and id.
    ///
    /// Only subtrees whose bounds intersect `rect` are searched.
    pub(crate) fn find_leaf(
        &self,
        node_id: NodeId,
        rect: &BoundingBox,
        id: EntryId,
    ) -> Option<(NodeId, usize)> {
        let node = self.node_at(node_id);
        if node.leaf {
            return node
                .entries
                .iter()
                .position(|e| e.entry_id() == Some(id) && e.rect == *rect)
                .map(|slot| (node_id, slot));
        }

        node.entries
            .iter()
            .filter(|e| e.rect.intersects(rect))
            .filter_map(Entry::child_id)
            .find_map(|child| self.find_leaf(child, rect, id))
    }

    fn condense_tree(&mut self, leaf: NodeId) {
        let min_entries = self.config.min_entries;
        let mut orphans = Vec::new();
        let mut current = leaf;

        while let Some(parent) = self.node_at(current).parent {
            if self.node_at(current).len() < min_entries {
                let parent_node = self.node_at_mut(parent);
                if let Some(slot) = parent_node.child_slot(current) {
                    parent_node.entries.remove(slot);
                }
                self.dissolve_subtree(current, &mut orphans);
            } else {
                self.refresh_parent_entry(parent, current);
            }
            current = parent;
        }

        self.shrink_root();

        if !orphans.is_empty() {
            log::debug!("condense reinserting {} orphaned entries", orphans.len());
            for entry in orphans {
                log::trace!("reinserting {}", entry.rect);
                self.insert_entry(entry);
            }
            self.shrink_root();
        }
    }

    /// Free every node of a detached subtree, collecting its leaf entries.
    fn dissolve_subtree(&mut self, node_id: NodeId, orphans: &mut Vec<Entry<P>>) {
        let Some(node) = self.nodes.free(node_id) else {
            return;
        };
        for entry in node.entries {
            if let Some(child) = entry.child_id() {
                self.dissolve_subtree(child, orphans);
            } else {
                orphans.push(entry);
            }
        }
    }

    /// Collapse single-child internal roots and turn an empty internal root
    /// into an empty leaf.
    fn shrink_root(&mut self) {
        loop {
            let root = self.node_at(self.root);
            if root.leaf {
                return;
            }

            match root.entries.len() {
                0 => {
                    self.node_at_mut(self.root).leaf = true;
                    log::debug!("internal root emptied, reset to leaf");
                    return;
                }
                1 => {
                    let Some(child) = root.entries[0].child_id() else {
                        return;
                    };
                    self.nodes.free(self.root);
                    self.node_at_mut(child).parent = None;
                    self.root = child;
                    log::debug!("collapsed root into {:?}, height is now {}", child, self.height());
                }
                _ => return,
            }
        }
    }
}
