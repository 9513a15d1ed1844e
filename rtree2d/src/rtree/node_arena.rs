//! Index-addressed node pool.
//!
//! Nodes are owned by the arena and refer to each other through [`NodeId`]
//! slots, so a parent link is a plain index instead of a pointer. Freed
//! slots are recycled through a free list before the arena grows.

use super::rtree_types::{Node, NodeId};

/// Slot storage for R-Tree nodes
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<P> {
    slots: Vec<Option<Node<P>>>,
    free_slots: Vec<usize>,
}

impl<P> NodeArena<P> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    /// Store a node, reusing a freed slot when one is available.
    pub(crate) fn allocate(&mut self, node: Node<P>) -> NodeId {
        if let Some(index) = self.free_slots.pop() {
            self.slots[index] = Some(node);
            return NodeId(index);
        }

        self.slots.push(Some(node));
        NodeId(self.slots.len() - 1)
    }

    /// Release a slot and hand back the node it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<P>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free_slots.push(id.0);
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<P>> {
        self.slots.get(id.0)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<P>> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Number of live nodes
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_slots.clear();
    }
}
