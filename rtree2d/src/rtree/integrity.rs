//! Structural self-check of an in-memory tree.

use std::collections::HashSet;

use super::rtree_impl::RTree;
use super::rtree_types::{EntryKind, NodeId};

/// Result of integrity check operation
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Nodes reached from the root
    pub nodes_checked: u64,
    /// Leaf entries reached from the root
    pub entries_checked: u64,
    /// Live nodes not reachable from the root
    pub orphaned_nodes: u64,
    /// Summary of findings
    pub is_valid: bool,
    /// Broken invariants
    pub errors: Vec<String>,
    /// Tolerated deviations, such as underfull nodes left by a split
    pub warnings: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_checked: 0,
            orphaned_nodes: 0,
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

struct CheckState {
    report: IntegrityReport,
    visited: HashSet<NodeId>,
    leaf_depth: Option<usize>,
}

impl<P> RTree<P> {
    /// Walk the whole tree and verify its structural invariants.
    ///
    /// Checked: leaf/internal entry kinds, parent links, tight bounds, node
    /// capacity, equal leaf depth, the entry count and that every live node
    /// is reachable. Non-root nodes below `min_entries` are reported as
    /// warnings only; a positional split may leave them.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut state = CheckState {
            report: IntegrityReport::new(),
            visited: HashSet::new(),
            leaf_depth: None,
        };

        match self.nodes.get(self.root) {
            Some(root) if root.parent.is_some() => {
                state
                    .report
                    .error(format!("root {:?} has parent {:?}", self.root, root.parent));
            }
            Some(_) => {}
            None => {
                state.report.error(format!("root {:?} is not live", self.root));
                return state.report;
            }
        }

        self.check_node(self.root, 0, &mut state);

        let mut report = state.report;
        if report.entries_checked != self.entry_count {
            report.error(format!(
                "tree reports {} entries but {} are reachable",
                self.entry_count, report.entries_checked
            ));
        }

        let live = self.nodes.len() as u64;
        if live > report.nodes_checked {
            report.orphaned_nodes = live - report.nodes_checked;
            report.error(format!(
                "{} live nodes are unreachable from the root",
                report.orphaned_nodes
            ));
        }

        log::debug!(
            "integrity check: {} nodes, {} entries, {} errors, {} warnings",
            report.nodes_checked,
            report.entries_checked,
            report.errors.len(),
            report.warnings.len()
        );
        report
    }

    fn check_node(&self, node_id: NodeId, depth: usize, state: &mut CheckState) {
        if !state.visited.insert(node_id) {
            state
                .report
                .error(format!("node {:?} is reachable more than once", node_id));
            return;
        }

        let Some(node) = self.nodes.get(node_id) else {
            state
                .report
                .error(format!("node {:?} is referenced but not live", node_id));
            return;
        };
        state.report.nodes_checked += 1;

        let is_root = node_id == self.root;
        if node.len() > self.config.max_entries {
            state.report.error(format!(
                "node {:?} holds {} entries, capacity is {}",
                node_id,
                node.len(),
                self.config.max_entries
            ));
        }
        if !is_root && node.len() < self.config.min_entries {
            state.report.warnings.push(format!(
                "node {:?} holds {} entries, below minimum {}",
                node_id,
                node.len(),
                self.config.min_entries
            ));
        }

        if node.leaf {
            match state.leaf_depth {
                None => state.leaf_depth = Some(depth),
                Some(expected) if expected != depth => state.report.error(format!(
                    "leaf {:?} at depth {}, expected {}",
                    node_id, depth, expected
                )),
                Some(_) => {}
            }
        } else if node.is_empty() {
            state
                .report
                .error(format!("internal node {:?} has no entries", node_id));
        }

        for entry in &node.entries {
            match (&entry.kind, node.leaf) {
                (EntryKind::Payload { .. }, true) => {
                    state.report.entries_checked += 1;
                }
                (EntryKind::Child(child), false) => {
                    let child = *child;
                    if let Some(child_node) = self.nodes.get(child) {
                        if child_node.parent != Some(node_id) {
                            state.report.error(format!(
                                "node {:?} points at parent {:?}, expected {:?}",
                                child, child_node.parent, node_id
                            ));
                        }
                        let tight = child_node.compute_bbox();
                        if entry.rect != tight {
                            state.report.error(format!(
                                "entry for {:?} is {}, child bounds are {}",
                                child, entry.rect, tight
                            ));
                        }
                    }
                    self.check_node(child, depth + 1, state);
                }
                (EntryKind::Payload { id, .. }, false) => state.report.error(format!(
                    "internal node {:?} holds leaf entry {}",
                    node_id, id
                )),
                (EntryKind::Child(child), true) => state.report.error(format!(
                    "leaf {:?} holds child entry {:?}",
                    node_id, child
                )),
            }
        }
    }
}
