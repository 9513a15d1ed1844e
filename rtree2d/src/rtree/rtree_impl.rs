//! RTree implementation: tree state, insertion engine and overlap queries.

use crate::bounding_box::BoundingBox;

use super::node_arena::NodeArena;
use super::rtree_config::RTreeConfig;
use super::rtree_types::{
    Entry, EntryId, EntryKind, Node, NodeId, RTreeStats, SpatialEntry, SpatialResult,
};

/// In-memory R-Tree over rectangles carrying a payload of type `P`.
///
/// Nodes live in an arena and point at their parent by index. Every
/// internal entry's rectangle is kept as the tight bounding box of its child
/// node: each insert and delete re-tightens the whole path to the root.
///
/// # Examples
///
/// ```rust
/// use rtree2d::{BoundingBox, RTree};
///
/// let mut tree = RTree::new();
/// tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), "a");
/// tree.insert(BoundingBox::new(5.0, 5.0, 6.0, 6.0), "b");
///
/// let mut hits = Vec::new();
/// tree.search(&BoundingBox::new(0.5, 0.5, 2.0, 2.0), |entry| hits.push(entry.payload.copied()));
/// assert_eq!(hits, vec![Some("a")]);
///
/// let nearest = tree.nearest_neighbor(4.0, 4.0).expect("tree is not empty");
/// assert_eq!(nearest.entry.payload, Some(&"b"));
/// ```
#[derive(Debug, Clone)]
pub struct RTree<P> {
    pub(crate) config: RTreeConfig,
    pub(crate) nodes: NodeArena<P>,
    pub(crate) root: NodeId,
    pub(crate) next_id: EntryId,
    pub(crate) entry_count: u64,
}

impl<P> Default for RTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RTree<P> {
    /// Create an empty tree with the default thresholds (4 / 2).
    pub fn new() -> Self {
        Self::empty_with(RTreeConfig::new())
    }

    /// Create an empty tree with custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns `SpatialError::InvalidConfig` if the thresholds are unusable.
    pub fn with_config(config: RTreeConfig) -> SpatialResult<Self> {
        config.validate()?;
        Ok(Self::empty_with(config))
    }

    fn empty_with(config: RTreeConfig) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.allocate(Node::new(true));
        Self {
            config,
            nodes,
            root,
            next_id: 0,
            entry_count: 0,
        }
    }

    /// Assemble a tree from an already linked arena.
    pub(crate) fn from_parts(
        config: RTreeConfig,
        nodes: NodeArena<P>,
        root: NodeId,
        entry_count: u64,
    ) -> Self {
        Self {
            config,
            nodes,
            root,
            next_id: entry_count,
            entry_count,
        }
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Number of leaf entries in the tree.
    pub fn len(&self) -> usize {
        self.entry_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Id of the current root node
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The current root node
    pub fn root(&self) -> &Node<P> {
        self.node_at(self.root)
    }

    /// Look up a live node by id
    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(id)
    }

    pub(crate) fn node_at(&self, id: NodeId) -> &Node<P> {
        match self.nodes.get(id) {
            Some(node) => node,
            None => panic!("node {:?} is not live in the arena", id),
        }
    }

    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node<P> {
        match self.nodes.get_mut(id) {
            Some(node) => node,
            None => panic!("node {:?} is not live in the arena", id),
        }
    }

    /// Number of levels; a lone leaf root has height 1.
    pub fn height(&self) -> u32 {
        let mut height = 1;
        let mut current = self.root;
        while let Some(child) = self.node_at(current).entries.first().and_then(Entry::child_id) {
            height += 1;
            current = child;
        }
        height
    }

    /// Get shape statistics
    pub fn stats(&self) -> RTreeStats {
        let mut stats = RTreeStats {
            total_entries: self.entry_count,
            tree_height: self.height(),
            ..RTreeStats::default()
        };

        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            let node = self.node_at(id);
            stats.node_count += 1;
            if node.leaf {
                stats.leaf_count += 1;
            } else {
                pending.extend(node.entries.iter().filter_map(Entry::child_id));
            }
        }
        stats
    }

    /// Remove every entry, keeping the configuration.
    ///
    /// Entry ids are not reused after a clear.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.allocate(Node::new(true));
        self.entry_count = 0;
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Insert a rectangle with its payload and return the new entry's id.
    ///
    /// The id together with the rectangle identifies the entry for
    /// [`RTree::remove`].
    pub fn insert(&mut self, rect: BoundingBox, payload: P) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;

        self.insert_entry(Entry::leaf(rect, id, Some(payload)));
        self.entry_count += 1;
        id
    }

    /// Route a leaf entry to its leaf and fix up the path above it.
    pub(crate) fn insert_entry(&mut self, entry: Entry<P>) {
        let leaf = self.choose_leaf(self.root, &entry.rect);
        log::trace!("inserting {} into leaf {:?}", entry.rect, leaf);

        self.node_at_mut(leaf).entries.push(entry);
        self.adjust_tree(leaf);
    }

    /// Descend to the leaf whose path needs the least enlargement.
    ///
    /// The first child with minimal enlargement wins ties.
    fn choose_leaf(&self, node_id: NodeId, rect: &BoundingBox) -> NodeId {
        let node = self.node_at(node_id);
        if node.leaf {
            return node_id;
        }

        let mut best_idx = 0;
        let mut best_enlargement = f64::INFINITY;
        for (i, entry) in node.entries.iter().enumerate() {
            let enlargement = entry.rect.enlargement(rect);
            if enlargement < best_enlargement {
                best_enlargement = enlargement;
                best_idx = i;
            }
        }

        match node.entries.get(best_idx).and_then(Entry::child_id) {
            Some(child) => self.choose_leaf(child, rect),
            None => panic!("internal node {:?} has no child entries", node_id),
        }
    }

    /// Split a node at its midpoint index.
    ///
    /// Entries `[..len / 2]` stay, the rest move to a new sibling of the same
    /// kind. The sibling shares the node's parent but is not yet linked into
    /// it; the caller does that.
    fn split_node(&mut self, node_id: NodeId) -> NodeId {
        let (leaf, parent, moved) = {
            let node = self.node_at_mut(node_id);
            let mid = node.entries.len() / 2;
            (node.leaf, node.parent, node.entries.split_off(mid))
        };

        let moved_children: Vec<NodeId> = moved.iter().filter_map(Entry::child_id).collect();
        let moved_count = moved.len();
        let sibling = self.nodes.allocate(Node {
            leaf,
            entries: moved,
            parent,
        });

        for child in moved_children {
            self.node_at_mut(child).parent = Some(sibling);
        }

        log::debug!(
            "split {} node {:?}: kept {}, moved {} to {:?}",
            if leaf { "leaf" } else { "internal" },
            node_id,
            self.node_at(node_id).len(),
            moved_count,
            sibling
        );
        sibling
    }

    /// Walk from `start` to the root, splitting overflowing nodes and
    /// re-tightening every parent entry on the way.
    fn adjust_tree(&mut self, start: NodeId) {
        let max_entries = self.config.max_entries;
        let mut current = start;

        loop {
            let overflowing = self.node_at(current).len() > max_entries;
            let parent = self.node_at(current).parent;

            match (parent, overflowing) {
                (None, false) => return,
                (None, true) => {
                    self.grow_root(current);
                    return;
                }
                (Some(parent), false) => {
                    self.refresh_parent_entry(parent, current);
                    current = parent;
                }
                (Some(parent), true) => {
                    let sibling = self.split_node(current);
                    self.refresh_parent_entry(parent, current);

                    let sibling_bbox = self.node_at(sibling).compute_bbox();
                    self.node_at_mut(parent)
                        .entries
                        .push(Entry::child(sibling_bbox, sibling));
                    current = parent;
                }
            }
        }
    }

    /// Split the overflowing root and install a new two-entry root above it.
    fn grow_root(&mut self, old_root: NodeId) {
        let sibling = self.split_node(old_root);

        // Bounds cover every entry of each half
        let old_bbox = self.node_at(old_root).compute_bbox();
        let sibling_bbox = self.node_at(sibling).compute_bbox();

        let mut root = Node::new(false);
        root.entries.push(Entry::child(old_bbox, old_root));
        root.entries.push(Entry::child(sibling_bbox, sibling));
        let new_root = self.nodes.allocate(root);

        self.node_at_mut(old_root).parent = Some(new_root);
        self.node_at_mut(sibling).parent = Some(new_root);
        self.root = new_root;

        log::debug!("root split, tree height is now {}", self.height());
    }

    /// Set the parent's entry for `child` to the child's tight bounds.
    pub(crate) fn refresh_parent_entry(&mut self, parent: NodeId, child: NodeId) {
        let bbox = self.node_at(child).compute_bbox();
        let parent_node = self.node_at_mut(parent);
        if let Some(slot) = parent_node.child_slot(child) {
            parent_node.entries[slot].rect = bbox;
        }
    }

    // ------------------------------------------------------------------
    // Overlap queries
    // ------------------------------------------------------------------

    /// Call `visit` once for every leaf entry intersecting `query`.
    ///
    /// Only subtrees whose bounds intersect the query are descended into.
    pub fn search<'a, F>(&'a self, query: &BoundingBox, mut visit: F)
    where
        F: FnMut(SpatialEntry<'a, P>),
    {
        self.search_recursive(self.root, query, &mut visit);
    }

    fn search_recursive<'a, F>(&'a self, node_id: NodeId, query: &BoundingBox, visit: &mut F)
    where
        F: FnMut(SpatialEntry<'a, P>),
    {
        for entry in &self.node_at(node_id).entries {
            if !entry.rect.intersects(query) {
                continue;
            }
            match &entry.kind {
                EntryKind::Child(child) => self.search_recursive(*child, query, visit),
                EntryKind::Payload { .. } => {
                    if let Some(view) = entry.as_spatial() {
                        visit(view);
                    }
                }
            }
        }
    }

    /// Ids of all entries intersecting `query`.
    pub fn find_intersecting(&self, query: &BoundingBox) -> Vec<EntryId> {
        let mut results = Vec::new();
        self.search(query, |entry| results.push(entry.id));
        results
    }

    /// Ids of all entries lying completely inside `query`.
    pub fn find_contained(&self, query: &BoundingBox) -> Vec<EntryId> {
        let mut results = Vec::new();
        // A contained entry always intersects, so the overlap walk is enough
        self.search(query, |entry| {
            if query.contains(&entry.rect) {
                results.push(entry.id);
            }
        });
        results
    }

    /// Every leaf entry, in pre-order.
    pub fn entries(&self) -> Vec<SpatialEntry<'_, P>> {
        let mut results = Vec::with_capacity(self.len());
        self.collect_entries_recursive(self.root, &mut results);
        results
    }

    fn collect_entries_recursive<'a>(&'a self, node_id: NodeId, results: &mut Vec<SpatialEntry<'a, P>>) {
        for entry in &self.node_at(node_id).entries {
            match entry.child_id() {
                Some(child) => self.collect_entries_recursive(child, results),
                None => results.extend(entry.as_spatial()),
            }
        }
    }

    /// Look up a single entry by rectangle and id.
    pub fn get(&self, rect: &BoundingBox, id: EntryId) -> Option<SpatialEntry<'_, P>> {
        let (leaf, slot) = self.find_leaf(self.root, rect, id)?;
        self.node_at(leaf).entries.get(slot)?.as_spatial()
    }
}
