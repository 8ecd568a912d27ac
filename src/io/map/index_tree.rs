//! Spatial index tree as an arena of index nodes keyed by file offset.
//!
//! Entries reference children by file offset. An entry whose id resolves to
//! a node in the arena is an internal edge; any other id is a leaf reference
//! to an object block. Parent and current-child links are offsets into the
//! arena, so nodes never own each other.

use ahash::{AHashSet, RandomState};
use indexmap::IndexMap;

use crate::types::Rect;

use super::index_block::{IndexBlock, IndexEntry};

/// All index nodes of a file, in page arrival order.
#[derive(Debug, Clone, Default)]
pub struct IndexTree {
    nodes: IndexMap<i32, IndexBlock, RandomState>,
}

impl IndexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the node decoded at `offset`, replacing any previous one.
    pub fn insert(&mut self, offset: i32, node: IndexBlock) {
        self.nodes.insert(offset, node);
    }

    pub fn get(&self, offset: i32) -> Option<&IndexBlock> {
        self.nodes.get(&offset)
    }

    pub fn get_mut(&mut self, offset: i32) -> Option<&mut IndexBlock> {
        self.nodes.get_mut(&offset)
    }

    pub fn contains(&self, offset: i32) -> bool {
        self.nodes.contains_key(&offset)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes with their offsets, in page arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &IndexBlock)> {
        self.nodes.iter().map(|(offset, node)| (*offset, node))
    }

    /// Every entry of every node, in page arrival order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.nodes.values().flat_map(|node| node.entries().iter())
    }

    /// Step from `parent` into the child behind entry `entry_index`.
    ///
    /// Records the step in the navigation state of both nodes and returns
    /// the child offset. Returns `None` (leaving state untouched) when the
    /// entry does not exist or points outside the arena (a leaf).
    pub fn descend(&mut self, parent: i32, entry_index: usize) -> Option<i32> {
        let child = self.get(parent)?.entry(entry_index)?.id;
        if child == parent || !self.contains(child) {
            return None;
        }

        if let Some(node) = self.nodes.get_mut(&parent) {
            node.current_child_index = Some(entry_index);
            node.current_child = Some(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        Some(child)
    }

    /// Step back to the node `offset` was reached from.
    pub fn ascend(&self, offset: i32) -> Option<i32> {
        self.parent_of(offset)
    }

    pub fn parent_of(&self, offset: i32) -> Option<i32> {
        self.get(offset)?.parent()
    }

    /// Node reached by the last descent from `offset`.
    pub fn current_child_of(&self, offset: i32) -> Option<&IndexBlock> {
        let child = self.get(offset)?.current_child()?;
        self.get(child)
    }

    /// Forget all navigation state.
    pub fn reset_navigation(&mut self) {
        for node in self.nodes.values_mut() {
            node.current_child_index = None;
            node.current_child = None;
            node.parent = None;
        }
    }

    /// Object block references under `root` whose entry MBR intersects
    /// `area`, in depth-first file order.
    ///
    /// Nodes already visited are not walked again, so a malformed file with
    /// cyclic references terminates.
    pub fn search(&self, root: i32, area: &Rect) -> Vec<i32> {
        let mut found = Vec::new();
        let mut visited = AHashSet::new();
        self.search_node(root, area, &mut visited, &mut found);
        found
    }

    fn search_node(
        &self,
        offset: i32,
        area: &Rect,
        visited: &mut AHashSet<i32>,
        found: &mut Vec<i32>,
    ) {
        if !visited.insert(offset) {
            return;
        }
        let Some(node) = self.get(offset) else {
            return;
        };
        for entry in node.entries() {
            if !entry.mbr.intersects(area) {
                continue;
            }
            if self.contains(entry.id) {
                self.search_node(entry.id, area, visited, found);
            } else {
                found.push(entry.id);
            }
        }
    }
}
