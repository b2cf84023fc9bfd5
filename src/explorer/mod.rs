//! Explorer feature - HDF5 structure exploration.
//!
//! This module holds the tree navigation state and renders the tree and
//! details panes.

pub mod details;
pub mod tree;

use crate::data::{DisplayNode, NodeKind};
use std::collections::HashSet;

/// Explorer state - combines tree navigation and details display.
#[derive(Debug)]
pub struct ExplorerState {
    /// All tree items in display order (only visible items).
    items: Vec<TreeItem>,
    /// Cursor position (index into items).
    cursor: usize,
    /// The root node for rebuilding.
    root: Option<DisplayNode>,
    /// Keys of expanded nodes.
    expanded: HashSet<String>,
    /// Scroll offset for the tree view.
    scroll_offset: usize,
    /// Show preview/details panel.
    pub show_preview: bool,
    /// Preview scroll offset.
    pub preview_scroll: u16,
}

/// A single visible row of the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    /// Unique node key.
    pub key: String,
    /// Node label.
    pub name: String,
    /// Object path (owner's path for attributes).
    pub path: String,
    /// Kind of node.
    pub kind: NodeKind,
    /// Label with icon and child count.
    pub label: String,
    /// Nesting level.
    pub level: usize,
    /// Whether the node has children to expand.
    pub expandable: bool,
    /// Whether this node is expanded.
    pub expanded: bool,
}

impl TreeItem {
    /// Attribute name when this row is an attribute.
    pub fn attribute(&self) -> Option<&str> {
        (self.kind == NodeKind::Attribute).then_some(self.name.as_str())
    }

    /// Path shown to the user.
    pub fn display_path(&self) -> String {
        match self.attribute() {
            Some(name) => crate::data::join_path(&self.path, name),
            None => self.path.clone(),
        }
    }
}

impl ExplorerState {
    /// Create a new explorer state.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            root: None,
            expanded: HashSet::new(),
            scroll_offset: 0,
            show_preview: true,
            preview_scroll: 0,
        }
    }

    /// Replace the tree. Expansion state and cursor start over.
    pub fn build_from_root(&mut self, root: DisplayNode) {
        self.expanded.clear();
        self.expanded.insert(root.key());
        self.root = Some(root);
        self.rebuild_visible_items();
        self.cursor = 0;
        self.scroll_offset = 0;
        self.preview_scroll = 0;
    }

    /// Drop the tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.items.clear();
        self.expanded.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
        self.preview_scroll = 0;
    }

    /// The loaded tree.
    pub fn root(&self) -> Option<&DisplayNode> {
        self.root.as_ref()
    }

    fn rebuild_visible_items(&mut self) {
        let mut items = Vec::new();
        if let Some(root) = &self.root {
            Self::add_visible_recursive(&self.expanded, root, 0, &mut items);
        }
        self.items = items;
        if self.cursor >= self.items.len() {
            self.cursor = self.items.len().saturating_sub(1);
        }
    }

    fn add_visible_recursive(
        expanded: &HashSet<String>,
        node: &DisplayNode,
        level: usize,
        items: &mut Vec<TreeItem>,
    ) {
        let key = node.key();
        let is_expanded = node.has_children() && expanded.contains(&key);

        items.push(TreeItem {
            key,
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            label: node.display_name(),
            level,
            expandable: node.has_children(),
            expanded: is_expanded,
        });

        if is_expanded {
            for child in &node.children {
                Self::add_visible_recursive(expanded, child, level + 1, items);
            }
        }
    }

    /// Move the cursor up one position.
    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.preview_scroll = 0;
        }
    }

    /// Move the cursor down one position.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            self.preview_scroll = 0;
        }
    }

    /// Move the cursor up by `step` rows.
    pub fn page_up(&mut self, step: usize) {
        self.cursor = self.cursor.saturating_sub(step);
        self.preview_scroll = 0;
    }

    /// Move the cursor down by `step` rows.
    pub fn page_down(&mut self, step: usize) {
        self.cursor = (self.cursor + step).min(self.items.len().saturating_sub(1));
        self.preview_scroll = 0;
    }

    /// Adjust scroll to keep cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }

        if self.cursor >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor.saturating_sub(viewport_height - 1);
        }
    }

    /// Get the current scroll offset.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Expand the node at the current cursor position.
    pub fn expand_current(&mut self) {
        if let Some(item) = self.items.get(self.cursor) {
            if item.expandable && !item.expanded {
                self.expanded.insert(item.key.clone());
                self.rebuild_visible_items();
            }
        }
    }

    /// Collapse the node at the cursor, or jump to its parent when it is
    /// already collapsed.
    pub fn collapse_current(&mut self) {
        let Some(item) = self.items.get(self.cursor) else {
            return;
        };

        if item.expanded {
            self.expanded.remove(&item.key);
            self.rebuild_visible_items();
            return;
        }

        let level = item.level;
        if let Some(parent) = self.items[..self.cursor]
            .iter()
            .rposition(|candidate| candidate.level < level)
        {
            self.cursor = parent;
            self.preview_scroll = 0;
        }
    }

    /// Go to the first item.
    pub fn goto_first(&mut self) {
        self.cursor = 0;
        self.preview_scroll = 0;
    }

    /// Go to the last visible item.
    pub fn goto_last(&mut self) {
        if !self.items.is_empty() {
            self.cursor = self.items.len() - 1;
            self.preview_scroll = 0;
        }
    }

    /// Get all currently visible items in the tree.
    pub fn visible_items(&self) -> &[TreeItem] {
        &self.items
    }

    /// Get the current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the item under the cursor.
    pub fn current_item(&self) -> Option<&TreeItem> {
        self.items.get(self.cursor)
    }

    /// Move the cursor to the node with the given key, expanding its
    /// ancestors first.
    pub fn goto_key(&mut self, key: &str) {
        let mut ancestors = Vec::new();
        let found = self
            .root
            .as_ref()
            .is_some_and(|root| Self::ancestor_keys(root, key, &mut ancestors));
        if found {
            self.expanded.extend(ancestors);
            self.rebuild_visible_items();
        }

        if let Some(i) = self.items.iter().position(|item| item.key == key) {
            self.cursor = i;
            self.preview_scroll = 0;
        }
    }

    fn ancestor_keys(node: &DisplayNode, key: &str, out: &mut Vec<String>) -> bool {
        if node.key() == key {
            return true;
        }
        for child in &node.children {
            if Self::ancestor_keys(child, key, out) {
                out.push(node.key());
                return true;
            }
        }
        false
    }

    /// Expand all nodes in the tree.
    pub fn expand_all(&mut self) {
        if let Some(root) = &self.root {
            Self::collect_expandable(root, &mut self.expanded);
        }
        self.rebuild_visible_items();
    }

    fn collect_expandable(node: &DisplayNode, keys: &mut HashSet<String>) {
        if node.has_children() {
            keys.insert(node.key());
        }
        for child in &node.children {
            Self::collect_expandable(child, keys);
        }
    }

    /// Toggle preview panel.
    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    /// Scroll preview down.
    pub fn scroll_down(&mut self, step: u16) {
        self.preview_scroll = self.preview_scroll.saturating_add(step);
    }

    /// Scroll preview up.
    pub fn scroll_up(&mut self, step: u16) {
        self.preview_scroll = self.preview_scroll.saturating_sub(step);
    }
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DisplayNode {
        let mut root = DisplayNode::new("file.h5", "/", NodeKind::Group);
        let mut group = DisplayNode::new("g", "/g", NodeKind::Group);
        let mut data = DisplayNode::new("d", "/g/d", NodeKind::Dataset);
        data.add_child(DisplayNode::new("units", "/g/d", NodeKind::Attribute));
        group.add_child(data);
        root.add_child(group);
        root.add_child(DisplayNode::new("x", "/x", NodeKind::Dataset));
        root
    }

    #[test]
    fn root_starts_expanded() {
        let mut explorer = ExplorerState::new();
        explorer.build_from_root(sample_tree());
        let labels: Vec<&str> = explorer
            .visible_items()
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(labels, vec!["file.h5", "g", "x"]);
    }

    #[test]
    fn goto_key_reveals_attribute() {
        let mut explorer = ExplorerState::new();
        explorer.build_from_root(sample_tree());
        explorer.goto_key("/g/d@units");

        let item = explorer.current_item().unwrap();
        assert_eq!(item.attribute(), Some("units"));
        assert_eq!(item.display_path(), "/g/d/units");
    }

    #[test]
    fn collapse_on_leaf_moves_to_parent() {
        let mut explorer = ExplorerState::new();
        explorer.build_from_root(sample_tree());
        explorer.cursor_down();
        explorer.expand_current();
        explorer.cursor_down();
        assert_eq!(explorer.current_item().unwrap().name, "d");

        explorer.collapse_current();
        assert_eq!(explorer.current_item().unwrap().name, "g");
        explorer.collapse_current();
        assert_eq!(explorer.visible_items().len(), 3);
    }

    #[test]
    fn expand_all_shows_everything() {
        let mut explorer = ExplorerState::new();
        explorer.build_from_root(sample_tree());
        explorer.expand_all();
        assert_eq!(explorer.visible_items().len(), 5);
        explorer.goto_last();
        explorer.page_up(2);
        assert_eq!(explorer.cursor(), 2);
    }

    #[test]
    fn rebuild_resets_state() {
        let mut explorer = ExplorerState::new();
        explorer.build_from_root(sample_tree());
        explorer.expand_all();
        explorer.goto_last();
        explorer.build_from_root(sample_tree());
        assert_eq!(explorer.cursor(), 0);
        assert_eq!(explorer.visible_items().len(), 3);
    }
}
