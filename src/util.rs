//! Clipboard helpers and tree text rendering.

use crate::data::DisplayNode;
use crate::error::Result;
use arboard::Clipboard;

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Copy the whole tree to the clipboard.
pub fn copy_tree_structure(root: &DisplayNode) -> Result<()> {
    copy_to_clipboard(&format_tree(root))
}

/// Render a tree as indented text, one node per line.
pub fn format_tree(root: &DisplayNode) -> String {
    let mut text = format!("Tree Structure: {}\n", root.name);
    text.push_str(&"=".repeat(80));
    text.push_str("\n\n");

    for (i, child) in root.children.iter().enumerate() {
        let is_last = i + 1 == root.children.len();
        format_tree_recursive(child, "", is_last, &mut text);
    }
    text
}

fn format_tree_recursive(node: &DisplayNode, prefix: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(&format!("{}{}{}\n", prefix, connector, node.display_name()));

    let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "│" });

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i + 1 == node.children.len();
        format_tree_recursive(child, &new_prefix, is_last_child, out);
    }
}
