//! Text rendering of a view
//!
//! Walks the tree the way a host would: top-level rows first, then the
//! children of every row with children, down to a fixed depth.

use crate::application::nodes::{Collapsible, NodeCommand, NodeRef};
use crate::application::ViewTree;
use crate::error::ViewResult;

use super::theme::{icons, icons_ascii};

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Levels of rows to render; rows at the last level are not expanded
    pub depth: usize,
    pub unicode: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            depth: 3,
            unicode: true,
        }
    }
}

/// Renders the view title, its message and rows as indented text
pub fn render_view(tree: &ViewTree, options: &RenderOptions) -> ViewResult<String> {
    let mut out = String::new();
    let rows = tree.get_children(None)?;

    out.push_str(tree.view().title());
    if let Some(description) = tree.description() {
        out.push_str("  ");
        out.push_str(&description);
    }
    out.push('\n');
    if let Some(message) = tree.message() {
        out.push_str(&message);
        out.push('\n');
    }

    for row in &rows {
        render_node(tree, row, 0, options, &mut out)?;
    }
    Ok(out)
}

fn render_node(
    tree: &ViewTree,
    node: &NodeRef,
    level: usize,
    options: &RenderOptions,
    out: &mut String,
) -> ViewResult<()> {
    let item = tree.get_tree_item(node)?;
    let descend = item.collapsible != Collapsible::None && level + 1 < options.depth;

    let icon = match (&item.command, item.collapsible, descend, options.unicode) {
        (Some(NodeCommand::LoadMore { .. }), _, _, true) => icons::LOAD_MORE,
        (Some(NodeCommand::LoadMore { .. }), _, _, false) => icons_ascii::LOAD_MORE,
        (_, Collapsible::None, _, true) => icons::LEAF,
        (_, Collapsible::None, _, false) => icons_ascii::LEAF,
        (_, _, true, true) => icons::EXPAND,
        (_, _, true, false) => icons_ascii::EXPAND,
        (_, _, false, true) => icons::COLLAPSE,
        (_, _, false, false) => icons_ascii::COLLAPSE,
    };

    out.push_str(&"  ".repeat(level));
    out.push_str(icon);
    out.push(' ');
    out.push_str(&item.label);
    if let Some(description) = &item.description {
        out.push_str("  ");
        out.push_str(description);
    }
    out.push('\n');

    if descend {
        for child in tree.get_children(Some(node))? {
            render_node(tree, &child, level + 1, options, out)?;
        }
    }
    Ok(())
}
