use super::item::{Collapsible, NodeCommand, TreeItem};
use super::{NodeKind, NodeRef};

/// Informational row without children
pub struct MessageNode {
    pub message: String,
    pub description: Option<String>,
}

/// Row that loads the next page of its parent when activated
pub struct LoadMoreNode;

pub(super) fn message(parent: &NodeRef, text: &str) -> NodeRef {
    let id = format!("{}:message({text})", parent.id());
    parent.child(
        id,
        NodeKind::Message(MessageNode {
            message: text.to_string(),
            description: None,
        }),
    )
}

/// Thin divider between a branch's status rows and its commits
pub(super) fn separator(parent: &NodeRef) -> NodeRef {
    message(parent, "-----")
}

pub(super) fn load_more(parent: &NodeRef) -> NodeRef {
    let id = format!("{}:load-more", parent.id());
    parent.child(id, NodeKind::LoadMore(LoadMoreNode))
}

pub(super) fn message_tree_item(node: &NodeRef, data: &MessageNode) -> TreeItem {
    let mut item = TreeItem::new(node.id(), &data.message, Collapsible::None)
        .context("viewtree:message");
    if let Some(description) = &data.description {
        item = item.description(description);
    }
    item
}

pub(super) fn load_more_tree_item(node: &NodeRef, _data: &LoadMoreNode) -> TreeItem {
    let parent_id = node
        .parent()
        .map(|parent| parent.id().to_string())
        .unwrap_or_default();
    TreeItem::new(node.id(), "Load more", Collapsible::None)
        .tooltip("Click to load more items")
        .context("viewtree:pager")
        .command(NodeCommand::LoadMore { node_id: parent_id })
}
