//! Commit, stash, folder and file rows

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::entities::{Commit, CommitFile, StashEntry};
use crate::domain::services::{describe_age, join_relative, make_hierarchical, HierarchicalItem};
use crate::error::ViewResult;

use super::item::{Collapsible, NodeCommand, TreeItem};
use super::{NodeKind, NodeRef};

pub struct CommitNode {
    pub commit: Commit,
}

pub struct StashNode {
    pub entry: StashEntry,
}

/// A folder of changed files
pub struct FolderNode {
    pub repo_path: String,
    pub sha: Option<String>,
    pub item: HierarchicalItem<CommitFile>,
}

/// A changed file
pub struct FileNode {
    pub repo_path: String,
    pub sha: Option<String>,
    pub file: CommitFile,
    /// List layout shows the directory next to the name
    pub show_directory: bool,
}

pub(super) fn commit_node(parent: &NodeRef, commit: Commit) -> NodeRef {
    let id = format!("{}:commit({})", parent.id(), commit.sha);
    parent.child(id, NodeKind::Commit(CommitNode { commit }))
}

pub(super) fn stash_id(parent_id: &str, sha: &str) -> String {
    format!("{parent_id}:stash({sha})")
}

fn relative_date(date: &DateTime<Utc>) -> String {
    describe_age((Utc::now() - *date).to_std().unwrap_or_default())
}

pub(super) fn commit_children(node: &NodeRef, data: &CommitNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let commit = &data.commit;
    let sha = (!commit.is_uncommitted()).then(|| commit.sha.clone());
    let children = files_children(node, &commit.repo_path, sha, &commit.files);
    Ok(node.store_children(children))
}

pub(super) fn commit_tree_item(node: &NodeRef, data: &CommitNode) -> TreeItem {
    let commit = &data.commit;
    let collapsible = if commit.files.is_empty() {
        Collapsible::None
    } else {
        Collapsible::Collapsed
    };
    let mut context = String::from("viewtree:commit");
    if commit.is_uncommitted() {
        context.push_str("+uncommitted");
    }

    TreeItem::new(node.id(), commit.summary(), collapsible)
        .description(format!(
            "{} \u{2022} {}, {}",
            commit.short_sha(),
            commit.author,
            relative_date(&commit.date)
        ))
        .tooltip(format!("{}\n{}\n\n{}", commit.sha, commit.author, commit.message))
        .context(context)
        .command(NodeCommand::OpenCommit {
            repo_path: commit.repo_path.clone(),
            sha: commit.sha.clone(),
        })
}

pub(super) fn stash_children(node: &NodeRef, data: &StashNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let entry = &data.entry;
    let children = files_children(node, &entry.repo_path, Some(entry.sha.clone()), &entry.files);
    Ok(node.store_children(children))
}

pub(super) fn stash_tree_item(node: &NodeRef, data: &StashNode) -> TreeItem {
    let entry = &data.entry;
    let collapsible = if entry.files.is_empty() {
        Collapsible::None
    } else {
        Collapsible::Collapsed
    };
    TreeItem::new(node.id(), &entry.message, collapsible)
        .description(format!(
            "{} \u{2022} {}",
            entry.stash_name(),
            relative_date(&entry.date)
        ))
        .context("viewtree:stash")
}

pub(super) fn folder_children(node: &NodeRef, data: &FolderNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let children = hierarchy_children(node, &data.repo_path, data.sha.as_deref(), &data.item);
    Ok(node.store_children(children))
}

pub(super) fn folder_tree_item(node: &NodeRef, data: &FolderNode) -> TreeItem {
    let count = data.item.descendants.len();
    let description = match count {
        0 => String::new(),
        1 => "1 file".to_string(),
        n => format!("{n} files"),
    };
    TreeItem::new(node.id(), &data.item.name, Collapsible::Expanded)
        .description(description)
        .tooltip(&data.item.relative_path)
        .context("viewtree:folder")
}

pub(super) fn file_tree_item(node: &NodeRef, data: &FileNode) -> TreeItem {
    let file = &data.file;
    let mut item = TreeItem::new(node.id(), file.file_name(), Collapsible::None)
        .tooltip(format!("{} \u{2022} {}", file.path, file.status.code()))
        .context("viewtree:file")
        .command(NodeCommand::OpenFile {
            repo_path: data.repo_path.clone(),
            path: file.path.clone(),
            sha: data.sha.clone(),
        });
    if data.show_directory {
        item = item.description(file.directory());
    }
    item
}

/// File nodes for a commit or stash, laid out per the files config
fn files_children(
    parent: &NodeRef,
    repo_path: &str,
    sha: Option<String>,
    files: &[CommitFile],
) -> Vec<NodeRef> {
    let config = &parent.context().config().files;
    if config.use_tree(files.len()) {
        let root = make_hierarchical(
            files.iter().cloned(),
            |f: &CommitFile| f.path.split('/').map(str::to_string).collect(),
            join_relative,
            config.compact,
            None,
        );
        return hierarchy_children(parent, repo_path, sha.as_deref(), &root);
    }

    let mut files = files.to_vec();
    files.sort_by(|a, b| natural_cmp(&a.path, &b.path));
    files
        .into_iter()
        .map(|file| file_node(parent, repo_path, sha.clone(), file, true))
        .collect()
}

fn hierarchy_children(
    parent: &NodeRef,
    repo_path: &str,
    sha: Option<&str>,
    item: &HierarchicalItem<CommitFile>,
) -> Vec<NodeRef> {
    let mut folders: Vec<&HierarchicalItem<CommitFile>> = Vec::new();
    let mut files: Vec<&CommitFile> = Vec::new();
    for child in item.children() {
        match &child.value {
            Some(file) => files.push(file),
            None => folders.push(child),
        }
    }
    folders.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    files.sort_by(|a, b| natural_cmp(a.file_name(), b.file_name()));

    let folder_nodes = folders.into_iter().map(|folder| {
        let id = format!("{}:folder({})", parent.id(), folder.relative_path);
        parent.child(
            id,
            NodeKind::Folder(FolderNode {
                repo_path: repo_path.to_string(),
                sha: sha.map(str::to_string),
                item: folder.clone(),
            }),
        )
    });
    let file_nodes = files
        .into_iter()
        .map(|file| file_node(parent, repo_path, sha.map(str::to_string), file.clone(), false));
    folder_nodes.chain(file_nodes).collect()
}

fn file_node(
    parent: &NodeRef,
    repo_path: &str,
    sha: Option<String>,
    file: CommitFile,
    show_directory: bool,
) -> NodeRef {
    let id = format!("{}:file({})", parent.id(), file.path);
    parent.child(
        id,
        NodeKind::File(FileNode {
            repo_path: repo_path.to_string(),
            sha,
            file,
            show_directory,
        }),
    )
}

/// Case-insensitive ordering that compares digit runs by value
pub(super) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_num = take_number(&mut a_chars);
                let y_num = take_number(&mut b_chars);
                match x_num.cmp(&y_num) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u128 {
    let mut value: u128 = 0;
    while let Some(c) = chars.peek().copied() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        value = value.saturating_mul(10).saturating_add(u128::from(digit));
        chars.next();
    }
    value
}
