//! Pinned search and comparison results
//!
//! Pins are persisted in workspace state as a map of id to [`PinnedItem`].
//! Ids are content hashes so pinning the same comparison twice collapses
//! to one entry.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A ref together with an optional display label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl NamedRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            label: None,
            reference: reference.into(),
        }
    }

    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.reference)
    }
}

/// Commit search criteria
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchPattern {
    pub pattern: String,
    #[serde(default)]
    pub match_all: bool,
    #[serde(default)]
    pub match_case: bool,
    #[serde(default)]
    pub match_regex: bool,
}

impl SearchPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Stable key combining the pattern with its flags
    pub fn key(&self) -> String {
        format!(
            "{}|{}{}{}",
            self.pattern,
            if self.match_all { "A" } else { "" },
            if self.match_case { "C" } else { "" },
            if self.match_regex { "R" } else { "" },
        )
    }
}

/// Labels shown for a search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLabels {
    pub label: String,
    pub query_label: String,
}

/// A persisted pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PinnedItem {
    Comparison {
        #[serde(default)]
        timestamp: i64,
        path: String,
        ref1: NamedRef,
        ref2: NamedRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notation: Option<String>,
    },
    Search {
        #[serde(default)]
        timestamp: i64,
        path: String,
        labels: SearchLabels,
        search: SearchPattern,
    },
}

impl PinnedItem {
    pub fn timestamp(&self) -> i64 {
        match self {
            PinnedItem::Comparison { timestamp, .. } | PinnedItem::Search { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn repo_path(&self) -> &str {
        match self {
            PinnedItem::Comparison { path, .. } | PinnedItem::Search { path, .. } => path,
        }
    }

    /// Id this item is stored under
    pub fn id(&self) -> String {
        match self {
            PinnedItem::Comparison {
                path, ref1, ref2, ..
            } => comparison_pin_id(path, &ref1.reference, &ref2.reference),
            PinnedItem::Search { path, search, .. } => search_pin_id(path, search),
        }
    }
}

/// Pre-migration shape of a pinned comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprecatedPinnedComparison {
    pub path: String,
    pub ref1: NamedRef,
    pub ref2: NamedRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

pub fn comparison_pin_id(repo_path: &str, ref1: &str, ref2: &str) -> String {
    hash_hex(&format!("{repo_path}|{ref1}|{ref2}"))
}

pub fn search_pin_id(repo_path: &str, search: &SearchPattern) -> String {
    hash_hex(&format!("{repo_path}|{}", search.key()))
}

fn hash_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
