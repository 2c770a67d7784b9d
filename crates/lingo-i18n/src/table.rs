//! Typed translation tree and dotted-path lookup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{I18nError, Result};

/// Root-level leaf holding the human-readable name of a locale.
pub const LABEL_KEY: &str = "label";

/// A node of a translation tree: a template string or a nested group.
///
/// Deserializes from JSON strings and objects only. Numbers, booleans,
/// nulls and arrays are rejected so a malformed table fails at load time
/// instead of degrading silently during lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationNode {
    Text(String),
    Group(IndexMap<String, TranslationNode>),
}

impl TranslationNode {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&IndexMap<String, TranslationNode>> {
        match self {
            Self::Text(_) => None,
            Self::Group(children) => Some(children),
        }
    }
}

/// Why a key path did not resolve to a usable string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("segment `{segment}` not found at depth {depth}")]
    Missing { segment: String, depth: usize },
    #[error("key path ends on a group, not a string")]
    NotText,
    #[error("key path ends on an empty string")]
    Empty,
}

/// Translation tree for a single locale. Keys keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    root: IndexMap<String, TranslationNode>,
}

impl TranslationTable {
    pub fn new(root: IndexMap<String, TranslationNode>) -> Self {
        Self { root }
    }

    /// Parse a JSON document whose root is an object.
    pub fn from_json_str(locale: &str, raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| I18nError::ParseTable {
            locale: locale.to_string(),
            source,
        })
    }

    pub fn root(&self) -> &IndexMap<String, TranslationNode> {
        &self.root
    }

    pub fn label(&self) -> Option<&str> {
        self.root.get(LABEL_KEY).and_then(TranslationNode::as_text)
    }

    /// Walk `key` split on `.`; every segment, including empty ones, is a
    /// literal child name.
    pub fn lookup(&self, key: &str) -> Result<&str, LookupError> {
        let mut children = Some(&self.root);
        let mut node = None;
        for (depth, segment) in key.split('.').enumerate() {
            let next = children
                .and_then(|map| map.get(segment))
                .ok_or_else(|| LookupError::Missing {
                    segment: segment.to_string(),
                    depth,
                })?;
            children = next.as_group();
            node = Some(next);
        }
        match node {
            Some(TranslationNode::Text(text)) if !text.is_empty() => Ok(text),
            Some(TranslationNode::Text(_)) => Err(LookupError::Empty),
            _ => Err(LookupError::NotText),
        }
    }

    /// Every dotted path that ends on a string, in declaration order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaf_paths(&self.root, "", &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_paths().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn collect_leaf_paths(map: &IndexMap<String, TranslationNode>, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match node {
            TranslationNode::Text(_) => out.push(path),
            TranslationNode::Group(children) => collect_leaf_paths(children, &path, out),
        }
    }
}
