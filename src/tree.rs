//! Hierarchical view over flat object keys.
//!
//! Keys are split on `/` and walked from the root; each `(parent, segment)`
//! pair maps to exactly one node. Siblings keep first-insertion order so a
//! listing always renders the same way.

use crate::types::ObjectRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Binary (1024-based) units used by [`format_size`]
pub const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Timestamp layout shown next to objects
pub const TIMESTAMP_FORMAT: &str = "%d:%m:%Y %H:%M:%S";

/// Human-readable byte count: `0B`, `1.0 KB`, `1.46 KB`, `3.5 GB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // Two decimals at most, but always at least one digit after the point
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0');
    let number = if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    };

    format!("{} {}", number, SIZE_UNITS[unit])
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// One path segment. Directory nodes carry no size or timestamp.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeyTreeNode {
    pub segment: String,
    pub display_size: Option<String>,
    pub last_modified: Option<String>,
    pub children: Vec<KeyTreeNode>,
}

impl KeyTreeNode {
    fn directory(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            display_size: None,
            last_modified: None,
            children: Vec::new(),
        }
    }

    /// True when an object was listed at exactly this path.
    pub fn is_object(&self) -> bool {
        self.display_size.is_some()
    }

    pub fn child(&self, segment: &str) -> Option<&KeyTreeNode> {
        self.children.iter().find(|c| c.segment == segment)
    }
}

/// Row produced by [`KeyTree::entries`]
#[derive(Debug, Clone)]
pub struct TreeEntry<'a> {
    pub depth: usize,
    /// Full key of the node, segments joined with `/`
    pub path: String,
    pub node: &'a KeyTreeNode,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct KeyTree {
    roots: Vec<KeyTreeNode>,
}

impl KeyTree {
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ObjectRecord>,
    {
        let mut tree = Self::default();
        for record in records {
            tree.insert(record);
        }
        tree
    }

    fn insert(&mut self, record: &ObjectRecord) {
        let is_directory_marker = record.key.ends_with('/');
        let segments: Vec<&str> = record.key.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut siblings = &mut self.roots;
        for segment in parents {
            siblings = &mut find_or_insert(siblings, segment).children;
        }

        let node = find_or_insert(siblings, last);
        if !is_directory_marker {
            node.display_size = Some(format_size(record.size));
            node.last_modified = Some(format_timestamp(&record.last_modified));
        }
    }

    pub fn roots(&self) -> &[KeyTreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Resolve a full key to its node.
    pub fn find(&self, key: &str) -> Option<&KeyTreeNode> {
        let mut segments = key.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut node = self.roots.iter().find(|n| n.segment == first)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Depth-first walk in display order.
    pub fn entries(&self) -> Vec<TreeEntry<'_>> {
        let mut out = Vec::new();
        for root in &self.roots {
            collect_entries(root, 0, String::new(), &mut out);
        }
        out
    }
}

fn find_or_insert<'a>(siblings: &'a mut Vec<KeyTreeNode>, segment: &str) -> &'a mut KeyTreeNode {
    let idx = match siblings.iter().position(|n| n.segment == segment) {
        Some(idx) => idx,
        None => {
            siblings.push(KeyTreeNode::directory(segment));
            siblings.len() - 1
        }
    };
    &mut siblings[idx]
}

fn collect_entries<'a>(
    node: &'a KeyTreeNode,
    depth: usize,
    prefix: String,
    out: &mut Vec<TreeEntry<'a>>,
) {
    let path = if prefix.is_empty() {
        node.segment.clone()
    } else {
        format!("{}/{}", prefix, node.segment)
    };
    out.push(TreeEntry {
        depth,
        path: path.clone(),
        node,
    });
    for child in &node.children {
        collect_entries(child, depth + 1, path.clone(), out);
    }
}
