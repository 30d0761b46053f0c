//! Compact file trees and their normalisation into flat path records.
//!
//! The service encodes directory listings as nested objects using one-letter
//! keys: `n` (name), `e` (children), `s` (size in bytes) and `l` (download
//! link). A node without an `e` entry is a leaf; a node with one is a
//! directory, even when the list is empty.
//!
//! Two leaf flavours exist. [`LinkLeaf`] is used for torrent metadata where only
//! sizes are known, [`FileLeaf`] for resolved listings where every leaf must
//! carry a download link.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{SchemaError, SchemaResult};

/// Key holding the children of a directory node.
pub const CHILDREN_KEY: &str = "e";
/// Key holding the download link of a file leaf.
pub const LINK_KEY: &str = "l";

/// Normalised record for a leaf of a link tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkEntry {
    /// Slash-joined ancestor names with a trailing slash; empty at the root.
    pub path: String,
    #[serde(rename = "fname")]
    /// Name of the file itself.
    pub filename: String,
    /// Size in bytes, `0` when the service did not report one.
    pub size: u64,
}

/// Normalised record for a leaf of a file tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Slash-joined ancestor names with a trailing slash; empty at the root.
    pub path: String,
    #[serde(rename = "fname")]
    /// Name of the file itself.
    pub filename: String,
    /// Size in bytes, `0` when the service did not report one.
    pub size: u64,
    /// Direct download link for the file.
    pub link: String,
}

/// Leaf payload of a [`TreeNode`].
///
/// Implementations decide which raw fields are mandatory and how a leaf is
/// rendered once its ancestor path is known.
pub trait TreeLeaf: Sized {
    /// Normalised record emitted for each leaf.
    type Entry;

    /// Build the leaf from its raw `n`, `s` and `l` fields.
    ///
    /// # Errors
    ///
    /// Returns an error when a field required by this leaf flavour is absent.
    fn from_parts(name: String, size: Option<u64>, link: Option<String>) -> SchemaResult<Self>;

    /// Name of the leaf.
    fn name(&self) -> &str;

    /// Render the leaf under the given ancestor path.
    fn to_entry(&self, path: &str) -> Self::Entry;
}

/// Leaf of a torrent link tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLeaf {
    /// File name.
    pub name: String,
    /// Size in bytes when reported.
    pub size: Option<u64>,
}

impl TreeLeaf for LinkLeaf {
    type Entry = LinkEntry;

    fn from_parts(name: String, size: Option<u64>, _link: Option<String>) -> SchemaResult<Self> {
        Ok(Self { name, size })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_entry(&self, path: &str) -> LinkEntry {
        LinkEntry {
            path: path.to_string(),
            filename: self.name.clone(),
            size: self.size.unwrap_or_default(),
        }
    }
}

/// Leaf of a resolved file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLeaf {
    /// File name.
    pub name: String,
    /// Size in bytes when reported.
    pub size: Option<u64>,
    /// Direct download link, never empty.
    pub link: String,
}

impl TreeLeaf for FileLeaf {
    type Entry = FileEntry;

    fn from_parts(name: String, size: Option<u64>, link: Option<String>) -> SchemaResult<Self> {
        match link {
            Some(link) if !link.is_empty() => Ok(Self { name, size, link }),
            _ => Err(SchemaError::MissingLink { name }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_entry(&self, path: &str) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            filename: self.name.clone(),
            size: self.size.unwrap_or_default(),
            link: self.link.clone(),
        }
    }
}

/// Recursive node of a compact file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode<L> {
    /// A single file.
    Leaf(L),
    /// A directory and its children in source order.
    Directory {
        /// Directory name.
        name: String,
        /// Child nodes.
        children: Vec<Self>,
    },
}

/// Torrent metadata tree.
pub type LinkNode = TreeNode<LinkLeaf>;
/// Resolved download tree.
pub type FileNode = TreeNode<FileLeaf>;

/// Wire form of a node before its variant is known.
#[derive(Deserialize)]
struct RawNode {
    n: String,
    e: Option<Vec<RawNode>>,
    s: Option<u64>,
    l: Option<String>,
}

impl<L: TreeLeaf> TreeNode<L> {
    /// Decode a single raw node and all of its descendants.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not a node object or when a leaf is
    /// missing a field its flavour requires.
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        let raw =
            RawNode::deserialize(value).map_err(|source| SchemaError::json("tree node", source))?;
        Self::from_raw(raw)
    }

    // Children are converted before their parent so a failure deep in the tree
    // aborts the whole node.
    fn from_raw(raw: RawNode) -> SchemaResult<Self> {
        let Some(children) = raw.e else {
            return L::from_parts(raw.n, raw.s, raw.l).map(Self::Leaf);
        };
        let children = children
            .into_iter()
            .map(Self::from_raw)
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(Self::Directory {
            name: raw.n,
            children,
        })
    }

    /// Name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.name(),
            Self::Directory { name, .. } => name,
        }
    }

    /// Number of leaves below (or at) this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Directory { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Append one entry per leaf to `out`, depth-first in source order.
    ///
    /// `prefix` is the path accumulated so far and is prepended to every
    /// emitted entry's path.
    pub fn walk(&self, prefix: &str, out: &mut Vec<L::Entry>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf.to_entry(prefix)),
            Self::Directory { name, children } => {
                let nested = format!("{prefix}{name}/");
                for child in children {
                    child.walk(&nested, out);
                }
            }
        }
    }

    /// Flatten this node starting from an empty path.
    #[must_use]
    pub fn flatten(&self) -> Vec<L::Entry> {
        let mut entries = Vec::with_capacity(self.leaf_count());
        self.walk("", &mut entries);
        entries
    }
}

impl<'de, L: TreeLeaf> Deserialize<'de> for TreeNode<L> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawNode::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(de::Error::custom)
    }
}

/// Flatten several root nodes into one list, preserving root order.
#[must_use]
pub fn flatten_forest<L: TreeLeaf>(roots: &[TreeNode<L>]) -> Vec<L::Entry> {
    let mut entries = Vec::new();
    for root in roots {
        root.walk("", &mut entries);
    }
    entries
}

/// Decode an array of raw root nodes.
///
/// # Errors
///
/// Returns an error when the value is not an array of node objects or a leaf
/// is missing a required field.
pub fn parse_forest<L: TreeLeaf>(value: &Value) -> SchemaResult<Vec<TreeNode<L>>> {
    let raw = Vec::<RawNode>::deserialize(value)
        .map_err(|source| SchemaError::json("file tree", source))?;
    raw.into_iter().map(TreeNode::from_raw).collect()
}

/// Decode and flatten a raw torrent link tree.
///
/// # Errors
///
/// Returns an error when the value is not an array of node objects.
pub fn flatten_links(value: &Value) -> SchemaResult<Vec<LinkEntry>> {
    Ok(flatten_forest(&parse_forest::<LinkLeaf>(value)?))
}

/// Decode and flatten a raw download tree.
///
/// # Errors
///
/// Returns an error when the value is not an array of node objects or when
/// any leaf lacks a non-empty `l` field.
pub fn flatten_files(value: &Value) -> SchemaResult<Vec<FileEntry>> {
    Ok(flatten_forest(&parse_forest::<FileLeaf>(value)?))
}

/// Flavour of a raw tree, decided from its leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// No leaf carries a link.
    Links,
    /// At least one leaf carries a link.
    Files,
}

impl TreeKind {
    /// Inspect a raw node or array of nodes without decoding it.
    #[must_use]
    pub fn detect(value: &Value) -> Self {
        if carries_link(value) {
            Self::Files
        } else {
            Self::Links
        }
    }
}

fn carries_link(value: &Value) -> bool {
    match value {
        Value::Array(nodes) => nodes.iter().any(carries_link),
        Value::Object(fields) => match fields.get(CHILDREN_KEY).filter(|e| !e.is_null()) {
            Some(children) => carries_link(children),
            None => fields.contains_key(LINK_KEY),
        },
        _ => false,
    }
}

/// Flattened listing whose flavour was detected from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatListing {
    /// Entries of a link tree.
    Links(Vec<LinkEntry>),
    /// Entries of a download tree.
    Files(Vec<FileEntry>),
}

impl FlatListing {
    /// Number of flattened entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Links(entries) => entries.len(),
            Self::Files(entries) => entries.len(),
        }
    }

    /// Returns true when the listing holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detect the tree flavour of a raw root array and flatten it accordingly.
///
/// Once a single leaf carries a link, every leaf must.
///
/// # Errors
///
/// Returns an error when the value is not an array of node objects or when a
/// download tree has a leaf without a link.
pub fn flatten_detected(value: &Value) -> SchemaResult<FlatListing> {
    match TreeKind::detect(value) {
        TreeKind::Links => flatten_links(value).map(FlatListing::Links),
        TreeKind::Files => flatten_files(value).map(FlatListing::Files),
    }
}

fn deserialize_flattened<'de, D, L>(deserializer: D) -> Result<Vec<L::Entry>, D::Error>
where
    D: Deserializer<'de>,
    L: TreeLeaf,
{
    let roots = Vec::<TreeNode<L>>::deserialize(deserializer)?;
    let entries = flatten_forest(&roots);
    trace!(roots = roots.len(), entries = entries.len(), "flattened file tree");
    Ok(entries)
}

pub(crate) fn deserialize_link_tree<'de, D>(deserializer: D) -> Result<Vec<LinkEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_flattened::<D, LinkLeaf>(deserializer)
}

pub(crate) fn deserialize_file_tree<'de, D>(deserializer: D) -> Result<Vec<FileEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_flattened::<D, FileLeaf>(deserializer)
}
