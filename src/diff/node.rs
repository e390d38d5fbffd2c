use std::fmt;

use serde::Deserialize;

/// Handle of a node inside the [`NodeStore`](super::store::NodeStore) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Change kind as delivered by the diff backend.
///
/// There is deliberately no `FileGroup` variant: a backend that sends one
/// fails to decode instead of being silently reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RawDiffKind {
    New,
    Removed,
    Changed,
}

/// Change kind of a node in the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    New,
    Removed,
    Changed,
    /// Synthetic aggregate of sibling file entries.
    FileGroup,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::New => "New",
            DiffKind::Removed => "Removed",
            DiffKind::Changed => "Changed",
            DiffKind::FileGroup => "FileGroup",
        }
    }
}

impl From<RawDiffKind> for DiffKind {
    fn from(kind: RawDiffKind) -> Self {
        match kind {
            RawDiffKind::New => DiffKind::New,
            RawDiffKind::Removed => DiffKind::Removed,
            RawDiffKind::Changed => DiffKind::Changed,
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diff record exactly as the backend sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDiffNode {
    pub path: String,
    pub kind: RawDiffKind,
    pub folder: bool,
    pub delta_size: i64,
    pub delta_alloc: i64,
    pub delta_n_files: i64,
    pub delta_n_folders: i64,
}

/// Fetch state of a node's children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Children {
    /// No fetch has completed yet.
    #[default]
    Unfetched,
    /// Fetched (possibly empty) and cached for the session.
    Fetched(Vec<NodeId>),
}

impl Children {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Children::Fetched(_))
    }

    pub fn ids(&self) -> Option<&[NodeId]> {
        match self {
            Children::Unfetched => None,
            Children::Fetched(ids) => Some(ids),
        }
    }
}

/// A node of the diff forest.
#[derive(Debug, Clone)]
pub struct DiffNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub path: String,
    pub name: String,
    pub kind: DiffKind,
    pub is_folder: bool,
    pub delta_size: i64,
    pub delta_alloc: i64,
    pub delta_file_count: i64,
    pub delta_folder_count: i64,
    pub children: Children,
    pub expanded: bool,
}

impl DiffNode {
    /// Adopt a backend record: collapsed, children not yet fetched.
    pub fn from_raw(id: NodeId, parent: Option<NodeId>, raw: RawDiffNode) -> Self {
        let name = name_component(&raw.path);
        Self {
            id,
            parent,
            name,
            path: raw.path,
            kind: raw.kind.into(),
            is_folder: raw.folder,
            delta_size: raw.delta_size,
            delta_alloc: raw.delta_alloc,
            delta_file_count: raw.delta_n_files,
            delta_folder_count: raw.delta_n_folders,
            children: Children::Unfetched,
            expanded: false,
        }
    }

    pub fn is_file_group(&self) -> bool {
        self.kind == DiffKind::FileGroup
    }

    /// Whether the presentation layer offers an expand toggle for this node.
    pub fn is_expandable(&self) -> bool {
        self.is_folder || self.is_file_group()
    }
}

/// Last path component: disk (`C:`), folder or file name.
///
/// Both `/` and `\` separate components. A path with no components
/// (such as `/`) is returned unchanged.
pub fn name_component(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
        .to_string()
}

const BYTE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a signed byte delta, e.g. `+1.50 KB`, `-50.00 B`, `0 B`.
pub fn format_delta_bytes(bytes: i64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut unit = 0;
    let mut magnitude = bytes.unsigned_abs() as f64;
    let mut value = bytes as f64;
    while magnitude >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        magnitude /= 1024.0;
        value /= 1024.0;
        unit += 1;
    }
    let sign = if bytes > 0 { "+" } else { "" };
    format!("{}{:.2} {}", sign, value, BYTE_UNITS[unit])
}
