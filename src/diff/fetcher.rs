//! Boundary to the external diff engine.
//!
//! The engine computes the diff between two snapshots; this crate only
//! consumes its nodes, one folder level at a time.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::node::RawDiffNode;

/// Failure to obtain nodes from the diff backend.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Diff backend I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend answered with something that is not a valid node list.
    #[error("Malformed diff data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Diff backend error: {0}")]
    Backend(String),
}

/// Supplier of raw diff nodes.
///
/// Implementations must never produce `FileGroup` nodes; that kind is
/// synthesized by the grouper and is unrepresentable in [`RawDiffNode`].
#[async_trait]
pub trait NodeFetcher: Send + Sync {
    /// Top-level nodes of the comparison (usually disks or scan roots).
    async fn fetch_roots(&self) -> Result<Vec<RawDiffNode>, FetchError>;

    /// Direct children of the node at `path`.
    async fn fetch_children(&self, path: &str) -> Result<Vec<RawDiffNode>, FetchError>;
}

/// On-disk export written by the diff engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiffExport {
    /// Snapshot file the newer side was read from.
    pub newer: Option<String>,
    /// Snapshot file the older side was read from.
    pub older: Option<String>,
    pub roots: Vec<RawDiffNode>,
    /// Children keyed by parent path.
    pub children: HashMap<String, Vec<RawDiffNode>>,
}

impl DiffExport {
    /// Reject exports that list children under a file entry.
    pub fn validate(&self) -> Result<(), FetchError> {
        let files: HashSet<&str> = self
            .roots
            .iter()
            .chain(self.children.values().flatten())
            .filter(|node| !node.folder)
            .map(|node| node.path.as_str())
            .collect();
        match self.children.keys().find(|path| files.contains(path.as_str())) {
            Some(path) => Err(FetchError::Backend(format!(
                "children listed under file `{}`",
                path
            ))),
            None => Ok(()),
        }
    }
}

/// Fetcher serving nodes from a [`DiffExport`] JSON file.
#[derive(Debug)]
pub struct JsonDiffFetcher {
    source: PathBuf,
    export: DiffExport,
}

impl JsonDiffFetcher {
    /// Read and decode the export at `path`.
    pub async fn open(path: &Path) -> Result<Self, FetchError> {
        let content = tokio::fs::read_to_string(path).await?;
        let export = serde_json::from_str::<DiffExport>(&content)?;
        export.validate()?;
        tracing::info!(
            source = %path.display(),
            roots = export.roots.len(),
            folders = export.children.len(),
            "loaded diff export"
        );
        Ok(Self::from_export(path.to_path_buf(), export))
    }

    pub fn from_export(source: PathBuf, export: DiffExport) -> Self {
        Self { source, export }
    }

    /// Names of the compared snapshot files, newer first.
    pub fn snapshot_files(&self) -> (Option<&str>, Option<&str>) {
        (self.export.newer.as_deref(), self.export.older.as_deref())
    }

    /// View title: the compared snapshots, or the export file when the
    /// engine did not record them.
    pub fn title(&self) -> String {
        match self.snapshot_files() {
            (Some(newer), Some(older)) => format!("{} ⟷ {}", newer, older),
            (Some(one), None) | (None, Some(one)) => one.to_string(),
            (None, None) => self.source.display().to_string(),
        }
    }
}

#[async_trait]
impl NodeFetcher for JsonDiffFetcher {
    async fn fetch_roots(&self) -> Result<Vec<RawDiffNode>, FetchError> {
        Ok(self.export.roots.clone())
    }

    async fn fetch_children(&self, path: &str) -> Result<Vec<RawDiffNode>, FetchError> {
        Ok(self
            .export
            .children
            .get(path)
            .cloned()
            .unwrap_or_default())
    }
}
