//! Flatten the visible part of the forest into display rows.

use super::fetcher::{FetchError, NodeFetcher};
use super::node::{DiffKind, DiffNode, NodeId};
use super::sorter::SortState;
use super::store::NodeStore;

/// `parent_key` of top-level rows.
pub const ROOT_KEY: &str = "root";

/// One visible line of the tree-table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    /// `root` followed by `/name` for every ancestor.
    pub parent_key: String,
    pub name: String,
    pub path: String,
    pub kind: DiffKind,
    pub is_folder: bool,
    pub delta_size: i64,
    pub delta_alloc: i64,
    pub delta_file_count: i64,
    pub delta_folder_count: i64,
    pub expanded: bool,
    pub expandable: bool,
    pub is_last_sibling: bool,
    /// Why this row's children could not be loaded on the last walk.
    pub load_error: Option<String>,
}

impl DiffRow {
    fn new(node: &DiffNode, visit: &Visit, load_error: Option<String>) -> Self {
        Self {
            id: node.id,
            parent: node.parent,
            depth: visit.depth,
            parent_key: visit.parent_key.clone(),
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            is_folder: node.is_folder,
            delta_size: node.delta_size,
            delta_alloc: node.delta_alloc,
            delta_file_count: node.delta_file_count,
            delta_folder_count: node.delta_folder_count,
            expanded: node.expanded,
            expandable: node.is_expandable(),
            is_last_sibling: visit.is_last,
            load_error,
        }
    }
}

/// A node whose children failed to load during a walk.
#[derive(Debug)]
pub struct RowFailure {
    pub id: NodeId,
    pub path: String,
    pub error: FetchError,
}

/// Result of a complete walk.
#[derive(Debug, Default)]
pub struct Rendered {
    pub rows: Vec<DiffRow>,
    pub failures: Vec<RowFailure>,
}

struct Visit {
    id: NodeId,
    depth: usize,
    parent_key: String,
    is_last: bool,
}

/// Walk the forest depth-first, pre-order, in the current sort order.
///
/// Every visited node has its children resolved (fetching if needed) and
/// sorted before its row is emitted; children are visited only when the
/// node is expanded, so collapsed subtrees are never fetched below their
/// own level. A failed child fetch is recorded on the row and in
/// [`Rendered::failures`] and the walk continues. Only a failure to load
/// the forest itself aborts the walk.
pub async fn render_rows<F: NodeFetcher>(
    store: &mut NodeStore<F>,
    sort: &SortState,
) -> Result<Rendered, FetchError> {
    store.roots().await?;
    store.sort_roots(sort);
    let roots = store.roots().await?.to_vec();

    let mut rendered = Rendered::default();
    let mut stack: Vec<Visit> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(i, id)| Visit {
            id: *id,
            depth: 0,
            parent_key: ROOT_KEY.to_string(),
            is_last: i + 1 == roots.len(),
        })
        .collect();

    while let Some(visit) = stack.pop() {
        let failure = match store.children(visit.id).await {
            Ok(_) => {
                store.sort_children(visit.id, sort);
                None
            }
            Err(error) => Some(error),
        };

        let Some(node) = store.node(visit.id) else {
            continue;
        };
        let load_error = failure.as_ref().map(|e| e.to_string());
        rendered.rows.push(DiffRow::new(node, &visit, load_error));

        if let Some(error) = failure {
            rendered.failures.push(RowFailure {
                id: node.id,
                path: node.path.clone(),
                error,
            });
            continue;
        }
        if !node.expanded {
            continue;
        }
        if let Some(children) = node.children.ids() {
            let key = format!("{}/{}", visit.parent_key, node.name);
            for (i, child) in children.iter().enumerate().rev() {
                stack.push(Visit {
                    id: *child,
                    depth: visit.depth + 1,
                    parent_key: key.clone(),
                    is_last: i + 1 == children.len(),
                });
            }
        }
    }

    tracing::debug!(
        rows = rendered.rows.len(),
        failures = rendered.failures.len(),
        nodes = store.len(),
        "rendered tree"
    );
    Ok(rendered)
}
