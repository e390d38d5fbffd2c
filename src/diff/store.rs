use super::fetcher::{FetchError, NodeFetcher};
use super::grouper::{group_siblings, FileGroup, Sibling, DEFAULT_GROUP_LABEL};
use super::node::{Children, DiffKind, DiffNode, NodeId, RawDiffNode};
use super::sorter::SortState;

/// Owner of the diff forest and its fetch cache.
///
/// Nodes live in an append-only arena indexed by [`NodeId`]; a node's
/// children are fetched at most once and then served from the cache for
/// the rest of the session. Every fetched sibling list is grouped exactly
/// once, at adoption time.
pub struct NodeStore<F> {
    fetcher: F,
    nodes: Vec<DiffNode>,
    roots: Option<Vec<NodeId>>,
    group_label: String,
}

impl<F: NodeFetcher> NodeStore<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            nodes: Vec::new(),
            roots: None,
            group_label: DEFAULT_GROUP_LABEL.to_string(),
        }
    }

    /// Label template for synthesized file groups (`{n}` = member count).
    pub fn with_group_label(mut self, template: impl Into<String>) -> Self {
        self.group_label = template.into();
        self
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn node(&self, id: NodeId) -> Option<&DiffNode> {
        self.nodes.get(id.index())
    }

    /// Number of nodes adopted so far, for diagnostics.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The forest, fetching and grouping it on first use.
    ///
    /// A failed fetch leaves the forest unset so the next call retries.
    pub async fn roots(&mut self) -> Result<&[NodeId], FetchError> {
        if self.roots.is_none() {
            let raw = self.fetcher.fetch_roots().await.inspect_err(|e| {
                tracing::warn!(error = %e, "fetching root nodes failed");
            })?;
            tracing::info!(count = raw.len(), "fetched root nodes");
            let siblings = group_siblings(raw, &self.group_label);
            let ids = self.adopt(siblings, None);
            self.roots = Some(ids);
        }
        Ok(self.roots.as_deref().unwrap_or(&[]))
    }

    /// Children of `id`, fetching and grouping them if not cached yet.
    ///
    /// On failure the node stays [`Children::Unfetched`] and nothing is
    /// cached, so a later call retries. Unknown ids have no children.
    pub async fn children(&mut self, id: NodeId) -> Result<&[NodeId], FetchError> {
        let unfetched_path = match self.nodes.get(id.index()) {
            None => return Ok(&[]),
            Some(node) if node.children.is_fetched() => None,
            Some(node) => Some(node.path.clone()),
        };

        if let Some(path) = unfetched_path {
            let raw = self.fetcher.fetch_children(&path).await.inspect_err(|e| {
                tracing::warn!(path = %path, error = %e, "fetching children failed");
            })?;
            tracing::debug!(path = %path, count = raw.len(), "fetched children");
            let siblings = group_siblings(raw, &self.group_label);
            let ids = self.adopt(siblings, Some(id));
            if let Some(node) = self.nodes.get_mut(id.index()) {
                node.children = Children::Fetched(ids);
            }
        }

        Ok(self
            .nodes
            .get(id.index())
            .and_then(|node| node.children.ids())
            .unwrap_or(&[]))
    }

    /// Flip a node's expansion flag and return the new value.
    ///
    /// Never fetches; expanding an unfetched node only records intent.
    pub fn toggle_expanded(&mut self, id: NodeId) -> Option<bool> {
        let node = self.nodes.get_mut(id.index())?;
        node.expanded = !node.expanded;
        Some(node.expanded)
    }

    /// Set a node's expansion flag and return the new value.
    ///
    /// Like [`toggle_expanded`](Self::toggle_expanded), this never fetches.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> Option<bool> {
        let node = self.nodes.get_mut(id.index())?;
        node.expanded = expanded;
        Some(node.expanded)
    }

    /// Reorder the forest's root list.
    pub fn sort_roots(&mut self, sort: &SortState) {
        if let Some(roots) = self.roots.as_mut() {
            sort.sort_siblings(roots, &self.nodes);
        }
    }

    /// Reorder the direct children of `id`; descendants are left alone.
    pub fn sort_children(&mut self, id: NodeId, sort: &SortState) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };
        let Children::Fetched(children) = &mut node.children else {
            return;
        };
        let mut ids = std::mem::take(children);
        sort.sort_siblings(&mut ids, &self.nodes);
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.children = Children::Fetched(ids);
        }
    }

    fn adopt(&mut self, siblings: Vec<Sibling>, parent: Option<NodeId>) -> Vec<NodeId> {
        siblings
            .into_iter()
            .map(|sibling| match sibling {
                Sibling::Entry(raw) => self.insert_raw(raw, parent),
                Sibling::Group(group) => self.insert_group(group, parent),
            })
            .collect()
    }

    fn insert_raw(&mut self, raw: RawDiffNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DiffNode::from_raw(id, parent, raw));
        id
    }

    fn insert_group(&mut self, group: FileGroup, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DiffNode {
            id,
            parent,
            path: group.path,
            name: group.name,
            kind: DiffKind::FileGroup,
            is_folder: false,
            delta_size: group.delta_size,
            delta_alloc: group.delta_alloc,
            delta_file_count: group.delta_file_count,
            delta_folder_count: 0,
            children: Children::Fetched(Vec::new()),
            expanded: false,
        });
        let members: Vec<NodeId> = group
            .members
            .into_iter()
            .map(|raw| self.insert_raw(raw, Some(id)))
            .collect();
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.children = Children::Fetched(members);
        }
        id
    }
}
