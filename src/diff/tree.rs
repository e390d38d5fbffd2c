use crate::error::ConfigurationError;

use super::fetcher::{FetchError, NodeFetcher};
use super::node::NodeId;
use super::render::{render_rows, DiffRow, RowFailure};
use super::sorter::{SortField, SortState};
use super::store::NodeStore;

/// Command/query surface of the diff tree-table.
///
/// Commands (`toggle_expansion`, `set_sort`, ...) only mutate state and mark
/// the view dirty; `refresh` performs the walk and swaps in the new row
/// list in one step. A walk borrows the state mutably for its whole
/// duration, so walks are serialized: input arriving meanwhile waits in
/// the event queue and is applied before the next walk.
pub struct DiffTreeState<F> {
    store: NodeStore<F>,
    sort: SortState,
    rows: Vec<DiffRow>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    generation: u64,
    dirty: bool,
}

impl<F: NodeFetcher> DiffTreeState<F> {
    /// Create the state; rows stay empty until the first `refresh`.
    pub fn new(store: NodeStore<F>, sort: SortState) -> Self {
        Self {
            store,
            sort,
            rows: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            generation: 0,
            dirty: true,
        }
    }

    pub fn rows(&self) -> &[DiffRow] {
        &self.rows
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn store(&self) -> &NodeStore<F> {
        &self.store
    }

    /// Number of row lists committed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether state changed since the last committed walk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn selected_row(&self) -> Option<&DiffRow> {
        self.rows.get(self.selected_index)
    }

    /// Re-walk the visible forest and replace the row list.
    ///
    /// Selection follows the previously selected node when it is still
    /// visible. On a forest fetch failure the old rows stay in place.
    /// Child fetch failures are returned; their rows are still shown.
    pub async fn refresh(&mut self) -> Result<Vec<RowFailure>, FetchError> {
        self.dirty = false;
        let selected = self.selected_row().map(|row| row.id);

        let rendered = render_rows(&mut self.store, &self.sort).await?;

        self.rows = rendered.rows;
        self.generation += 1;
        if let Some(index) = selected.and_then(|id| self.index_of(id)) {
            self.selected_index = index;
        }
        if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len().saturating_sub(1);
        }
        Ok(rendered.failures)
    }

    /// Row index of a visible node.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Flip a node's expansion. Returns false for unknown nodes.
    pub fn toggle_expansion(&mut self, id: NodeId) -> bool {
        match self.store.toggle_expanded(id) {
            Some(expanded) => {
                tracing::debug!(node = %id, expanded, "toggled expansion");
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Toggle the selected row if it can be expanded.
    pub fn toggle_selected(&mut self) {
        if let Some(row) = self.selected_row().filter(|row| row.expandable) {
            let id = row.id;
            tracing::debug!(row = %format!("{}/{}", row.parent_key, row.name), "toggle");
            self.toggle_expansion(id);
        }
    }

    /// Expand the selected row if it is a collapsed folder or group.
    pub fn expand_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            if row.expandable && !row.expanded {
                let id = row.id;
                self.toggle_expansion(id);
            }
        }
    }

    /// Collapse the selected row, or jump to its parent row.
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.expandable && row.expanded {
            let id = row.id;
            if self.store.set_expanded(id, false).is_some() {
                self.dirty = true;
            }
            return;
        }
        if let Some(index) = row.parent.and_then(|parent| self.index_of(parent)) {
            self.selected_index = index;
        }
    }

    /// Replace the sort key and direction.
    pub fn set_sort(&mut self, field: SortField, ascending: bool) {
        self.apply_sort(SortState::new(field, ascending));
    }

    /// Sort by a field given by name; unknown names are rejected.
    pub fn set_sort_by_name(&mut self, name: &str, ascending: bool) -> Result<(), ConfigurationError> {
        let field = name.parse::<SortField>()?;
        self.set_sort(field, ascending);
        Ok(())
    }

    /// Column-header click: toggles direction on the active field.
    pub fn click_sort(&mut self, field: SortField) {
        self.apply_sort(self.sort.clicked(field));
    }

    fn apply_sort(&mut self, sort: SortState) {
        if sort != self.sort {
            tracing::debug!(field = sort.field.as_str(), ascending = sort.ascending, "sort changed");
            self.sort = sort;
            self.dirty = true;
        }
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.rows.len() {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one row.
    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.rows.len().saturating_sub(1);
    }

    /// Update the scroll offset to ensure the selected row is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::node::{Children, DiffKind, RawDiffKind};
    use crate::diff::test_support::{file, folder, MockFetcher};

    fn fetcher() -> MockFetcher {
        MockFetcher::new(vec![
            folder("/a", RawDiffKind::Changed, 7),
            folder("/d", RawDiffKind::New, 30),
            file("/b.txt", RawDiffKind::New, 100),
            file("/c.txt", RawDiffKind::Removed, -50),
        ])
        .with_children(
            "/a",
            vec![
                folder("/a/x", RawDiffKind::New, 3),
                folder("/a/y", RawDiffKind::Changed, 4),
            ],
        )
    }

    async fn loaded() -> DiffTreeState<MockFetcher> {
        let mut state = DiffTreeState::new(NodeStore::new(fetcher()), SortState::default());
        state.refresh().await.unwrap();
        state
    }

    fn names<F: NodeFetcher>(state: &DiffTreeState<F>) -> Vec<String> {
        state.rows().iter().map(|r| r.name.clone()).collect()
    }

    fn select(state: &mut DiffTreeState<MockFetcher>, name: &str) {
        state.selected_index = state
            .rows()
            .iter()
            .position(|r| r.name == name)
            .expect("row visible");
    }

    #[tokio::test]
    async fn starts_dirty_and_refresh_commits_rows() {
        let mut state = DiffTreeState::new(NodeStore::new(fetcher()), SortState::default());
        assert!(state.is_dirty());
        assert!(state.rows().is_empty());
        state.refresh().await.unwrap();
        assert!(!state.is_dirty());
        assert_eq!(state.generation(), 1);
        assert_eq!(names(&state), vec!["2 file diff nodes", "d", "a"]);
    }

    #[tokio::test]
    async fn toggling_twice_restores_rows() {
        let mut state = loaded().await;
        let original = state.rows().to_vec();

        select(&mut state, "a");
        state.toggle_selected();
        assert!(state.is_dirty());
        state.refresh().await.unwrap();
        assert_eq!(names(&state), vec!["2 file diff nodes", "d", "a", "y", "x"]);

        state.toggle_selected();
        state.refresh().await.unwrap();
        assert_eq!(state.rows(), &original[..]);
        assert_eq!(state.store().fetcher().calls_for("/a"), 1);
    }

    #[tokio::test]
    async fn toggling_a_file_row_does_nothing() {
        let mut state = loaded().await;
        let group = state.rows()[0].id;
        state.toggle_selected();
        state.refresh().await.unwrap();
        // group rows are expandable, member files are not
        assert!(state.rows()[0].expanded);
        select(&mut state, "b.txt");
        state.toggle_selected();
        assert!(!state.is_dirty());
        assert_eq!(state.rows()[0].id, group);
    }

    #[tokio::test]
    async fn sort_change_reorders_on_refresh() {
        let mut state = loaded().await;
        state.set_sort(SortField::Path, true);
        assert!(state.is_dirty());
        state.refresh().await.unwrap();
        assert_eq!(names(&state), vec!["a", "d", "2 file diff nodes"]);

        state.click_sort(SortField::Path);
        assert_eq!(state.sort(), SortState::new(SortField::Path, false));
        state.refresh().await.unwrap();
        assert_eq!(names(&state), vec!["d", "a", "2 file diff nodes"]);
    }

    #[tokio::test]
    async fn setting_same_sort_is_not_dirty() {
        let mut state = loaded().await;
        state.set_sort(SortField::Size, false);
        assert!(!state.is_dirty());
    }

    #[tokio::test]
    async fn unknown_sort_name_is_rejected() {
        let mut state = loaded().await;
        let err = state.set_sort_by_name("colour", true).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownSortField("colour".into()));
        assert_eq!(state.sort(), SortState::default());
        assert!(!state.is_dirty());

        state.set_sort_by_name("kind", true).unwrap();
        assert_eq!(state.sort().field, SortField::Kind);
    }

    #[tokio::test]
    async fn selection_follows_node_across_reorder() {
        let mut state = loaded().await;
        select(&mut state, "a");
        state.set_sort(SortField::Path, true);
        state.refresh().await.unwrap();
        assert_eq!(state.selected_row().unwrap().name, "a");
        assert_eq!(state.selected_index, 0);
    }

    #[tokio::test]
    async fn collapse_jumps_to_parent_then_collapses() {
        let mut state = loaded().await;
        select(&mut state, "a");
        state.expand_selected();
        state.refresh().await.unwrap();
        select(&mut state, "x");

        state.collapse_selected();
        assert_eq!(state.selected_row().unwrap().name, "a");
        assert!(!state.is_dirty());

        state.collapse_selected();
        assert!(state.is_dirty());
        state.refresh().await.unwrap();
        assert_eq!(names(&state), vec!["2 file diff nodes", "d", "a"]);
    }

    #[tokio::test]
    async fn expanding_empty_folder_keeps_it_expanded() {
        let fetcher = fetcher();
        let mut state = DiffTreeState::new(NodeStore::new(fetcher), SortState::default());
        state.refresh().await.unwrap();
        select(&mut state, "d");
        state.expand_selected();
        let d = state.selected_row().unwrap().id;
        // "/d" was fetched during the walk and came back empty
        assert_eq!(state.store().node(d).unwrap().children, Children::Fetched(Vec::new()));
        state.refresh().await.unwrap();
        assert!(state.selected_row().unwrap().expanded);
    }

    #[tokio::test]
    async fn root_failure_keeps_previous_rows() {
        let mut state = DiffTreeState::new(NodeStore::new(fetcher()), SortState::default());
        state.store().fetcher().set_roots_fail(true);
        assert!(state.refresh().await.is_err());
        assert!(state.rows().is_empty());
        assert_eq!(state.generation(), 0);

        state.store().fetcher().set_roots_fail(false);
        state.mark_dirty();
        state.refresh().await.unwrap();
        assert_eq!(state.rows().len(), 3);
    }

    #[tokio::test]
    async fn child_failure_is_reported_and_rows_committed() {
        let mut state = DiffTreeState::new(NodeStore::new(fetcher()), SortState::default());
        state.store().fetcher().fail_path("/a");
        let failures = state.refresh().await.unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, "/a");
        assert_eq!(state.rows().len(), 3);
        assert_eq!(state.rows()[0].kind, DiffKind::FileGroup);
    }

    #[tokio::test]
    async fn selection_movement_clamps() {
        let mut state = loaded().await;
        state.select_previous();
        assert_eq!(state.selected_index, 0);
        state.select_last();
        assert_eq!(state.selected_index, 2);
        state.select_next();
        assert_eq!(state.selected_index, 2);
        state.select_first();
        assert_eq!(state.selected_index, 0);
    }

    #[tokio::test]
    async fn update_scroll_keeps_selection_visible() {
        let mut state = loaded().await;
        state.selected_index = 2;
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 1);
        state.selected_index = 0;
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 0);
    }
}
