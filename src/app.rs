use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::diff::fetcher::NodeFetcher;
use crate::diff::node::DiffKind;
use crate::diff::sorter::SortField;
use crate::diff::tree::DiffTreeState;
use crate::opener;
use crate::theme::ThemeColors;

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Application mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Main application state.
pub struct App<F> {
    pub tree_state: DiffTreeState<F>,
    pub should_quit: bool,
    pub mode: AppMode,
    pub help_scroll: usize,
    pub status_message: Option<StatusMessage>,
    pub theme: ThemeColors,
    pub use_icons: bool,
    /// Title shown on the table border.
    pub title: String,
    /// Inner area of the table on the last draw, used for mouse hits.
    pub table_area: Rect,
}

impl<F: NodeFetcher> App<F> {
    pub fn new(tree_state: DiffTreeState<F>, theme: ThemeColors) -> Self {
        Self {
            tree_state,
            should_quit: false,
            mode: AppMode::Normal,
            help_scroll: 0,
            status_message: None,
            theme,
            use_icons: false,
            title: String::from("snapshot diff"),
            table_area: Rect::default(),
        }
    }

    pub fn with_icons(mut self, use_icons: bool) -> Self {
        self.use_icons = use_icons;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: msg.into(),
            is_error: false,
            created: Instant::now(),
        });
    }

    pub fn set_error_message(&mut self, msg: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: msg.into(),
            is_error: true,
            created: Instant::now(),
        });
    }

    /// Clear the status message once it has been shown for [`STATUS_TTL`].
    pub fn clear_expired_status(&mut self) {
        if let Some(message) = &self.status_message {
            if message.created.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    /// Re-render the tree if anything changed since the last walk.
    pub async fn refresh(&mut self) {
        if !self.tree_state.is_dirty() {
            return;
        }
        match self.tree_state.refresh().await {
            Ok(failures) => {
                tracing::trace!(generation = self.tree_state.generation(), "rows swapped");
                for failure in &failures {
                    tracing::debug!(node = %failure.id, path = %failure.path, "row left unexpanded");
                }
                if let Some(first) = failures.first() {
                    let more = match failures.len() {
                        1 => String::new(),
                        n => format!(" (+{} more)", n - 1),
                    };
                    let text = format!("⚠ Failed to load {}: {}{}", first.path, first.error, more);
                    self.set_error_message(text);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "loading the diff failed");
                self.set_error_message(format!("⚠ {}", e));
            }
        }
    }

    /// Mark the tree for a new walk; failed loads are retried.
    pub fn retry(&mut self) {
        self.tree_state.mark_dirty();
        self.set_status_message("Reloading");
    }

    /// Sort by a 1-based column number; the same column again reverses.
    pub fn sort_by_column(&mut self, column: usize) {
        if let Some(field) = SortField::from_column(column) {
            self.tree_state.click_sort(field);
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Normal => AppMode::Help,
            AppMode::Help => AppMode::Normal,
        };
        self.help_scroll = 0;
    }

    /// Rows that fit below the table header.
    pub fn page_size(&self) -> usize {
        (self.table_area.height.saturating_sub(1) as usize).max(1)
    }

    pub fn page_down(&mut self) {
        for _ in 0..self.page_size() {
            self.tree_state.select_next();
        }
    }

    pub fn page_up(&mut self) {
        for _ in 0..self.page_size() {
            self.tree_state.select_previous();
        }
    }

    /// Path to reveal for the selected row.
    ///
    /// A file group has no path of its own, so its parent folder is used.
    pub fn open_target(&self) -> Option<PathBuf> {
        let row = self.tree_state.selected_row()?;
        if row.kind != DiffKind::FileGroup {
            return Some(PathBuf::from(&row.path));
        }
        let parent = self.tree_state.store().node(row.parent?)?;
        Some(PathBuf::from(&parent.path))
    }

    /// Reveal the selected row in the system file manager.
    pub async fn open_selected(&mut self) {
        let Some(target) = self.open_target() else {
            self.set_error_message("Nothing to open here");
            return;
        };
        match opener::open_in_file_manager(&target).await {
            Ok(()) => self.set_status_message(format!("Opened {}", target.display())),
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "open failed");
                self.set_error_message(format!("⚠ {}", e));
            }
        }
    }
}
