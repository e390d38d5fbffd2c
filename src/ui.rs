use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::diff_table::DiffTableWidget;
use crate::components::help::HelpOverlay;
use crate::components::status_bar::StatusBarWidget;
use crate::diff::fetcher::NodeFetcher;

/// Render the application UI.
pub fn render<F: NodeFetcher>(app: &mut App<F>, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .title(format!(" {} ", app.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    app.table_area = block.inner(chunks[0]);

    // Header takes the first line of the table
    let visible_height = app.table_area.height.saturating_sub(1) as usize;
    app.tree_state.update_scroll(visible_height);

    let tree = &app.tree_state;
    let table = DiffTableWidget::new(tree.rows(), tree.sort(), &app.theme)
        .selection(tree.selected_index, tree.scroll_offset)
        .use_icons(app.use_icons)
        .block(block);
    frame.render_widget(table, chunks[0]);

    let path = tree.selected_row().map(|row| row.path.as_str()).unwrap_or("");
    let mut status = StatusBarWidget::new(path, tree.rows().len(), tree.sort(), &app.theme);
    if let Some(message) = &app.status_message {
        status = status.status_message(&message.text, message.is_error);
    }
    frame.render_widget(status, chunks[1]);

    if app.mode == AppMode::Help {
        frame.render_widget(HelpOverlay::new(&app.theme, app.help_scroll), area);
    }
}
