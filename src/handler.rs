use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode};
use crate::components::diff_table::column_at;
use crate::components::help::HelpOverlay;
use crate::diff::fetcher::NodeFetcher;

/// Handle a key event.
pub async fn handle_key_event<F: NodeFetcher>(app: &mut App<F>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.mode == AppMode::Help {
        handle_help_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => app.tree_state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.tree_state.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.tree_state.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.tree_state.select_last(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.tree_state.toggle_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.tree_state.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.tree_state.collapse_selected(),
        KeyCode::Char('o') => app.open_selected().await,
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(column) = c.to_digit(10) {
                app.sort_by_column(column as usize);
            }
        }
        _ => {}
    }
}

fn handle_help_key<F: NodeFetcher>(app: &mut App<F>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => {
            if app.help_scroll + 1 < HelpOverlay::total_lines() {
                app.help_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// Handle a mouse event against the table area of the last draw.
pub fn handle_mouse_event<F: NodeFetcher>(app: &mut App<F>, mouse: MouseEvent) {
    if app.mode == AppMode::Help {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.tree_state.select_next(),
        MouseEventKind::ScrollUp => app.tree_state.select_previous(),
        MouseEventKind::Down(MouseButton::Left) => handle_click(app, mouse.column, mouse.row),
        _ => {}
    }
}

fn handle_click<F: NodeFetcher>(app: &mut App<F>, column: u16, row: u16) {
    let area = app.table_area;
    if column < area.x || column >= area.x + area.width {
        return;
    }
    if row == area.y {
        if let Some(field) = column_at(area, column) {
            app.tree_state.click_sort(field);
        }
        return;
    }
    if row <= area.y || row >= area.y + area.height {
        return;
    }

    let index = app.tree_state.scroll_offset + (row - area.y - 1) as usize;
    if index >= app.tree_state.rows().len() {
        return;
    }
    if index == app.tree_state.selected_index {
        app.tree_state.toggle_selected();
    } else {
        app.tree_state.selected_index = index;
    }
}
