use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::diff::sorter::SortState;
use crate::theme::ThemeColors;

const KEY_HINTS: &str = " 1-6:sort  o:open  r:retry  ?:help ";

/// Status bar: selected path, row count, sort state and key hints, or a
/// transient status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    row_count: usize,
    sort: SortState,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, row_count: usize, sort: SortState, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            row_count,
            sort,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    fn info(&self) -> String {
        let arrow = if self.sort.ascending { "▲" } else { "▼" };
        format!(
            "{} rows | {} {}",
            self.row_count,
            self.sort.field.label(),
            arrow
        )
    }
}

/// Keep the last `max` characters, marking the cut with `...`.
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        buf.set_style(area, Style::default().bg(self.theme.status_bg));

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        // [path] gap [info] [hints]
        let info = self.info();
        let info_len = info.chars().count();
        let hints_len = KEY_HINTS.chars().count();
        let path_width = width
            .saturating_sub(hints_len)
            .saturating_sub(info_len)
            .saturating_sub(1);
        let path_display = truncate_left(self.path_str, path_width);
        let gap = width
            .saturating_sub(path_display.chars().count())
            .saturating_sub(info_len)
            .saturating_sub(hints_len)
            .max(1);

        let line = Line::from(vec![
            Span::styled(path_display, Style::default().fg(self.theme.status_fg)),
            Span::raw(" ".repeat(gap)),
            Span::styled(info, Style::default().fg(self.theme.header_fg)),
            Span::styled(
                KEY_HINTS,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
