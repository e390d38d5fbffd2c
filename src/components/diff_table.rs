use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::diff::node::{format_delta_bytes, DiffKind};
use crate::diff::render::DiffRow;
use crate::diff::sorter::{SortField, SortState};
use crate::theme::ThemeColors;

const KIND_WIDTH: u16 = 9;
const BYTES_WIDTH: u16 = 12;
const COUNT_WIDTH: u16 = 9;
const COLUMN_GAP: u16 = 1;

/// Column widths in [`SortField::ALL`] order; the path column takes the
/// space the fixed columns leave over.
pub fn column_widths(total: u16) -> [u16; 6] {
    let fixed = KIND_WIDTH + 2 * BYTES_WIDTH + 2 * COUNT_WIDTH + 5 * COLUMN_GAP;
    [
        total.saturating_sub(fixed),
        KIND_WIDTH,
        BYTES_WIDTH,
        BYTES_WIDTH,
        COUNT_WIDTH,
        COUNT_WIDTH,
    ]
}

/// Column under horizontal position `x` of a table drawn in `area`.
pub fn column_at(area: Rect, x: u16) -> Option<SortField> {
    let mut start = area.x;
    for (field, width) in SortField::ALL.into_iter().zip(column_widths(area.width)) {
        if x >= start && x < start + width {
            return Some(field);
        }
        start += width + COLUMN_GAP;
    }
    None
}

/// Signed count, `0` without a sign.
pub fn format_count(count: i64) -> String {
    if count > 0 {
        format!("+{}", count)
    } else {
        count.to_string()
    }
}

/// Pad or cut `text` to exactly `width` characters.
fn fit(text: &str, width: u16, right_align: bool) -> String {
    let width = width as usize;
    let cut: String = text.chars().take(width).collect();
    if right_align {
        format!("{:>width$}", cut, width = width)
    } else {
        format!("{:<width$}", cut, width = width)
    }
}

/// Tree-table of diff rows with a sortable header.
pub struct DiffTableWidget<'a> {
    rows: &'a [DiffRow],
    selected: usize,
    scroll_offset: usize,
    sort: SortState,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> DiffTableWidget<'a> {
    pub fn new(rows: &'a [DiffRow], sort: SortState, theme: &'a ThemeColors) -> Self {
        Self {
            rows,
            selected: 0,
            scroll_offset: 0,
            sort,
            theme,
            use_icons: false,
            block: None,
        }
    }

    pub fn selection(mut self, selected: usize, scroll_offset: usize) -> Self {
        self.selected = selected;
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn use_icons(mut self, use_icons: bool) -> Self {
        self.use_icons = use_icons;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn header_line(&self, widths: &[u16; 6]) -> Line<'static> {
        let style = Style::default()
            .fg(self.theme.header_fg)
            .bg(self.theme.header_bg)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::with_capacity(11);
        for (i, (field, width)) in SortField::ALL.iter().zip(widths).enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", style));
            }
            let label = if *field == self.sort.field {
                let arrow = if self.sort.ascending { "▲" } else { "▼" };
                format!("{} {}", field.label(), arrow)
            } else {
                field.label().to_string()
            };
            let right_align = !matches!(field, SortField::Path | SortField::Kind);
            spans.push(Span::styled(fit(&label, *width, right_align), style));
        }
        Line::from(spans)
    }

    fn path_cell(&self, row: &DiffRow) -> String {
        let toggle = match (row.expandable, row.expanded) {
            (false, _) => "  ",
            (true, true) => "▼ ",
            (true, false) => "▶ ",
        };
        let icon = match (self.use_icons, row.kind, row.is_folder) {
            (false, _, _) => "",
            (true, DiffKind::FileGroup, _) => "\u{f0c5} ",
            (true, _, true) if row.expanded => "\u{f07c} ",
            (true, _, true) => "\u{f07b} ",
            (true, _, false) => "\u{f15b} ",
        };
        let marker = if row.load_error.is_some() { " ⚠" } else { "" };
        let indent = match row.depth {
            0 => String::new(),
            depth => {
                let branch = if row.is_last_sibling { "└ " } else { "├ " };
                format!("{}{}", "  ".repeat(depth - 1), branch)
            }
        };
        format!(
            "{}{}{}{}{}",
            indent,
            toggle,
            icon,
            row.name,
            marker
        )
    }

    fn row_line(&self, row: &DiffRow, widths: &[u16; 6], selected: bool) -> Line<'static> {
        let base = if selected {
            Style::default()
                .bg(self.theme.table_selected_bg)
                .fg(self.theme.table_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.table_fg)
        };
        let path_style = if row.load_error.is_some() {
            base.fg(self.theme.error_fg)
        } else if row.kind == DiffKind::FileGroup {
            base.fg(self.theme.kind_group_fg).add_modifier(Modifier::ITALIC)
        } else if row.is_folder {
            base.fg(self.theme.folder_fg).add_modifier(Modifier::BOLD)
        } else {
            base
        };

        let cells = [
            (self.path_cell(row), path_style, false),
            (
                row.kind.as_str().to_string(),
                base.fg(self.theme.kind_fg(row.kind)),
                false,
            ),
            (
                format_delta_bytes(row.delta_size),
                base.fg(self.theme.delta_fg(row.delta_size)),
                true,
            ),
            (
                format_delta_bytes(row.delta_alloc),
                base.fg(self.theme.delta_fg(row.delta_alloc)),
                true,
            ),
            (
                format_count(row.delta_file_count),
                base.fg(self.theme.delta_fg(row.delta_file_count)),
                true,
            ),
            (
                format_count(row.delta_folder_count),
                base.fg(self.theme.delta_fg(row.delta_folder_count)),
                true,
            ),
        ];

        let mut spans = Vec::with_capacity(11);
        for (i, ((text, style, right_align), width)) in cells.into_iter().zip(widths).enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", base));
            }
            spans.push(Span::styled(fit(&text, *width, right_align), style));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for DiffTableWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let widths = column_widths(inner.width);
        buf.set_line(inner.x, inner.y, &self.header_line(&widths), inner.width);

        let visible_height = inner.height.saturating_sub(1) as usize;
        for (i, (idx, row)) in self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height)
            .enumerate()
        {
            let y = inner.y + 1 + i as u16;
            let line = self.row_line(row, &widths, idx == self.selected);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
