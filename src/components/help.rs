use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const NAVIGATION_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "j / ↓",
        description: "Move down",
    },
    KeyEntry {
        key: "k / ↑",
        description: "Move up",
    },
    KeyEntry {
        key: "g / Home",
        description: "Jump to first row",
    },
    KeyEntry {
        key: "G / End",
        description: "Jump to last row",
    },
    KeyEntry {
        key: "PgUp / PgDn",
        description: "Move by a page",
    },
];

const TREE_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Enter / Space",
        description: "Expand or collapse folder / group",
    },
    KeyEntry {
        key: "l / →",
        description: "Expand",
    },
    KeyEntry {
        key: "h / ←",
        description: "Collapse, or jump to parent",
    },
    KeyEntry {
        key: "o",
        description: "Reveal path in file manager",
    },
    KeyEntry {
        key: "r",
        description: "Re-render and retry failed loads",
    },
];

const SORT_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "1 – 6",
        description: "Sort by column (again to reverse)",
    },
    KeyEntry {
        key: "Click header",
        description: "Sort by column (again to reverse)",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "?",
        description: "Toggle this help",
    },
    KeyEntry {
        key: "q / Ctrl+C",
        description: "Quit",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Navigation",
        entries: NAVIGATION_KEYS,
    },
    KeyCategory {
        name: "Tree",
        entries: TREE_KEYS,
    },
    KeyCategory {
        name: "Sorting",
        entries: SORT_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let title_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(self.theme.header_fg)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(" Keybinding Reference ", title_style)),
            Line::from(""),
        ];

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(format!("── {} ", category.name), title_style),
                Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
            ]));
            for entry in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<18}", entry.key), key_style),
                    Span::styled(entry.description, Style::default().fg(self.theme.table_fg)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }

    /// Total number of content lines (for scroll bounds).
    pub fn total_lines() -> usize {
        // title, blank, footer, plus header and blank per category
        3 + CATEGORIES
            .iter()
            .map(|category| category.entries.len() + 2)
            .sum::<usize>()
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay_width = (area.width as f32 * 0.70).min(70.0) as u16;
        let overlay_height = (area.height as f32 * 0.80).min(40.0) as u16;
        if overlay_width < 4 || overlay_height < 3 {
            return;
        }

        let x = area.x + area.width.saturating_sub(overlay_width) / 2;
        let y = area.y + area.height.saturating_sub(overlay_height) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent_fg))
            .style(Style::default().bg(self.theme.header_bg));
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let content_lines = self.build_content_lines();
        let visible_height = inner.height as usize;

        for (i, line) in content_lines
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height)
            .enumerate()
        {
            buf.set_line(
                inner.x + 1,
                inner.y + i as u16,
                line,
                inner.width.saturating_sub(2),
            );
        }

        if content_lines.len() > visible_height {
            let total = content_lines.len();
            let indicator = Span::styled(
                format!(" {}/{} ", (self.scroll_offset + 1).min(total), total),
                Style::default().fg(self.theme.dim_fg),
            );
            let width = indicator.width() as u16;
            let ind_x = overlay_area.x + overlay_area.width.saturating_sub(width + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &indicator, width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_text(width: u16, height: u16) -> String {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|pos| buf.cell(pos).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn all_categories_have_entries() {
        for cat in CATEGORIES {
            assert!(!cat.entries.is_empty(), "Category '{}' has no entries", cat.name);
        }
    }

    #[test]
    fn content_lines_match_total() {
        let theme = crate::theme::dark_theme();
        let overlay = HelpOverlay::new(&theme, 0);
        assert_eq!(overlay.build_content_lines().len(), HelpOverlay::total_lines());
    }

    #[test]
    fn renders_keys_in_large_area() {
        let text = rendered_text(100, 50);
        assert!(text.contains("Help"));
        assert!(text.contains("Navigation"));
        assert!(text.contains("Quit"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        rendered_text(3, 2);
    }
}
