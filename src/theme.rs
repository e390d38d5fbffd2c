//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom hex overrides from
//! the config file.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};
use crate::diff::node::DiffKind;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Table
    pub table_fg: Color,
    pub table_selected_bg: Color,
    pub table_selected_fg: Color,
    pub header_fg: Color,
    pub header_bg: Color,
    pub folder_fg: Color,

    // Deltas
    pub positive_fg: Color,
    pub negative_fg: Color,

    // Kinds
    pub kind_new_fg: Color,
    pub kind_removed_fg: Color,
    pub kind_changed_fg: Color,
    pub kind_group_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    pub border_fg: Color,

    // Semantic colors, not configurable
    pub error_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

impl ThemeColors {
    /// Foreground for a signed delta: positive, negative or neutral.
    pub fn delta_fg(&self, delta: i64) -> Color {
        match delta.signum() {
            1 => self.positive_fg,
            -1 => self.negative_fg,
            _ => self.table_fg,
        }
    }

    pub fn kind_fg(&self, kind: DiffKind) -> Color {
        match kind {
            DiffKind::New => self.kind_new_fg,
            DiffKind::Removed => self.kind_removed_fg,
            DiffKind::Changed => self.kind_changed_fg,
            DiffKind::FileGroup => self.kind_group_fg,
        }
    }
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    let text = Color::Rgb(205, 214, 244); // #cdd6f4
    let red = Color::Rgb(243, 139, 168); // #f38ba8
    let green = Color::Rgb(166, 227, 161); // #a6e3a1
    let yellow = Color::Rgb(249, 226, 175); // #f9e2af
    let blue = Color::Rgb(137, 180, 250); // #89b4fa
    let mauve = Color::Rgb(203, 166, 247); // #cba6f7
    ThemeColors {
        table_fg: text,
        table_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        table_selected_fg: text,
        header_fg: blue,
        header_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        folder_fg: blue,

        positive_fg: green,
        negative_fg: red,

        kind_new_fg: green,
        kind_removed_fg: red,
        kind_changed_fg: yellow,
        kind_group_fg: mauve,

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: text,

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        error_fg: red,
        success_fg: green,
        accent_fg: mauve,
        dim_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    let text = Color::Rgb(76, 79, 105); // #4c4f69
    let red = Color::Rgb(210, 15, 57); // #d20f39
    let green = Color::Rgb(64, 160, 43); // #40a02b
    let yellow = Color::Rgb(223, 142, 29); // #df8e1d
    let blue = Color::Rgb(30, 102, 245); // #1e66f5
    let mauve = Color::Rgb(136, 57, 239); // #8839ef
    ThemeColors {
        table_fg: text,
        table_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da
        table_selected_fg: text,
        header_fg: blue,
        header_bg: Color::Rgb(230, 233, 239), // #e6e9ef
        folder_fg: blue,

        positive_fg: green,
        negative_fg: red,

        kind_new_fg: green,
        kind_removed_fg: red,
        kind_changed_fg: yellow,
        kind_group_fg: mauve,

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5
        status_fg: text,

        border_fg: Color::Rgb(172, 176, 190), // #acb0be

        error_fg: red,
        success_fg: green,
        accent_fg: mauve,
        dim_fg: Color::Rgb(156, 160, 176), // #9ca0b0
    }
}

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default) and unknown names: dark palette
/// - `"light"`: light palette
/// - `"custom"`: dark palette with custom hex values applied
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex color overrides; malformed values keep the current color.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides: [(&Option<String>, &mut Color); 15] = [
        (&custom.table_fg, &mut theme.table_fg),
        (&custom.table_selected_bg, &mut theme.table_selected_bg),
        (&custom.table_selected_fg, &mut theme.table_selected_fg),
        (&custom.header_fg, &mut theme.header_fg),
        (&custom.header_bg, &mut theme.header_bg),
        (&custom.folder_fg, &mut theme.folder_fg),
        (&custom.positive_fg, &mut theme.positive_fg),
        (&custom.negative_fg, &mut theme.negative_fg),
        (&custom.kind_new_fg, &mut theme.kind_new_fg),
        (&custom.kind_removed_fg, &mut theme.kind_removed_fg),
        (&custom.kind_changed_fg, &mut theme.kind_changed_fg),
        (&custom.kind_group_fg, &mut theme.kind_group_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
        (&custom.border_fg, &mut theme.border_fg),
    ];
    for (value, slot) in overrides {
        if let Some(color) = value.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}
