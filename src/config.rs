//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--sort`, `--ascending`, `--no-mouse`, `--theme`, `--log-file`)
//! 2. Explicit `--config` file
//! 3. `$SDIFF_CONFIG` environment variable (path to config file)
//! 4. Project-local `.sdiff.toml` in the current working directory
//! 5. Global `<config_dir>/snapshot-diff-tui/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diff::grouper::DEFAULT_GROUP_LABEL;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SDIFF_CONFIG";
/// Directory name under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "snapshot-diff-tui";

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Tree-table settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Initial sort column: "path", "kind", "size", "alloc", "files", "folders".
    pub sort_by: Option<String>,
    /// Initial sort direction.
    pub ascending: Option<bool>,
    /// Use nerd font icons (false = plain markers).
    pub use_icons: Option<bool>,
    /// Label of synthesized file groups; `{n}` is replaced by the member count.
    pub group_label: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub table_fg: Option<String>,
    pub table_selected_bg: Option<String>,
    pub table_selected_fg: Option<String>,
    pub header_fg: Option<String>,
    pub header_bg: Option<String>,
    pub folder_fg: Option<String>,
    pub positive_fg: Option<String>,
    pub negative_fg: Option<String>,
    pub kind_new_fg: Option<String>,
    pub kind_removed_fg: Option<String>,
    pub kind_changed_fg: Option<String>,
    pub kind_group_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path; the terminal is owned by the UI.
    pub file: Option<String>,
    /// Default level when `RUST_LOG` is unset.
    pub level: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config file paths in priority order, excluding `--config`.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".sdiff.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR_NAME).join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: other.general.mouse.or(self.general.mouse),
            },
            tree: TreeConfig {
                sort_by: other.tree.sort_by.clone().or(self.tree.sort_by),
                ascending: other.tree.ascending.or(self.tree.ascending),
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
                group_label: other.tree.group_label.clone().or(self.tree.group_label),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Sort column name.
    pub fn sort_by(&self) -> &str {
        self.tree.sort_by.as_deref().unwrap_or("size")
    }

    pub fn ascending(&self) -> bool {
        self.tree.ascending.unwrap_or(false)
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(false)
    }

    pub fn group_label(&self) -> &str {
        self.tree.group_label.as_deref().unwrap_or(DEFAULT_GROUP_LABEL)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    /// Log file, if one was configured.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_ref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or("info")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::diff::sorter::SortField;
    use crate::error::ConfigurationError;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.sort_by(), "size");
        assert!(!cfg.ascending());
        assert!(!cfg.use_icons());
        assert_eq!(cfg.group_label(), "{n} file diff nodes");
        assert_eq!(cfg.theme_scheme(), "dark");
        assert_eq!(cfg.log_file(), None);
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
mouse = false

[tree]
sort_by = "path"
ascending = true
use_icons = true
group_label = "{n} files"

[theme]
scheme = "light"

[log]
file = "/tmp/sdiff.log"
level = "debug"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(!cfg.mouse_enabled());
        assert_eq!(cfg.sort_by(), "path");
        assert!(cfg.ascending());
        assert!(cfg.use_icons());
        assert_eq!(cfg.group_label(), "{n} files");
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/sdiff.log")));
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.sort_by().parse::<SortField>(), Ok(SortField::Path));
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[tree]
ascending = true
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.ascending());
        assert_eq!(cfg.sort_by(), "size");
        assert!(cfg.mouse_enabled());
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_unknown_sort_field_is_error() {
        let cfg: AppConfig = toml::from_str("[tree]\nsort_by = \"colour\"\n").expect("parse");
        assert_eq!(
            cfg.sort_by().parse::<SortField>(),
            Err(ConfigurationError::UnknownSortField("colour".to_string()))
        );
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            tree: TreeConfig {
                sort_by: Some("kind".into()),
                ascending: Some(true),
                ..Default::default()
            },
            log: LogConfig {
                level: Some("warn".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let over = AppConfig {
            tree: TreeConfig {
                sort_by: Some("alloc".into()),
                // ascending not set, base kept
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.sort_by(), "alloc");
        assert!(merged.ascending());
        assert_eq!(merged.log_level(), "warn");
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            general: GeneralConfig { mouse: Some(false) },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert!(!merged.mouse_enabled());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[tree]
sort_by = "folders"

[log]
level = "trace"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.sort_by(), "folders");
        assert_eq!(cfg.log_level(), "trace");
        assert!(cfg.mouse_enabled());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
mouse = false

[tree]
sort_by = "kind"
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            tree: TreeConfig {
                sort_by: Some("path".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.sort_by(), "path");
        assert!(!cfg.mouse_enabled());
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
positive_fg = "#00ff00"
negative_fg = "#ff0000"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme_scheme(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.positive_fg.as_deref(), Some("#00ff00"));
        assert_eq!(custom.negative_fg.as_deref(), Some("#ff0000"));
        assert!(custom.header_bg.is_none());
    }
}
