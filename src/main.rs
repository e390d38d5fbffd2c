mod app;
mod components;
mod config;
mod diff;
mod error;
mod event;
mod handler;
mod logging;
mod opener;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig, ThemeConfig, TreeConfig};
use crate::diff::fetcher::{JsonDiffFetcher, NodeFetcher};
use crate::diff::sorter::SortState;
use crate::diff::store::NodeStore;
use crate::diff::tree::DiffTreeState;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse the differences between two filesystem snapshots.
#[derive(Parser, Debug)]
#[command(name = "sdiff", version, about)]
struct Cli {
    /// Diff export produced by the snapshot diff engine (JSON)
    diff_file: PathBuf,

    /// Explicit config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Initial sort column: path, kind, size, alloc, files, folders
    #[arg(long, value_name = "FIELD")]
    sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long)]
    ascending: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Color scheme: dark, light, custom
    #[arg(long, value_name = "SCHEME")]
    theme: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Partial config holding only the flags that were given.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: self.no_mouse.then_some(false),
            },
            tree: TreeConfig {
                sort_by: self.sort.clone(),
                ascending: self.ascending.then_some(true),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                level: None,
            },
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let log_path = config.log_file().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init_global(&log_path, config.log_level()) {
        eprintln!("Warning: logging disabled ({}): {}", log_path.display(), e);
    }
    tracing::info!(
        diff_file = %cli.diff_file.display(),
        sort = config.sort_by(),
        ascending = config.ascending(),
        theme = config.theme_scheme(),
        "starting"
    );

    if !cli.diff_file.is_file() {
        return Err(error::AppError::InvalidPath(format!(
            "{} does not exist",
            cli.diff_file.display()
        )));
    }
    let fetcher = JsonDiffFetcher::open(&cli.diff_file).await?;
    let title = fetcher.title();

    let store = NodeStore::new(fetcher).with_group_label(config.group_label());
    let mut tree_state = DiffTreeState::new(store, SortState::default());
    tree_state.set_sort_by_name(config.sort_by(), config.ascending())?;

    let mut app = App::new(tree_state, theme::resolve_theme(&config.theme))
        .with_icons(config.use_icons())
        .with_title(title);

    install_panic_hook();
    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    let result = run(&mut app, &mut tui, &mut events).await;
    tui.restore()?;
    result
}

/// Main loop: re-render when dirty, draw, then apply one event.
async fn run<F: NodeFetcher>(
    app: &mut App<F>,
    tui: &mut Tui,
    events: &mut EventHandler,
) -> error::Result<()> {
    loop {
        app.refresh().await;
        tui.draw(|frame| ui::render(app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key).await,
            Event::Mouse(mouse) => handler::handle_mouse_event(app, mouse),
            Event::Tick => app.clear_expired_status(),
            // the next iteration redraws at the new size
            Event::Resize => {}
        }

        if app.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }
    }
}
