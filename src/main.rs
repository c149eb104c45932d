mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod prompt;
mod search;
mod theme;
mod tui;
mod ui;
mod viewer;
mod worker;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use crate::app::{App, Settings};
use crate::config::{AppConfig, GeneralConfig, LogConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::theme::ThemeColors;
use crate::tui::{install_panic_hook, Tui};

/// A single-pane terminal file browser with a text/hex viewer.
#[derive(Parser, Debug)]
#[command(name = "tfb", version, about)]
struct Cli {
    /// Directory to open (defaults to the current directory)
    path: Option<PathBuf>,

    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Color scheme
    #[arg(long, value_parser = ["dark", "light"])]
    theme: Option<String>,

    /// Delete without asking for confirmation
    #[arg(long)]
    no_confirm_delete: bool,
}

impl Cli {
    /// CLI flags as a partial config layered on top of the files.
    fn to_overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: None,
                confirm_delete: self.no_confirm_delete.then_some(false),
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                level: None,
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
            },
            ..Default::default()
        }
    }
}

/// Send `tracing` output to the configured log file. The terminal is in raw
/// mode, so nothing is ever logged to stdout or stderr; if the file cannot be
/// opened logging stays off.
fn init_logging(config: &AppConfig) {
    let Some(path) = config.log_file() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(_) => return,
    };
    let level = tracing::Level::from_str(config.log_level()).unwrap_or(tracing::Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init();
}

/// How long shutdown waits for size scans still walking a tree.
const SCAN_SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.to_overrides()));
    init_logging(&config);

    let requested = cli
        .path
        .clone()
        .or_else(|| config.general.default_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = requested.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;

    // List before touching the terminal so a bad start directory exits cleanly.
    let mut app = App::new(&path, Settings::from(&config))?;
    let theme = theme::resolve_theme(config.theme_scheme());
    info!(path = %path.display(), "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    install_panic_hook();
    let mut tui = Tui::new()?;
    let result = runtime.block_on(run(&mut tui, &mut app, &theme));
    tui.restore()?;

    match &app.busy {
        Some(label) => {
            // Dropping the runtime joins the blocking pool, so the copy or
            // move finishes before the process exits.
            info!(task = %label, "waiting for background task before exit");
            drop(runtime);
        }
        None => runtime.shutdown_timeout(SCAN_SHUTDOWN_GRACE),
    }
    if let Err(ref e) = result {
        warn!(error = %e, "exiting with error");
    }
    result
}

async fn run(tui: &mut Tui, app: &mut App, theme: &ThemeColors) -> error::Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    let event_tx = events.sender();

    loop {
        for task in app.take_tasks() {
            worker::spawn(task, event_tx.clone());
        }

        tui.terminal_mut().draw(|frame| {
            ui::render(app, theme, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize => {}
            Event::TaskComplete(outcome) => app.handle_task_complete(outcome),
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
