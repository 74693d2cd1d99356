//! Terminal UI: settings wizard and live preview.

mod app;
mod effects;
mod screen;
mod screens;
mod ticker;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Handle;
use tracing::{error, info, instrument};

pub use app::{App, StartScreen};
pub use effects::{Banner, FLASH_DURATION, NOTICE_DURATION, TerminalEffects};
pub use screen::{AppEvent, Screen, ScreenTransition};
pub use screens::{DEFAULT_SAVE_FILE, PreviewScreen, SettingsScreen};
pub use ticker::IntervalTicker;

use crate::PreferenceStore;

/// Log file for TUI sessions.
pub const TUI_LOG_FILE: &str = "gridcraft_tui.log";

/// Runs the TUI until the user quits and returns the final store.
///
/// Logs go to [`TUI_LOG_FILE`] so they do not corrupt the screen.
///
/// # Errors
///
/// Fails outside a tokio runtime or on terminal I/O errors.
#[instrument(skip(store))]
pub async fn run_tui(
    store: PreferenceStore,
    start: StartScreen,
    save_path: PathBuf,
) -> Result<PreferenceStore> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(TUI_LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,gridcraft=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(%start, prefs = %store.path().display(), "Starting gridcraft TUI");

    let runtime = Handle::try_current()
        .map_err(|e| anyhow::anyhow!("TUI needs a tokio runtime: {e}"))?;
    let mut app = App::new(store, save_path, runtime);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal, start).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res.map(|()| app.into_store())
}
