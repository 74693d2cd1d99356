//! Gridcraft - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, ConfigureArgs};
use gridcraft::tui::{StartScreen, run_tui};
use gridcraft::{ExportBundle, HexColor, PreferenceStore, Preferences};
use gridcraft_engine::{SavedMatch, Seat};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let prefs = cli.prefs;

    match cli.command {
        Command::Wizard { save_file } => {
            let store = PreferenceStore::load(&prefs)?;
            run_tui(store, StartScreen::Settings, save_file).await?;
            Ok(())
        }
        Command::Preview { save_file } => {
            let store = PreferenceStore::load(&prefs)?;
            run_tui(store, StartScreen::Preview, save_file).await?;
            Ok(())
        }
        Command::Configure(args) => with_store(&prefs, |store| configure(store, args)),
        Command::Show => with_store(&prefs, |store| show(store)),
        Command::Export { out } => with_store(&prefs, |store| export(store, out)),
        Command::ResetStats { scores } => with_store(&prefs, |store| reset_stats(store, scores)),
        Command::Schema => {
            init_stderr_logging();
            schema()
        }
    }
}

/// Runs a non-interactive command against the loaded preference store.
fn with_store(
    path: &Path,
    run: impl FnOnce(&mut PreferenceStore) -> Result<()>,
) -> Result<()> {
    init_stderr_logging();
    let mut store = PreferenceStore::load(path)?;
    run(&mut store)
}

/// Logs to stderr so command output stays clean on stdout.
fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gridcraft=debug")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Applies the given flags and saves.
#[instrument(skip(store, args))]
fn configure(store: &mut PreferenceStore, args: ConfigureArgs) -> Result<()> {
    let background = args
        .background_color
        .as_deref()
        .map(HexColor::parse)
        .transpose()?;
    let cell = args.cell_color.as_deref().map(HexColor::parse).transpose()?;

    store.update(|prefs| {
        if let Some(title) = args.title {
            prefs.set_game_title(title);
        }
        if let Some(size) = args.size {
            prefs.set_board_size(usize::from(size));
            let condition = prefs.effective_condition();
            prefs.set_win_condition(condition);
        }
        if let Some(condition) = args.condition {
            prefs.set_win_condition(condition);
        }
        apply_player(prefs, Seat::First, args.player1_name, args.player1_symbol);
        apply_player(prefs, Seat::Second, args.player2_name, args.player2_symbol);
        if let Some(color) = background {
            prefs.set_background_color(color);
        }
        if let Some(color) = cell {
            prefs.set_cell_color(color);
        }
        if let Some(image) = args.background_image {
            prefs.set_background_image(image);
        }
        if let Some(image) = args.cell_image {
            prefs.set_cell_image(image);
        }
        if let Some(theme) = args.theme {
            prefs.set_theme(theme);
        }
        if let Some(font) = args.font {
            prefs.set_font_family(font);
        }
        if let Some(border) = args.border {
            prefs.set_border_style(border);
        }
        if let Some(enabled) = args.timer {
            prefs.set_timer_enabled(enabled);
        }
        if let Some(seconds) = args.duration {
            prefs.set_timer_duration(seconds);
        }
        if let Some(enabled) = args.sound {
            prefs.set_sound_enabled(enabled);
        }
        if let Some(enabled) = args.animations {
            prefs.set_animations_enabled(enabled);
        }
    })?;

    info!(path = %store.path().display(), "Preferences updated");
    println!("Saved {}", store.path().display());
    Ok(())
}

fn apply_player(prefs: &mut Preferences, seat: Seat, name: Option<String>, symbol: Option<String>) {
    if name.is_none() && symbol.is_none() {
        return;
    }
    let current = prefs.player(seat).clone();
    let name = name.unwrap_or_else(|| current.name().clone());
    let symbol = symbol.unwrap_or_else(|| current.symbol().clone());
    prefs.set_player(seat, &name, &symbol);
}

/// Prints the preference file as TOML.
fn show(store: &PreferenceStore) -> Result<()> {
    let text = toml::to_string_pretty(store.preferences()).context("Rendering preferences")?;
    println!("# {}", store.path().display());
    println!("{text}");
    Ok(())
}

/// Writes the export bundle.
#[instrument(skip(store))]
fn export(store: &PreferenceStore, out: std::path::PathBuf) -> Result<()> {
    let bundle = ExportBundle::build(store.preferences())?;
    let written = bundle.write_to_dir(&out)?;
    for path in &written {
        println!("{}", path.display());
    }
    info!(files = written.len(), out = %out.display(), "Export complete");
    Ok(())
}

/// Clears statistics, and scores when asked.
#[instrument(skip(store))]
fn reset_stats(store: &mut PreferenceStore, scores: bool) -> Result<()> {
    store.update(|prefs| {
        prefs.reset_stats();
        if scores {
            prefs.reset_scores();
        }
    })?;
    println!("Statistics reset");
    Ok(())
}

/// Prints the JSON schemas of the preference file and the save format.
fn schema() -> Result<()> {
    let schemas = serde_json::json!({
        "preferences": schemars::schema_for!(Preferences),
        "savedMatch": schemars::schema_for!(SavedMatch),
    });
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
