//! Gridcraft - build, preview and export custom tic-tac-toe games
//!
//! # Architecture
//!
//! - **Preferences**: the persisted look, players, rules and lifetime stats
//! - **Store**: TOML file with an explicit load/save lifecycle
//! - **Export**: a standalone HTML page whose script reuses the engine's line table
//! - **TUI**: settings wizard and live preview driven by the engine's match controller
//!
//! # Example
//!
//! ```no_run
//! use gridcraft::{ExportBundle, PreferenceStore};
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = PreferenceStore::load("gridcraft.toml")?;
//! let bundle = ExportBundle::build(store.preferences())?;
//! bundle.write_to_dir("my-game")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod error;
mod export;
mod preferences;
mod store;
pub mod tui;

// Crate-level exports - Errors
pub use error::{ExportError, StoreError};

// Crate-level exports - Preferences
pub use preferences::{
    BOARD_SIZES, BorderStyle, FontFamily, HexColor, LifetimeStats, PlayerPrefs, Preferences,
    TIMER_DURATIONS, Theme, cycle, cycle_value,
};
pub use store::{DEFAULT_PREFS_FILE, PreferenceStore};

// Crate-level exports - Export
pub use export::{
    BundleEntry, CONFIG_FILE, ExportBundle, ExportConfig, ExportPlayer, HTML_FILE, README_FILE,
    escape_html, render_html,
};
