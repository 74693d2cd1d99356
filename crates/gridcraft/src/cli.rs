//! Command-line interface for gridcraft.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gridcraft::{BorderStyle, DEFAULT_PREFS_FILE, FontFamily, Theme, tui::DEFAULT_SAVE_FILE};

/// Gridcraft - build, play and export custom tic-tac-toe games
#[derive(Parser, Debug)]
#[command(name = "gridcraft")]
#[command(about = "Build, play and export custom tic-tac-toe games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Preference file (created on first save)
    #[arg(long, global = true, default_value = DEFAULT_PREFS_FILE)]
    pub prefs: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Change preferences from flags
    Configure(ConfigureArgs),

    /// Print the current preferences and statistics
    Show,

    /// Open the settings wizard
    Wizard {
        /// Save file used by the preview's save and load keys
        #[arg(long, default_value = DEFAULT_SAVE_FILE)]
        save_file: PathBuf,
    },

    /// Play the configured game in the terminal
    Preview {
        /// Save file used by the save and load keys
        #[arg(long, default_value = DEFAULT_SAVE_FILE)]
        save_file: PathBuf,
    },

    /// Write the standalone HTML game to a directory
    Export {
        /// Output directory (created if missing)
        #[arg(short, long, default_value = "gridcraft-export")]
        out: PathBuf,
    },

    /// Clear lifetime statistics and achievements
    ResetStats {
        /// Also zero the scoreboard
        #[arg(long)]
        scores: bool,
    },

    /// Print JSON schemas for the preference file and the save format
    Schema,
}

/// Flags accepted by `configure`; omitted flags keep their value.
#[derive(Args, Debug, Default)]
pub struct ConfigureArgs {
    /// Game title
    #[arg(long)]
    pub title: Option<String>,

    /// Board side length (3, 4 or 5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(3..=5))]
    pub size: Option<u8>,

    /// Marks in a row needed to win
    #[arg(long)]
    pub condition: Option<usize>,

    /// Player 1 name
    #[arg(long)]
    pub player1_name: Option<String>,

    /// Player 1 symbol
    #[arg(long)]
    pub player1_symbol: Option<String>,

    /// Player 2 name
    #[arg(long)]
    pub player2_name: Option<String>,

    /// Player 2 symbol
    #[arg(long)]
    pub player2_symbol: Option<String>,

    /// Page background color (#rrggbb)
    #[arg(long)]
    pub background_color: Option<String>,

    /// Cell color (#rrggbb)
    #[arg(long)]
    pub cell_color: Option<String>,

    /// Page background image URL; empty string clears it
    #[arg(long)]
    pub background_image: Option<String>,

    /// Cell image URL; empty string clears it
    #[arg(long)]
    pub cell_image: Option<String>,

    /// Color theme
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Font family
    #[arg(long)]
    pub font: Option<FontFamily>,

    /// Cell border style
    #[arg(long)]
    pub border: Option<BorderStyle>,

    /// Enable the move timer
    #[arg(long)]
    pub timer: Option<bool>,

    /// Seconds per move
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: Option<u32>,

    /// Enable sounds
    #[arg(long)]
    pub sound: Option<bool>,

    /// Enable win animations
    #[arg(long)]
    pub animations: Option<bool>,
}
