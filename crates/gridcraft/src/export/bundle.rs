//! The set of files that make up an exported game.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::html::{ExportConfig, render_html};
use crate::{ExportError, Preferences};

/// Name of the playable page.
pub const HTML_FILE: &str = "tic-tac-toe-game.html";
/// Name of the configuration record.
pub const CONFIG_FILE: &str = "game-config.json";
/// Name of the instructions file.
pub const README_FILE: &str = "README.txt";

/// One named file in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct BundleEntry {
    name: String,
    contents: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    generator: String,
    generated_at: DateTime<Utc>,
    game: &'a ExportConfig,
}

/// Page, configuration record and instructions for one export.
#[derive(Debug, Clone, Getters)]
pub struct ExportBundle {
    entries: Vec<BundleEntry>,
    generated_at: DateTime<Utc>,
}

impl ExportBundle {
    /// Renders every file for the given preferences.
    ///
    /// # Errors
    ///
    /// Fails when the preferences do not describe a playable match.
    #[instrument(skip(prefs))]
    pub fn build(prefs: &Preferences) -> Result<Self, ExportError> {
        Self::build_at(prefs, Utc::now())
    }

    /// As [`ExportBundle::build`], stamped with `generated_at`.
    ///
    /// # Errors
    ///
    /// Fails when the preferences do not describe a playable match.
    #[instrument(skip(prefs))]
    pub fn build_at(prefs: &Preferences, generated_at: DateTime<Utc>) -> Result<Self, ExportError> {
        let html = render_html(prefs)?;
        let config = ExportConfig::from_preferences(prefs)?;
        let manifest = Manifest {
            generator: format!("gridcraft {}", env!("CARGO_PKG_VERSION")),
            generated_at,
            game: &config,
        };
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ExportError::new(format!("Failed to serialize config: {}", e)))?;

        let entries = vec![
            BundleEntry::new(HTML_FILE.to_string(), html),
            BundleEntry::new(CONFIG_FILE.to_string(), json),
            BundleEntry::new(README_FILE.to_string(), readme(&config, generated_at)),
        ];
        debug!(entries = entries.len(), "Bundle built");
        Ok(Self {
            entries,
            generated_at,
        })
    }

    /// Looks up an entry by file name.
    pub fn entry(&self, name: &str) -> Option<&BundleEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Writes every entry into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails on the first directory or file write error.
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| ExportError::new(format!("Failed to create {}: {}", dir.display(), e)))?;

        let mut written = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let path = dir.join(&entry.name);
            std::fs::write(&path, &entry.contents).map_err(|e| {
                ExportError::new(format!("Failed to write {}: {}", path.display(), e))
            })?;
            debug!(path = %path.display(), bytes = entry.contents.len(), "Wrote bundle entry");
            written.push(path);
        }
        info!(files = written.len(), "Export written");
        Ok(written)
    }
}

fn readme(config: &ExportConfig, generated_at: DateTime<Utc>) -> String {
    let timer = if config.timer_enabled {
        format!("{} seconds per move", config.timer_duration)
    } else {
        "off".to_string()
    };
    format!(
        "{title}\n\
         {underline}\n\
         \n\
         Open {html} in any web browser to play. No server or network is needed.\n\
         \n\
         Board: {size}x{size}, {condition} in a row to win\n\
         Players: {p1} ({s1}) vs {p2} ({s2})\n\
         Timer: {timer}\n\
         \n\
         Saved games live in the browser's localStorage under \"{key}\".\n\
         {config_file} records the settings this page was generated from.\n\
         \n\
         Generated {stamp} by gridcraft.\n",
        title = config.title,
        underline = "=".repeat(config.title.chars().count().max(1)),
        html = HTML_FILE,
        size = config.size,
        condition = config.win_condition,
        p1 = config.players[0].name,
        s1 = config.players[0].symbol,
        p2 = config.players[1].name,
        s2 = config.players[1].symbol,
        key = config.storage_key,
        config_file = CONFIG_FILE,
        stamp = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
