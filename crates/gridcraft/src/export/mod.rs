//! Static game export: one HTML page plus its configuration record.

mod bundle;
mod html;

pub use bundle::{BundleEntry, CONFIG_FILE, ExportBundle, HTML_FILE, README_FILE};
pub use html::{ExportConfig, ExportPlayer, escape_html, render_html};
