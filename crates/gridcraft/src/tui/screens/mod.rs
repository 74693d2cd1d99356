//! Individual screen implementations.

mod preview;
mod settings;

pub use preview::{DEFAULT_SAVE_FILE, PreviewScreen};
pub use settings::SettingsScreen;

use ratatui::style::Color;

use crate::{HexColor, Preferences};

/// Accent color from the light end of the theme gradient.
fn accent(preferences: &Preferences) -> Color {
    to_color(preferences.theme().gradient()[2])
}

fn to_color(hex: &str) -> Color {
    match HexColor::parse(hex) {
        Ok(color) => {
            let (r, g, b) = color.rgb();
            Color::Rgb(r, g, b)
        }
        Err(_) => Color::Cyan,
    }
}
