//! Renders the self-contained HTML game page.

use gridcraft_engine::{
    Line, Messages, NEXT_PLAYER, STORAGE_KEY, STREAK_TARGET, candidate_lines, fill,
    lightning_threshold,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{BorderStyle, ExportError, FontFamily, Preferences, Theme};

const GAME_CSS: &str = include_str!("../../assets/game.css");
const GAME_JS: &str = include_str!("../../assets/game.js");

/// One player as the page sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPlayer {
    /// Display name.
    pub name: String,
    /// Mark drawn in cells.
    pub symbol: String,
}

/// Everything the page script reads, embedded as JSON.
///
/// `lines` is the evaluator's own line table, so the page checks exactly
/// the lines the preview checks, in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Board side length.
    pub size: usize,
    /// Run length needed to win.
    pub win_condition: usize,
    /// Player 1 then player 2.
    pub players: [ExportPlayer; 2],
    /// Play sounds.
    pub sound_enabled: bool,
    /// Confetti and hover scaling.
    pub animations_enabled: bool,
    /// Per-move countdown.
    pub timer_enabled: bool,
    /// Countdown length in seconds.
    pub timer_duration: u32,
    /// Page title.
    pub title: String,
    /// Builder theme.
    pub theme: Theme,
    /// Page font.
    pub font_family: FontFamily,
    /// Cell border style.
    pub border_style: BorderStyle,
    /// Winnable lines in evaluation order.
    pub lines: Vec<Line>,
    /// Consecutive wins for the streak achievement.
    pub streak_target: u32,
    /// Most moves that still count as a lightning victory.
    pub lightning_threshold: usize,
    /// `localStorage` key for saves.
    pub storage_key: &'static str,
    /// Status and achievement templates shared with the engine.
    pub messages: Messages,
}

impl ExportConfig {
    /// Builds the page configuration from validated preferences.
    ///
    /// # Errors
    ///
    /// Fails when the preferences do not describe a playable match.
    #[instrument(skip(prefs))]
    pub fn from_preferences(prefs: &Preferences) -> Result<Self, ExportError> {
        let config = prefs
            .match_config()
            .map_err(|e| ExportError::new(format!("Cannot export: {}", e.message)))?;
        let size = *config.size();
        let condition = *config.condition();
        let lines = candidate_lines(size, condition);
        debug!(size, condition, lines = lines.len(), "Embedding line table");

        let player = |seat| {
            let profile = config.player(seat);
            ExportPlayer {
                name: profile.name().clone(),
                symbol: profile.symbol().clone(),
            }
        };
        Ok(Self {
            size,
            win_condition: condition,
            players: [
                player(gridcraft_engine::Seat::First),
                player(gridcraft_engine::Seat::Second),
            ],
            sound_enabled: *config.sound(),
            animations_enabled: *config.animations(),
            timer_enabled: *config.timer().enabled(),
            timer_duration: *config.timer().seconds(),
            title: page_title(prefs),
            theme: *prefs.theme(),
            font_family: *prefs.font_family(),
            border_style: *prefs.border_style(),
            lines,
            streak_target: STREAK_TARGET,
            lightning_threshold: lightning_threshold(size),
            storage_key: STORAGE_KEY,
            messages: Messages::templates(),
        })
    }
}

fn page_title(prefs: &Preferences) -> String {
    let title = prefs.game_title().trim();
    if title.is_empty() {
        "Tic Tac Toe".to_string()
    } else {
        title.to_string()
    }
}

/// Escapes text for HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON that is safe inside a `<script>` element.
///
/// Every `<` becomes `\u003c`, which JSON parsers read back unchanged.
fn script_json(config: &ExportConfig) -> Result<String, ExportError> {
    let json = serde_json::to_string(config)
        .map_err(|e| ExportError::new(format!("Failed to serialize page config: {}", e)))?;
    Ok(json.replace('<', "\\u003c"))
}

/// CSS `url("...")` for an image, or `none`.
fn css_image(source: &str) -> String {
    let source = source.trim();
    if source.is_empty() {
        return "none".to_string();
    }
    let cleaned: String = source
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('<', "%3C")
        .replace('>', "%3E");
    format!("url(\"{cleaned}\")")
}

fn style_variables(prefs: &Preferences, size: usize) -> String {
    let scale = if *prefs.animations_enabled() { "1.05" } else { "1" };
    format!(
        ":root {{\n  --font: {font};\n  --bg-color: {bg};\n  --bg-image: {bg_image};\n  --cell-color: {cell};\n  --cell-image: {cell_image};\n  --border-style: {border};\n  --cols: {size};\n  --hover-scale: {scale};\n}}\n",
        font = prefs.font_family().css_stack(),
        bg = prefs.background_color(),
        bg_image = css_image(prefs.background_image()),
        cell = prefs.cell_color(),
        cell_image = css_image(prefs.cell_image()),
        border = prefs.border_style().as_ref(),
    )
}

/// Renders the complete, standalone game page.
///
/// # Errors
///
/// Fails when the preferences do not describe a playable match.
#[instrument(skip(prefs), fields(size = prefs.board_size(), title = %prefs.game_title()))]
pub fn render_html(prefs: &Preferences) -> Result<String, ExportError> {
    let config = ExportConfig::from_preferences(prefs)?;
    let title = escape_html(&config.title);
    let name1 = escape_html(&config.players[0].name);
    let opening_status = escape_html(&fill(NEXT_PLAYER, "name", &config.players[0].name));
    let name2 = escape_html(&config.players[1].name);

    let timer_score = if config.timer_enabled {
        format!(
            "    <div class=\"score-item\">\n      <div class=\"score-name\">Timer</div>\n      <div class=\"score-value\" id=\"timer\">{}s</div>\n    </div>\n",
            config.timer_duration
        )
    } else {
        String::new()
    };
    let timer_button = if config.timer_enabled {
        "    <button id=\"timer-button\" disabled>Pause Timer</button>\n"
    } else {
        ""
    };
    let cells: String = (0..config.size * config.size)
        .map(|i| format!("    <div class=\"cell\" data-index=\"{i}\"></div>\n"))
        .collect();

    let mut page = String::with_capacity(GAME_CSS.len() + GAME_JS.len() + 4096);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    page.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    page.push_str(&format!("<title>{title}</title>\n<style>\n"));
    page.push_str(&style_variables(prefs, config.size));
    page.push_str(GAME_CSS);
    page.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    page.push_str(&format!(
        "  <div class=\"game-title-edit\">\n    <input type=\"text\" id=\"game-title-input\" value=\"{title}\" placeholder=\"Game Title\">\n    <button id=\"update-title-button\">Update Title</button>\n  </div>\n  <h1 id=\"game-title\">{title}</h1>\n"
    ));
    page.push_str(&format!(
        "  <div class=\"score-board\">\n    <div class=\"score-item\">\n      <div class=\"score-name\">{name1}</div>\n      <div class=\"score-value\" id=\"player1-score\">0</div>\n    </div>\n{timer_score}    <div class=\"score-item\">\n      <div class=\"score-name\">{name2}</div>\n      <div class=\"score-value\" id=\"player2-score\">0</div>\n    </div>\n  </div>\n"
    ));
    page.push_str(&format!(
        "  <div class=\"game-info\">\n    <div class=\"info-pill\">{size}x{size} Board</div>\n    <div class=\"info-pill\">{condition} in a row</div>\n    <div class=\"info-pill\" id=\"move-counter\">Move: 0</div>\n  </div>\n",
        size = config.size,
        condition = config.win_condition,
    ));
    page.push_str(&format!(
        "  <div class=\"status\" id=\"status\">{opening_status}</div>\n  <div class=\"board\" id=\"board\">\n{cells}  </div>\n"
    ));
    page.push_str(&format!(
        "  <div class=\"controls\">\n    <button id=\"reset-button\">Reset Game</button>\n    <button id=\"undo-button\" disabled>Undo Move</button>\n{timer_button}    <button id=\"save-game-button\">Save Game</button>\n    <button id=\"load-game-button\">Load Game</button>\n  </div>\n"
    ));
    page.push_str(
        "  <div class=\"history\">\n    <div class=\"history-title\">Game History:</div>\n    <div class=\"history-buttons\" id=\"history-buttons\"></div>\n  </div>\n",
    );
    page.push_str(
        "  <div class=\"achievements\" id=\"achievements\">\n    <div class=\"history-title\">Achievements:</div>\n    <div id=\"achievements-list\">No achievements yet</div>\n  </div>\n",
    );
    page.push_str("  <div class=\"footer\">Created with gridcraft</div>\n</div>\n");
    page.push_str("<div class=\"notification\" id=\"notification\"></div>\n");
    page.push_str(&format!(
        "<script type=\"application/json\" id=\"game-config\">{}</script>\n",
        script_json(&config)?
    ));
    page.push_str("<script>\n");
    page.push_str(GAME_JS);
    page.push_str("</script>\n</body>\n</html>\n");

    debug!(bytes = page.len(), "Rendered game page");
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcraft_engine::Seat;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_css_image() {
        assert_eq!(css_image("  "), "none");
        assert_eq!(css_image("bg.png"), "url(\"bg.png\")");
        assert_eq!(
            css_image("a\"b</style>"),
            "url(\"a\\\"b%3C/style%3E\")"
        );
    }

    #[test]
    fn test_script_json_cannot_close_script() {
        let mut prefs = Preferences::default();
        prefs.set_player(Seat::First, "</script><script>alert(1)", "X");
        let config = ExportConfig::from_preferences(&prefs).expect("valid prefs");
        let json = script_json(&config).expect("serializes");
        assert!(!json.contains('<'));
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("still json");
        assert_eq!(
            parsed["players"][0]["name"],
            "</script><script>alert(1)"
        );
    }

    #[test]
    fn test_config_clamps_condition_and_embeds_lines() {
        let mut prefs = Preferences::default();
        prefs.set_board_size(4).set_win_condition(9);
        let config = ExportConfig::from_preferences(&prefs).expect("valid prefs");
        assert_eq!(config.win_condition, 4);
        assert_eq!(config.lines, candidate_lines(4, 4));
        assert_eq!(config.lightning_threshold, 5);
    }
}
