//! Settings screen: the wizard that edits every preference.

use crossterm::event::{KeyCode, KeyEvent};
use gridcraft_engine::Seat;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use super::accent;
use crate::tui::screen::{Screen, ScreenTransition};
use crate::{HexColor, PreferenceStore, Preferences, StoreError, cycle};

/// Longest accepted player symbol, in characters.
const MAX_SYMBOL_CHARS: usize = 2;

/// One row of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
enum SettingItem {
    Title,
    Player1Name,
    Player1Symbol,
    Player2Name,
    Player2Symbol,
    BoardSize,
    WinCondition,
    Timer,
    TimerDuration,
    Sound,
    Animations,
    Theme,
    Font,
    Border,
    BackgroundColor,
    CellColor,
    BackgroundImage,
    CellImage,
    ResetScores,
    ResetStats,
}

impl SettingItem {
    fn label(self) -> &'static str {
        match self {
            Self::Title => "Game Title",
            Self::Player1Name => "Player 1 Name",
            Self::Player1Symbol => "Player 1 Symbol",
            Self::Player2Name => "Player 2 Name",
            Self::Player2Symbol => "Player 2 Symbol",
            Self::BoardSize => "Board Size",
            Self::WinCondition => "Win Condition",
            Self::Timer => "Move Timer",
            Self::TimerDuration => "Timer Duration",
            Self::Sound => "Sound",
            Self::Animations => "Animations",
            Self::Theme => "Theme",
            Self::Font => "Font",
            Self::Border => "Border Style",
            Self::BackgroundColor => "Background Color",
            Self::CellColor => "Cell Color",
            Self::BackgroundImage => "Background Image",
            Self::CellImage => "Cell Image",
            Self::ResetScores => "Reset Scores",
            Self::ResetStats => "Reset Statistics",
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Self::Title
                | Self::Player1Name
                | Self::Player1Symbol
                | Self::Player2Name
                | Self::Player2Symbol
                | Self::BackgroundColor
                | Self::CellColor
                | Self::BackgroundImage
                | Self::CellImage
        )
    }

    fn value(self, prefs: &Preferences) -> String {
        let on_off = |flag: bool| if flag { "On" } else { "Off" }.to_string();
        match self {
            Self::Title => prefs.game_title().clone(),
            Self::Player1Name => prefs.player(Seat::First).name().clone(),
            Self::Player1Symbol => prefs.player(Seat::First).symbol().clone(),
            Self::Player2Name => prefs.player(Seat::Second).name().clone(),
            Self::Player2Symbol => prefs.player(Seat::Second).symbol().clone(),
            Self::BoardSize => format!("{0}x{0}", prefs.board_size()),
            Self::WinCondition => format!("{} in a row", prefs.effective_condition()),
            Self::Timer => on_off(*prefs.timer_enabled()),
            Self::TimerDuration => format!("{}s", prefs.timer_duration()),
            Self::Sound => on_off(*prefs.sound_enabled()),
            Self::Animations => on_off(*prefs.animations_enabled()),
            Self::Theme => prefs.theme().to_string(),
            Self::Font => prefs.font_family().to_string(),
            Self::Border => prefs.border_style().to_string(),
            Self::BackgroundColor => prefs.background_color().to_string(),
            Self::CellColor => prefs.cell_color().to_string(),
            Self::BackgroundImage => or_none(prefs.background_image()),
            Self::CellImage => or_none(prefs.cell_image()),
            Self::ResetScores => {
                let scores = prefs.scores();
                format!("{} - {}", scores.first, scores.second)
            }
            Self::ResetStats => format!("{} games", prefs.stats().games_played()),
        }
    }
}

fn or_none(value: &str) -> String {
    if value.is_empty() {
        "(none)".to_string()
    } else {
        value.to_string()
    }
}

/// State for the settings screen.
#[derive(Debug)]
pub struct SettingsScreen {
    preferences: Preferences,
    list_state: ListState,
    editing: Option<String>,
    message: Option<String>,
    discard_armed: bool,
}

impl SettingsScreen {
    /// Creates a settings screen editing a copy of `preferences`.
    #[instrument(skip(preferences))]
    pub fn new(preferences: Preferences) -> Self {
        debug!("Initializing SettingsScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            preferences,
            list_state,
            editing: None,
            message: None,
            discard_armed: false,
        }
    }

    /// The edited, unsaved preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn selected(&self) -> SettingItem {
        let index = self.list_state.selected().unwrap_or(0);
        SettingItem::iter().nth(index).unwrap_or(SettingItem::Title)
    }

    fn move_selection(&mut self, down: bool) {
        let count = SettingItem::iter().count();
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.list_state.select(Some(next));
    }

    /// Cycles, toggles or triggers the selected row.
    #[instrument(skip(self))]
    fn adjust(&mut self, item: SettingItem, forward: bool) {
        let prefs = &mut self.preferences;
        match item {
            SettingItem::BoardSize => prefs.cycle_board_size(forward),
            SettingItem::WinCondition => prefs.cycle_win_condition(forward),
            SettingItem::Timer => {
                let enabled = !*prefs.timer_enabled();
                prefs.set_timer_enabled(enabled);
            }
            SettingItem::TimerDuration => prefs.cycle_timer_duration(forward),
            SettingItem::Sound => {
                let enabled = !*prefs.sound_enabled();
                prefs.set_sound_enabled(enabled);
            }
            SettingItem::Animations => {
                let enabled = !*prefs.animations_enabled();
                prefs.set_animations_enabled(enabled);
            }
            SettingItem::Theme => {
                let theme = cycle(*prefs.theme(), forward);
                prefs.set_theme(theme);
            }
            SettingItem::Font => {
                let font = cycle(*prefs.font_family(), forward);
                prefs.set_font_family(font);
            }
            SettingItem::Border => {
                let border = cycle(*prefs.border_style(), forward);
                prefs.set_border_style(border);
            }
            SettingItem::ResetScores => {
                prefs.reset_scores();
                self.message = Some("Scores reset (save to keep)".to_string());
            }
            SettingItem::ResetStats => {
                prefs.reset_stats();
                self.message = Some("Statistics reset (save to keep)".to_string());
            }
            _ => return,
        }
        debug!(value = %item.value(&self.preferences), "Adjusted setting");
    }

    /// Writes an edited text value into the preferences.
    #[instrument(skip(self))]
    fn commit_text(&mut self, item: SettingItem, text: &str) -> Result<(), StoreError> {
        let text = text.trim();
        let prefs = &mut self.preferences;
        let seat_of = |item: SettingItem| match item {
            SettingItem::Player1Name | SettingItem::Player1Symbol => Seat::First,
            _ => Seat::Second,
        };
        match item {
            SettingItem::Title => {
                prefs.set_game_title(text);
            }
            SettingItem::Player1Name | SettingItem::Player2Name => {
                let seat = seat_of(item);
                let symbol = prefs.player(seat).symbol().clone();
                prefs.set_player(seat, text, &symbol);
            }
            SettingItem::Player1Symbol | SettingItem::Player2Symbol => {
                if text.is_empty() || text.chars().count() > MAX_SYMBOL_CHARS {
                    return Err(StoreError::new(format!(
                        "Symbols are 1 to {MAX_SYMBOL_CHARS} characters"
                    )));
                }
                let seat = seat_of(item);
                let name = prefs.player(seat).name().clone();
                prefs.set_player(seat, &name, text);
            }
            SettingItem::BackgroundColor => {
                prefs.set_background_color(HexColor::parse(text)?);
            }
            SettingItem::CellColor => {
                prefs.set_cell_color(HexColor::parse(text)?);
            }
            SettingItem::BackgroundImage => {
                prefs.set_background_image(text);
            }
            SettingItem::CellImage => {
                prefs.set_cell_image(text);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_edit_key(&mut self, key: KeyEvent, mut buffer: String) {
        match key.code {
            KeyCode::Enter => {
                let item = self.selected();
                match self.commit_text(item, &buffer) {
                    Ok(()) => self.message = None,
                    Err(e) => {
                        warn!(error = %e, "Rejected edit");
                        self.message = Some(e.message);
                    }
                }
            }
            KeyCode::Esc => debug!("Edit cancelled"),
            KeyCode::Backspace => {
                buffer.pop();
                self.editing = Some(buffer);
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.editing = Some(buffer);
            }
            _ => self.editing = Some(buffer),
        }
    }

    /// Validates and persists the edited preferences.
    #[instrument(skip(self, store))]
    fn persist(&mut self, store: &mut PreferenceStore) -> bool {
        match store.replace(self.preferences.clone()) {
            Ok(()) => {
                info!(path = %store.path().display(), "Saved preferences");
                self.message = Some("Preferences saved".to_string());
                true
            }
            Err(e) => {
                warn!(error = %e, "Preferences not saved");
                self.message = Some(e.message);
                false
            }
        }
    }
}

impl Screen for SettingsScreen {
    #[instrument(skip(self, frame, _store))]
    fn render(&self, frame: &mut Frame, _store: &PreferenceStore) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(format!("Game Builder - {}", self.preferences.game_title()))
            .style(
                Style::default()
                    .fg(accent(&self.preferences))
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let selected = self.selected();
        let items: Vec<ListItem> = SettingItem::iter()
            .map(|item| {
                let value = match (&self.editing, item == selected) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => item.value(&self.preferences),
                };
                ListItem::new(format!("{:<18}[ {} ]", item.label(), value))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Preferences"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let message = self.message.as_deref().unwrap_or("");
        let notice = Paragraph::new(message)
            .style(Style::default().fg(Color::Magenta))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(notice, chunks[2]);

        let help_text = if self.editing.is_some() {
            "Type | Enter: Apply | Esc: Cancel"
        } else {
            "↑↓: Select | ←→ / Enter: Change | s: Save | p: Save & Preview | Esc: Quit"
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key, store))]
    fn handle_key(&mut self, key: KeyEvent, store: &mut PreferenceStore) -> ScreenTransition {
        if let Some(buffer) = self.editing.take() {
            self.handle_edit_key(key, buffer);
            return ScreenTransition::Stay;
        }

        let item = self.selected();
        if !matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            self.discard_armed = false;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Enter | KeyCode::Char(' ') if item.is_text() => {
                let seed = match item {
                    SettingItem::BackgroundImage => self.preferences.background_image().clone(),
                    SettingItem::CellImage => self.preferences.cell_image().clone(),
                    _ => item.value(&self.preferences),
                };
                self.editing = Some(seed);
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right => self.adjust(item, true),
            KeyCode::Left => self.adjust(item, false),
            KeyCode::Char('s') => {
                self.persist(store);
            }
            KeyCode::Char('p') => {
                if self.persist(store) {
                    info!("Opening preview");
                    return ScreenTransition::GoToPreview;
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                if self.discard_armed || self.persist(store) {
                    info!("Leaving settings screen");
                    return ScreenTransition::Quit;
                }
                self.discard_armed = true;
                self.message = Some(format!(
                    "{} (press Esc again to quit without saving)",
                    self.message.take().unwrap_or_default()
                ));
            }
            _ => {}
        }
        ScreenTransition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PreferenceStore::load(dir.path().join("prefs.toml")).expect("load");
        (dir, store)
    }

    fn select(screen: &mut SettingsScreen, target: SettingItem) {
        let index = SettingItem::iter()
            .position(|i| i == target)
            .expect("listed");
        screen.list_state.select(Some(index));
    }

    fn type_text(screen: &mut SettingsScreen, store: &mut PreferenceStore, text: &str) {
        screen.handle_key(press(KeyCode::Enter), store);
        let current = screen.editing.clone().unwrap_or_default();
        for _ in current.chars() {
            screen.handle_key(press(KeyCode::Backspace), store);
        }
        for c in text.chars() {
            screen.handle_key(press(KeyCode::Char(c)), store);
        }
        screen.handle_key(press(KeyCode::Enter), store);
    }

    #[test]
    fn test_cycles_board_size_and_saves() {
        let (_dir, mut store) = store();
        let mut screen = SettingsScreen::new(store.preferences().clone());
        select(&mut screen, SettingItem::BoardSize);

        screen.handle_key(press(KeyCode::Right), &mut store);
        assert_eq!(*screen.preferences().board_size(), 4);
        assert_eq!(*store.preferences().board_size(), 3);

        let transition = screen.handle_key(press(KeyCode::Char('p')), &mut store);
        assert_eq!(transition, ScreenTransition::GoToPreview);
        assert_eq!(*store.preferences().board_size(), 4);
    }

    #[test]
    fn test_text_edit_updates_symbol() {
        let (_dir, mut store) = store();
        let mut screen = SettingsScreen::new(store.preferences().clone());
        select(&mut screen, SettingItem::Player2Symbol);

        type_text(&mut screen, &mut store, "★");
        assert_eq!(screen.preferences().player(Seat::Second).symbol(), "★");
        assert_eq!(screen.message, None);
    }

    #[test]
    fn test_bad_color_is_reported() {
        let (_dir, mut store) = store();
        let mut screen = SettingsScreen::new(store.preferences().clone());
        select(&mut screen, SettingItem::CellColor);

        type_text(&mut screen, &mut store, "blue");
        assert_eq!(screen.preferences().cell_color().as_str(), "#2d2d42");
        assert!(screen.message.as_deref().is_some_and(|m| m.contains("blue")));
    }

    #[test]
    fn test_invalid_prefs_block_preview_until_discarded() {
        let (_dir, mut store) = store();
        let mut screen = SettingsScreen::new(store.preferences().clone());
        select(&mut screen, SettingItem::Player2Symbol);
        type_text(&mut screen, &mut store, "X");

        let transition = screen.handle_key(press(KeyCode::Char('p')), &mut store);
        assert_eq!(transition, ScreenTransition::Stay);
        assert_eq!(store.preferences().player(Seat::Second).symbol(), "O");

        assert_eq!(
            screen.handle_key(press(KeyCode::Esc), &mut store),
            ScreenTransition::Stay
        );
        assert_eq!(
            screen.handle_key(press(KeyCode::Esc), &mut store),
            ScreenTransition::Quit
        );
    }

    #[test]
    fn test_toggles_and_wraps_selection() {
        let (_dir, mut store) = store();
        let mut screen = SettingsScreen::new(store.preferences().clone());
        screen.handle_key(press(KeyCode::Up), &mut store);
        assert_eq!(screen.selected(), SettingItem::ResetStats);

        select(&mut screen, SettingItem::Timer);
        screen.handle_key(press(KeyCode::Enter), &mut store);
        assert!(*screen.preferences().timer_enabled());
    }
}
