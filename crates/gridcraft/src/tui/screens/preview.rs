//! Preview screen: play the configured game against yourself.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use gridcraft_engine::{
    ConfigError, MatchController, MoveOutcome, SavedMatch, Seat, TickOutcome,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};
use unicode_width::UnicodeWidthStr;

use super::{accent, to_color};
use crate::tui::effects::{Banner, TerminalEffects};
use crate::tui::screen::{AppEvent, Screen, ScreenTransition};
use crate::tui::ticker::IntervalTicker;
use crate::{BorderStyle, PreferenceStore, Preferences};

/// Save file used by `s` and `l` unless overridden.
pub const DEFAULT_SAVE_FILE: &str = "gridcraft-save.json";

const CELL_WIDTH: usize = 7;

/// State for the live preview.
#[derive(Debug)]
pub struct PreviewScreen {
    controller: MatchController,
    cursor: usize,
    generation: Arc<AtomicU64>,
    banner: Banner,
    save_path: PathBuf,
}

impl PreviewScreen {
    /// Starts a match from `preferences`, ticking on `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the preferences do not describe a
    /// playable match.
    #[instrument(skip(preferences, events, runtime))]
    pub fn new(
        preferences: &Preferences,
        events: UnboundedSender<AppEvent>,
        runtime: Handle,
        save_path: PathBuf,
    ) -> Result<Self, ConfigError> {
        let config = preferences.match_config()?;
        let ticker = IntervalTicker::new(events, runtime);
        let generation = ticker.generation();
        let banner = Banner::default();
        let controller = MatchController::new(config)
            .with_scheduler(Box::new(ticker))
            .with_effects(Box::new(TerminalEffects::stdout(banner.clone())))
            .with_scores(*preferences.scores())
            .with_achievements(preferences.achievement_set());
        info!(save_path = %save_path.display(), "Initializing PreviewScreen");
        Ok(Self {
            controller,
            cursor: 0,
            generation,
            banner,
            save_path,
        })
    }

    /// The match being played.
    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    /// Applies a timer tick unless it was sent before the last cancel.
    #[instrument(skip(self), level = "trace")]
    pub fn on_tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation.load(Ordering::SeqCst) {
            debug!(generation, "Dropping stale tick");
            return TickOutcome::Idle;
        }
        self.controller.tick()
    }

    fn size(&self) -> usize {
        *self.controller.config().size()
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let size = self.size() as isize;
        let row = (self.cursor as isize / size + d_row).clamp(0, size - 1);
        let col = (self.cursor as isize % size + d_col).clamp(0, size - 1);
        self.cursor = (row * size + col) as usize;
    }

    /// Plays the cursor cell and records a finished match in the store.
    #[instrument(skip(self, store), fields(cell = self.cursor))]
    fn play(&mut self, store: &mut PreferenceStore) {
        let outcome = self.controller.apply_move(self.cursor);
        if !matches!(outcome, MoveOutcome::Won { .. } | MoveOutcome::Drawn) {
            return;
        }
        let controller = &self.controller;
        let result = store.update(|prefs| {
            prefs.record_outcome(&outcome);
            prefs.set_scores(*controller.scores());
            prefs.absorb_achievements(controller.achievements());
        });
        if let Err(e) = result {
            warn!(error = %e, "Could not record match result");
            self.banner.show("Failed to save statistics.");
        }
    }

    #[instrument(skip(self, title))]
    fn save_game(&self, title: &str) {
        let saved = self.controller.save(Some(title.to_string()));
        match std::fs::write(&self.save_path, saved.to_json()) {
            Ok(()) => {
                info!(path = %self.save_path.display(), "Game saved");
                self.banner.show("Game saved successfully!");
            }
            Err(e) => {
                warn!(error = %e, "Game save failed");
                self.banner.show("Failed to save game.");
            }
        }
    }

    #[instrument(skip(self))]
    fn load_game(&mut self) {
        let json = match std::fs::read_to_string(&self.save_path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.banner.show("No saved game found.");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Reading save failed");
                self.banner.show("Failed to load game.");
                return;
            }
        };
        match SavedMatch::from_json(&json).and_then(|saved| self.controller.restore(saved)) {
            Ok(()) => {
                self.cursor = self.cursor.min(self.size() * self.size() - 1);
                self.banner.show("Game loaded successfully!");
            }
            Err(e) => {
                warn!(error = %e, "Restoring save failed");
                self.banner.show("Failed to load game.");
            }
        }
    }

    fn board_lines(&self, prefs: &Preferences, flashing: bool) -> Vec<Line<'static>> {
        let size = self.size();
        let cell_bg = to_color(prefs.cell_color().as_str());
        let highlight = accent(prefs);
        let winning = self.controller.winning_line().as_ref();

        let mut lines = Vec::with_capacity(size * 2);
        for row in 0..size {
            let mut spans = Vec::with_capacity(size * 2);
            for col in 0..size {
                let index = row * size + col;
                let symbol = self.controller.symbol_at(index).unwrap_or("");
                let mut style = Style::default().bg(cell_bg).fg(Color::White);
                if let Some(seat) = self.controller.board().get(index).and_then(|c| c.seat()) {
                    style = style.add_modifier(Modifier::BOLD).fg(match seat {
                        Seat::First => Color::LightBlue,
                        Seat::Second => Color::LightRed,
                    });
                }
                if winning.is_some_and(|line| line.contains(index)) {
                    style = style.bg(highlight);
                    if flashing {
                        style = style.add_modifier(Modifier::SLOW_BLINK);
                    }
                }
                if index == self.cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                if col > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(pad_center(symbol, CELL_WIDTH), style));
            }
            if row > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn history_line(&self, highlight: Color) -> Line<'static> {
        let history = self.controller.history();
        let current = history.current_step();
        let mut spans = vec![Span::raw("History: ")];
        for step in 0..history.len() {
            let label = if step == 0 {
                "Start".to_string()
            } else {
                format!("#{step}")
            };
            let style = if step == current {
                Style::default()
                    .fg(highlight)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn sidebar_lines(&self, prefs: &Preferences) -> Vec<Line<'static>> {
        let config = self.controller.config();
        let scores = self.controller.scores();
        let name = |seat: Seat| config.player(seat).name().clone();
        let mut lines = vec![
            Line::from(Span::styled(
                "Scores",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{}: {}", name(Seat::First), scores.first)),
            Line::from(format!("{}: {}", name(Seat::Second), scores.second)),
            Line::default(),
            Line::from(format!("Moves: {}", self.controller.move_count())),
        ];
        if let Some(fastest) = self.controller.fastest_win() {
            lines.push(Line::from(format!("Fastest win: {fastest} moves")));
        }
        let timer = self.controller.timer();
        if *timer.enabled() {
            let paused = if *timer.active() { "" } else { " (paused)" };
            lines.push(Line::from(format!("Time left: {}s{}", timer.remaining(), paused)));
        }
        let stats = prefs.stats();
        lines.push(Line::from(format!(
            "Played: {} | Draws: {}",
            stats.games_played(),
            stats.draws()
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Achievements",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let unlocked = self.controller.achievements().texts();
        if unlocked.is_empty() {
            lines.push(Line::from(Span::styled(
                "None yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.extend(unlocked.iter().map(|text| Line::from(format!("* {text}"))));
        lines
    }
}

/// Pads `text` to `width` terminal columns, centered.
fn pad_center(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_string();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn border_type(style: BorderStyle) -> BorderType {
    match style {
        BorderStyle::Solid => BorderType::Plain,
        BorderStyle::Dashed => BorderType::LightDoubleDashed,
        BorderStyle::Dotted => BorderType::LightQuadrupleDashed,
        BorderStyle::Double => BorderType::Double,
        BorderStyle::Ridge => BorderType::Thick,
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Screen for PreviewScreen {
    #[instrument(skip(self, frame, store))]
    fn render(&self, frame: &mut Frame, store: &PreferenceStore) {
        let prefs = store.preferences();
        let highlight = accent(prefs);
        let now = Instant::now();
        let flashing = self.banner.flashing_at(now);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(9),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new(prefs.game_title().clone())
            .style(Style::default().fg(highlight).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(34)])
            .split(chunks[1]);

        let board_block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type(*prefs.border_style()))
            .border_style(Style::default().fg(highlight))
            .style(Style::default().bg(to_color(prefs.background_color().as_str())))
            .title(format!(
                "{0}x{0} | {1} in a row",
                self.size(),
                self.controller.config().condition()
            ));
        let inner = board_block.inner(middle[0]);
        frame.render_widget(board_block, middle[0]);

        let size = self.size() as u16;
        let grid_width = size * CELL_WIDTH as u16 + size.saturating_sub(1);
        let grid_height = size * 2 - 1;
        let grid = Paragraph::new(self.board_lines(prefs, flashing));
        frame.render_widget(grid, center_rect(inner, grid_width, grid_height));

        let sidebar = Paragraph::new(self.sidebar_lines(prefs))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Match"));
        frame.render_widget(sidebar, middle[1]);

        let status_text = match self.banner.notice_at(now) {
            Some(notice) => format!("{}  |  {}", self.controller.status_text(), notice),
            None => self.controller.status_text(),
        };
        let status_style = if flashing {
            Style::default().fg(Color::Black).bg(highlight)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let status = Paragraph::new(status_text)
            .style(status_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[2]);

        let history = Paragraph::new(self.history_line(highlight))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(history, chunks[3]);

        let help = Paragraph::new(
            "Arrows + Enter: Play | u: Undo | [ ]: History | r: Reset | p: Pause | s/l: Save/Load | Esc: Settings | q: Quit",
        )
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, store))]
    fn handle_key(&mut self, key: KeyEvent, store: &mut PreferenceStore) -> ScreenTransition {
        match key.code {
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.play(store),
            KeyCode::Char('u') | KeyCode::Char('[') => {
                self.controller.undo();
            }
            KeyCode::Char(']') => {
                let step = self.controller.history().current_step();
                self.controller.jump_to_step(step + 1);
            }
            KeyCode::Char('r') => self.controller.reset(),
            KeyCode::Char('p') => {
                self.controller.toggle_timer();
            }
            KeyCode::Char('s') => self.save_game(store.preferences().game_title()),
            KeyCode::Char('l') => self.load_game(),
            KeyCode::Esc => {
                info!("Back to settings");
                return ScreenTransition::GoToSettings;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return ScreenTransition::Quit,
            _ => {}
        }
        ScreenTransition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    struct Fixture {
        dir: tempfile::TempDir,
        store: PreferenceStore,
        screen: PreviewScreen,
        _events: mpsc::UnboundedReceiver<AppEvent>,
    }

    fn fixture(prefs: Preferences) -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = PreferenceStore::load(dir.path().join("prefs.toml")).expect("load");
        store.replace(prefs).expect("valid prefs");
        let (tx, rx) = mpsc::unbounded_channel();
        let screen = PreviewScreen::new(
            store.preferences(),
            tx,
            Handle::current(),
            dir.path().join("save.json"),
        )
        .expect("playable");
        Fixture {
            dir,
            store,
            screen,
            _events: rx,
        }
    }

    fn play_cells(f: &mut Fixture, cells: &[usize]) {
        for &cell in cells {
            f.screen.cursor = cell;
            f.screen.handle_key(press(KeyCode::Enter), &mut f.store);
        }
    }

    #[tokio::test]
    async fn test_win_is_recorded_in_store() {
        let mut f = fixture(Preferences::default());
        play_cells(&mut f, &[0, 1, 3, 4, 6]);

        assert_eq!(f.screen.controller().status_text(), "Winner: Player 1");
        let prefs = f.store.preferences();
        assert_eq!(*prefs.stats().games_played(), 1);
        assert_eq!(*prefs.stats().player1_wins(), 1);
        assert_eq!(prefs.scores().first, 1);

        let reloaded = PreferenceStore::load(f.store.path()).expect("reload");
        assert_eq!(reloaded.preferences().scores().first, 1);
    }

    #[tokio::test]
    async fn test_cursor_stays_on_board() {
        let mut f = fixture(Preferences::default());
        f.screen.handle_key(press(KeyCode::Up), &mut f.store);
        f.screen.handle_key(press(KeyCode::Left), &mut f.store);
        assert_eq!(f.screen.cursor, 0);
        for _ in 0..5 {
            f.screen.handle_key(press(KeyCode::Down), &mut f.store);
            f.screen.handle_key(press(KeyCode::Right), &mut f.store);
        }
        assert_eq!(f.screen.cursor, 8);
    }

    #[tokio::test]
    async fn test_letter_keys_do_not_move_cursor() {
        let mut f = fixture(Preferences::default());
        f.screen.cursor = 4;
        for letter in ['h', 'j', 'k', 'l'] {
            f.screen.handle_key(press(KeyCode::Char(letter)), &mut f.store);
        }
        assert_eq!(f.screen.cursor, 4);
    }

    #[tokio::test]
    async fn test_save_then_load_restores_position() {
        let mut f = fixture(Preferences::default());
        play_cells(&mut f, &[4, 0]);
        f.screen.handle_key(press(KeyCode::Char('s')), &mut f.store);
        assert!(f.dir.path().join("save.json").exists());

        f.screen.handle_key(press(KeyCode::Char('r')), &mut f.store);
        assert_eq!(*f.screen.controller().move_count(), 0);

        f.screen.handle_key(press(KeyCode::Char('l')), &mut f.store);
        assert_eq!(*f.screen.controller().move_count(), 2);
        assert_eq!(f.screen.controller().symbol_at(4), Some("X"));
        assert_eq!(
            f.screen.banner.notice_at(Instant::now()).as_deref(),
            Some("Game loaded successfully!")
        );
    }

    #[tokio::test]
    async fn test_load_without_file_reports_missing() {
        let mut f = fixture(Preferences::default());
        f.screen.handle_key(press(KeyCode::Char('l')), &mut f.store);
        assert_eq!(
            f.screen.banner.notice_at(Instant::now()).as_deref(),
            Some("No saved game found.")
        );
    }

    #[tokio::test]
    async fn test_history_keys_move_view() {
        let mut f = fixture(Preferences::default());
        play_cells(&mut f, &[0, 1, 2]);
        f.screen.handle_key(press(KeyCode::Char('[')), &mut f.store);
        f.screen.handle_key(press(KeyCode::Char('[')), &mut f.store);
        assert_eq!(f.screen.controller().history().current_step(), 1);
        f.screen.handle_key(press(KeyCode::Char(']')), &mut f.store);
        assert_eq!(f.screen.controller().history().current_step(), 2);
        f.screen.handle_key(press(KeyCode::Char('u')), &mut f.store);
        assert_eq!(f.screen.controller().history().current_step(), 1);
    }

    #[tokio::test]
    async fn test_stale_ticks_are_dropped() {
        let mut prefs = Preferences::default();
        prefs.set_timer_enabled(true);
        let mut f = fixture(prefs);
        play_cells(&mut f, &[4]);

        let live = f.screen.generation.load(Ordering::SeqCst);
        assert_eq!(
            f.screen.on_tick(live),
            TickOutcome::Counted { remaining: 9 }
        );
        assert_eq!(f.screen.on_tick(live.wrapping_sub(1)), TickOutcome::Idle);
    }

    #[test]
    fn test_pad_center_uses_display_width() {
        assert_eq!(pad_center("X", 5), "  X  ");
        assert_eq!(pad_center("", 3), "   ");
        assert_eq!(pad_center("🙂", 5), " 🙂  ");
    }
}
