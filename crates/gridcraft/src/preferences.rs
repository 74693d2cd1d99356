//! Persisted game preferences: look, players, rules and lifetime stats.
//!
//! One [`Preferences`] value is read at session start, passed explicitly to
//! whatever needs it, and written back by the
//! [`PreferenceStore`](crate::PreferenceStore) after each confirmed change.

use derive_getters::Getters;
use derive_setters::Setters;
use gridcraft_engine::{
    Achievements, ConfigError, DEFAULT_TIMER_SECONDS, MatchConfig, MoveOutcome, PlayerProfile,
    Scores, Seat, TimerSettings,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::StoreError;

/// Board sizes offered by the wizard.
pub const BOARD_SIZES: [usize; 3] = [3, 4, 5];

/// Timer durations offered by the wizard, in seconds.
pub const TIMER_DURATIONS: [u32; 3] = [5, 10, 15];

/// A validated `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parses `#rrggbb` (case-insensitive; stored lowercase).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for anything else.
    #[track_caller]
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        let digits = value
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| StoreError::new(format!("Invalid color {value:?}, expected #rrggbb")))?;
        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    /// The `#rrggbb` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or_default()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl TryFrom<String> for HexColor {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Color theme of the builder's own screens.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    /// Indigo to pink.
    #[default]
    Default,
    /// Blue to teal.
    Ocean,
    /// Orange to pink.
    Sunset,
    /// Greens.
    Forest,
    /// Slate to purple.
    Midnight,
}

impl Theme {
    /// Gradient stops, dark to light.
    pub fn gradient(self) -> [&'static str; 3] {
        match self {
            Self::Default => ["#312e81", "#581c87", "#9d174d"],
            Self::Ocean => ["#1e3a8a", "#155e75", "#0f766e"],
            Self::Sunset => ["#c2410c", "#991b1b", "#831843"],
            Self::Forest => ["#14532d", "#065f46", "#115e59"],
            Self::Midnight => ["#0f172a", "#1e1b4b", "#3b0764"],
        }
    }
}

/// Font used by the exported page.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FontFamily {
    /// Segoe UI and friends.
    #[default]
    Default,
    /// Georgia.
    Serif,
    /// Courier New.
    Mono,
    /// Comic Sans.
    Rounded,
    /// Palatino.
    Elegant,
}

impl FontFamily {
    /// CSS `font-family` value.
    pub fn css_stack(self) -> &'static str {
        match self {
            Self::Default => "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif",
            Self::Serif => "Georgia, 'Times New Roman', serif",
            Self::Mono => "'Courier New', monospace",
            Self::Rounded => "'Comic Sans MS', cursive",
            Self::Elegant => "'Palatino Linotype', serif",
        }
    }
}

/// Cell border line style.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BorderStyle {
    /// Solid line.
    #[default]
    Solid,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
    /// Double line.
    Double,
    /// Ridge.
    Ridge,
}

/// Steps to the next (or previous) variant, wrapping around.
pub fn cycle<T>(current: T, forward: bool) -> T
where
    T: IntoEnumIterator + PartialEq + Copy,
{
    let all: Vec<T> = T::iter().collect();
    let position = all.iter().position(|v| *v == current).unwrap_or(0);
    let len = all.len();
    let next = if forward {
        (position + 1) % len
    } else {
        (position + len - 1) % len
    };
    all[next]
}

/// Steps through a fixed list of options, wrapping around.
pub fn cycle_value<T: PartialEq + Copy>(options: &[T], current: T, forward: bool) -> T {
    let Some(position) = options.iter().position(|v| *v == current) else {
        return options.first().copied().unwrap_or(current);
    };
    let len = options.len();
    if forward {
        options[(position + 1) % len]
    } else {
        options[(position + len - 1) % len]
    }
}

/// One seat's name and mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema, Getters)]
pub struct PlayerPrefs {
    name: String,
    symbol: String,
}

impl PlayerPrefs {
    /// Builds a player entry.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Counters across every finished match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema, Getters,
)]
#[serde(default)]
pub struct LifetimeStats {
    games_played: u32,
    player1_wins: u32,
    player2_wins: u32,
    draws: u32,
}

/// Everything the wizard configures, plus lifetime statistics.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema, Getters, Setters,
)]
#[serde(default)]
#[setters(borrow_self, prefix = "set_")]
pub struct Preferences {
    background_color: HexColor,
    /// Image URL or path; empty for none.
    #[setters(into)]
    background_image: String,
    cell_color: HexColor,
    /// Image URL or path; empty for none.
    #[setters(into)]
    cell_image: String,
    #[setters(into)]
    game_title: String,
    board_size: usize,
    win_condition: usize,
    sound_enabled: bool,
    animations_enabled: bool,
    timer_enabled: bool,
    timer_duration: u32,
    theme: Theme,
    font_family: FontFamily,
    border_style: BorderStyle,
    #[setters(skip)]
    player1: PlayerPrefs,
    #[setters(skip)]
    player2: PlayerPrefs,
    #[setters(skip)]
    scores: Scores,
    #[setters(skip)]
    stats: LifetimeStats,
    #[setters(skip)]
    achievements: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            background_color: HexColor("#1e1e2f".to_string()),
            background_image: String::new(),
            cell_color: HexColor("#2d2d42".to_string()),
            cell_image: String::new(),
            game_title: "Tic Tac Toe".to_string(),
            board_size: 3,
            win_condition: 3,
            sound_enabled: true,
            animations_enabled: true,
            timer_enabled: false,
            timer_duration: DEFAULT_TIMER_SECONDS,
            theme: Theme::default(),
            font_family: FontFamily::default(),
            border_style: BorderStyle::default(),
            player1: PlayerPrefs::new("Player 1", "X"),
            player2: PlayerPrefs::new("Player 2", "O"),
            scores: Scores::default(),
            stats: LifetimeStats::default(),
            achievements: Vec::new(),
        }
    }
}

impl Preferences {
    /// Name and mark for a seat.
    pub fn player(&self, seat: Seat) -> &PlayerPrefs {
        match seat {
            Seat::First => &self.player1,
            Seat::Second => &self.player2,
        }
    }

    /// Replaces a seat's name and mark.
    #[instrument(skip(self))]
    pub fn set_player(&mut self, seat: Seat, name: &str, symbol: &str) -> &mut Self {
        let entry = PlayerPrefs::new(name.trim(), symbol.trim());
        match seat {
            Seat::First => self.player1 = entry,
            Seat::Second => self.player2 = entry,
        }
        self
    }

    /// Win condition clamped into `1..=board_size`.
    pub fn effective_condition(&self) -> usize {
        self.win_condition.clamp(1, self.board_size.max(1))
    }

    /// Builds the match configuration these preferences describe.
    ///
    /// # Errors
    ///
    /// Propagates the engine's validation (empty or shared symbols, zero
    /// size or timer).
    #[instrument(skip(self), fields(size = self.board_size, condition = self.win_condition))]
    pub fn match_config(&self) -> Result<MatchConfig, ConfigError> {
        let timer = if self.timer_enabled {
            TimerSettings::on(self.timer_duration)
        } else {
            TimerSettings::off()
        };
        MatchConfig::new(
            self.board_size,
            self.win_condition,
            [
                PlayerProfile::new(self.player1.name.clone(), self.player1.symbol.clone()),
                PlayerProfile::new(self.player2.name.clone(), self.player2.symbol.clone()),
            ],
            timer,
            self.sound_enabled,
            self.animations_enabled,
        )
    }

    /// Checks that the preferences describe a playable match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] wrapping the configuration problem.
    #[track_caller]
    pub fn validate(&self) -> Result<(), StoreError> {
        self.match_config()
            .map(|_| ())
            .map_err(|e| StoreError::new(e.message))
    }

    /// Counts a finished match. Unfinished outcomes are ignored.
    #[instrument(skip(self))]
    pub fn record_outcome(&mut self, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Won { seat, .. } => {
                self.stats.games_played += 1;
                *self.scores.get_mut(*seat) += 1;
                match seat {
                    Seat::First => self.stats.player1_wins += 1,
                    Seat::Second => self.stats.player2_wins += 1,
                }
                info!(%seat, games = self.stats.games_played, "Recorded win");
            }
            MoveOutcome::Drawn => {
                self.stats.games_played += 1;
                self.stats.draws += 1;
                info!(games = self.stats.games_played, "Recorded draw");
            }
            MoveOutcome::Continued { .. } | MoveOutcome::Rejected(_) => {}
        }
    }

    /// Adds achievements not already stored, keeping order.
    #[instrument(skip(self, unlocked), fields(count = unlocked.len()))]
    pub fn absorb_achievements(&mut self, unlocked: &Achievements) -> usize {
        let mut added = 0;
        for text in unlocked.texts() {
            if !self.achievements.contains(text) {
                self.achievements.push(text.clone());
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "Stored new achievements");
        }
        added
    }

    /// Stored achievements as an engine set.
    pub fn achievement_set(&self) -> Achievements {
        Achievements::from_texts(self.achievements.iter().cloned())
    }

    /// Zeroes lifetime stats and forgets achievements.
    #[instrument(skip(self))]
    pub fn reset_stats(&mut self) {
        self.stats = LifetimeStats::default();
        self.achievements.clear();
    }

    /// Zeroes both scores.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        self.scores = Scores::default();
    }

    /// Stores scores reported by a match.
    pub fn set_scores(&mut self, scores: Scores) {
        self.scores = scores;
    }

    /// Picks the next offered board size, keeping the condition in range.
    #[instrument(skip(self))]
    pub fn cycle_board_size(&mut self, forward: bool) {
        self.board_size = cycle_value(&BOARD_SIZES, self.board_size, forward);
        self.win_condition = self.win_condition.min(self.board_size);
    }

    /// Picks the next win condition from 3 (or the size, if smaller) up to the size.
    #[instrument(skip(self))]
    pub fn cycle_win_condition(&mut self, forward: bool) {
        let low = 3.min(self.board_size);
        let options: Vec<usize> = (low..=self.board_size).collect();
        self.win_condition = cycle_value(&options, self.effective_condition(), forward);
    }

    /// Picks the next offered timer duration.
    pub fn cycle_timer_duration(&mut self, forward: bool) {
        self.timer_duration = cycle_value(&TIMER_DURATIONS, self.timer_duration, forward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builder() {
        let prefs = Preferences::default();
        assert_eq!(prefs.background_color().as_str(), "#1e1e2f");
        assert_eq!(prefs.cell_color().as_str(), "#2d2d42");
        assert_eq!(prefs.player(Seat::First).symbol(), "X");
        assert_eq!(prefs.player(Seat::Second).name(), "Player 2");
        assert_eq!(*prefs.board_size(), 3);
        assert_eq!(*prefs.timer_duration(), 10);
        assert!(!*prefs.timer_enabled());
        assert_eq!(prefs.game_title(), "Tic Tac Toe");
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(HexColor::parse("#AABBCC").map(|c| c.to_string()).ok(), Some("#aabbcc".to_string()));
        assert_eq!(HexColor::parse("#0a0b0c").map(|c| c.rgb()).ok(), Some((10, 11, 12)));
        assert!(HexColor::parse("aabbcc").is_err());
        assert!(HexColor::parse("#abc").is_err());
        assert!(HexColor::parse("#gggggg").is_err());
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(cycle(Theme::Midnight, true), Theme::Default);
        assert_eq!(cycle(Theme::Default, false), Theme::Midnight);
        assert_eq!(cycle_value(&BOARD_SIZES, 5, true), 3);
        assert_eq!(cycle_value(&TIMER_DURATIONS, 7, true), 5);
    }

    #[test]
    fn test_board_size_keeps_condition_in_range() {
        let mut prefs = Preferences::default();
        prefs.cycle_board_size(true);
        prefs.cycle_board_size(true);
        assert_eq!(*prefs.board_size(), 5);
        prefs.set_win_condition(5);
        prefs.cycle_board_size(true);
        assert_eq!(*prefs.board_size(), 3);
        assert_eq!(*prefs.win_condition(), 3);
    }

    #[test]
    fn test_record_outcome_updates_stats() {
        let mut prefs = Preferences::default();
        prefs.record_outcome(&MoveOutcome::Won {
            seat: Seat::Second,
            moves: 6,
        });
        prefs.record_outcome(&MoveOutcome::Drawn);
        prefs.record_outcome(&MoveOutcome::Continued { next: Seat::First });

        assert_eq!(*prefs.stats().games_played(), 2);
        assert_eq!(*prefs.stats().player2_wins(), 1);
        assert_eq!(*prefs.stats().draws(), 1);
        assert_eq!(prefs.scores().second, 1);

        prefs.reset_stats();
        assert_eq!(*prefs.stats(), LifetimeStats::default());
        assert_eq!(prefs.scores().second, 1);
        prefs.reset_scores();
        assert_eq!(prefs.scores().second, 0);
    }

    #[test]
    fn test_shared_symbols_do_not_validate() {
        let mut prefs = Preferences::default();
        prefs.set_player(Seat::Second, "Bo", "X");
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_absorb_achievements_skips_known() {
        let mut prefs = Preferences::default();
        let unlocked = Achievements::from_texts(["a".to_string(), "b".to_string()]);
        assert_eq!(prefs.absorb_achievements(&unlocked), 2);
        assert_eq!(prefs.absorb_achievements(&unlocked), 0);
        assert_eq!(prefs.achievements(), &["a".to_string(), "b".to_string()]);
    }
}
