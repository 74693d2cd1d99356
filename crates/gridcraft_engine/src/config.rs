//! Immutable per-match configuration snapshot.

use crate::ConfigError;
use crate::types::{PlayerProfile, Seat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default seconds per move when the timer is on.
pub const DEFAULT_TIMER_SECONDS: u32 = 10;

/// Move timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TimerSettings {
    enabled: bool,
    seconds: u32,
}

impl TimerSettings {
    /// Timer on with `seconds` per move.
    pub fn on(seconds: u32) -> Self {
        Self {
            enabled: true,
            seconds,
        }
    }

    /// Timer off.
    pub fn off() -> Self {
        Self {
            enabled: false,
            seconds: DEFAULT_TIMER_SECONDS,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::off()
    }
}

/// Everything the match controller reads from the outside world.
///
/// Built once per match; changing the board size or player names means
/// building a new one and calling
/// [`MatchController::reconfigure`](crate::MatchController::reconfigure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchConfig {
    size: usize,
    condition: usize,
    players: [PlayerProfile; 2],
    timer: TimerSettings,
    sound: bool,
    animations: bool,
}

impl MatchConfig {
    /// Validates and builds a configuration.
    ///
    /// `condition` is clamped into `1..=size`.
    ///
    /// # Errors
    ///
    /// Fails for a zero size, a zero-second timer, an empty symbol, or two
    /// players sharing a symbol.
    #[instrument(skip(players), fields(p1 = %players[0].name(), p2 = %players[1].name()))]
    pub fn new(
        size: usize,
        condition: usize,
        players: [PlayerProfile; 2],
        timer: TimerSettings,
        sound: bool,
        animations: bool,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::new("Board size must be at least 1"));
        }
        if timer.enabled && timer.seconds == 0 {
            return Err(ConfigError::new("Timer duration must be at least 1 second"));
        }
        if players.iter().any(|p| p.symbol().trim().is_empty()) {
            return Err(ConfigError::new("Player symbols must not be empty"));
        }
        if players[0].symbol() == players[1].symbol() {
            return Err(ConfigError::new(format!(
                "Both players use the symbol {:?}",
                players[0].symbol()
            )));
        }

        let clamped = condition.clamp(1, size);
        if clamped != condition {
            debug!(condition, clamped, "Win condition clamped to board size");
        }

        Ok(Self {
            size,
            condition: clamped,
            players,
            timer,
            sound,
            animations,
        })
    }

    /// Classic 3×3, X and O, no timer.
    pub fn classic() -> Self {
        Self {
            size: 3,
            condition: 3,
            players: [
                PlayerProfile::new("Player 1".to_string(), "X".to_string()),
                PlayerProfile::new("Player 2".to_string(), "O".to_string()),
            ],
            timer: TimerSettings::off(),
            sound: true,
            animations: true,
        }
    }

    /// Profile for a seat.
    pub fn player(&self, seat: Seat) -> &PlayerProfile {
        &self.players[seat.index()]
    }

    /// Seat using `symbol`, if any.
    pub fn seat_for_symbol(&self, symbol: &str) -> Option<Seat> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|s| self.player(*s).symbol() == symbol)
    }

    /// Number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Returns a copy with the timer replaced.
    pub fn with_timer(mut self, timer: TimerSettings) -> Self {
        if !(timer.enabled && timer.seconds == 0) {
            self.timer = timer;
        }
        self
    }
}
