//! Scores, win streaks and unlockable achievements.

use crate::messages::{LIGHTNING, STREAK, fill};
use crate::types::Seat;
use serde::{Deserialize, Serialize};

/// Consecutive wins that unlock the streak achievement.
pub const STREAK_TARGET: u32 = 3;

/// Largest move count that still counts as a lightning victory.
pub fn lightning_threshold(size: usize) -> usize {
    size + 1
}

/// Achievement text for a completed streak.
pub fn streak_text(name: &str) -> String {
    fill(&fill(STREAK, "target", &STREAK_TARGET.to_string()), "name", name)
}

/// Achievement text for a fast win.
pub fn lightning_text(moves: usize) -> String {
    fill(LIGHTNING, "moves", &moves.to_string())
}

/// A pair of per-seat counters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
pub struct PerSeat {
    /// Player 1's count.
    #[serde(rename = "player1")]
    pub first: u32,
    /// Player 2's count.
    #[serde(rename = "player2")]
    pub second: u32,
}

impl PerSeat {
    /// Count for `seat`.
    pub fn get(&self, seat: Seat) -> u32 {
        match seat {
            Seat::First => self.first,
            Seat::Second => self.second,
        }
    }

    /// Mutable count for `seat`.
    pub fn get_mut(&mut self, seat: Seat) -> &mut u32 {
        match seat {
            Seat::First => &mut self.first,
            Seat::Second => &mut self.second,
        }
    }
}

/// Cumulative match wins per seat; survives resets.
pub type Scores = PerSeat;

/// Consecutive wins per seat.
pub type Streaks = PerSeat;

/// Insertion-ordered achievement texts, deduplicated by exact text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct Achievements(Vec<String>);

impl Achievements {
    /// Builds a set from existing texts, dropping duplicates.
    pub fn from_texts(texts: impl IntoIterator<Item = String>) -> Self {
        let mut set = Self::default();
        for text in texts {
            set.unlock(text);
        }
        set
    }

    /// Adds `text` unless already present. Returns true if it was new.
    pub fn unlock(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.0.contains(&text) {
            return false;
        }
        self.0.push(text);
        true
    }

    /// Texts in unlock order.
    pub fn texts(&self) -> &[String] {
        &self.0
    }

    /// Number unlocked.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is unlocked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_deduplicates() {
        let mut set = Achievements::default();
        assert!(set.unlock(lightning_text(4)));
        assert!(!set.unlock(lightning_text(4)));
        assert!(set.unlock(lightning_text(3)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_texts_keeps_first_occurrence_order() {
        let set = Achievements::from_texts(["b".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(set.texts(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_texts() {
        assert_eq!(streak_text("Ann"), "Ann won 3 games in a row!");
        assert_eq!(lightning_text(5), "Lightning Victory: Won in just 5 moves!");
        assert_eq!(lightning_threshold(4), 5);
    }
}
