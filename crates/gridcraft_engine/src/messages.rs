//! Player-facing message templates.
//!
//! Both front ends render status lines and achievement texts from these
//! templates. Placeholders are `{name}`, `{moves}` and `{text}`.

use crate::achievements::STREAK_TARGET;
use serde::Serialize;

/// Status once a seat has won.
pub const WINNER: &str = "Winner: {name}";
/// Status once the board fills without a line.
pub const DRAW: &str = "Game ended in a draw!";
/// Status while play continues.
pub const NEXT_PLAYER: &str = "Next player: {name}";
/// Status right after a timer expiry passed the turn.
pub const TIME_UP: &str = "Time's up! Next player: {name}";
/// Streak achievement; `{target}` is fixed at [`STREAK_TARGET`].
pub const STREAK: &str = "{name} won {target} games in a row!";
/// Lightning achievement.
pub const LIGHTNING: &str = "Lightning Victory: Won in just {moves} moves!";
/// Notice shown when an achievement is new.
pub const ACHIEVEMENT_UNLOCKED: &str = "Achievement unlocked: {text}";

/// Replaces every `{key}` in `template` with `value`.
pub fn fill(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{key}}}"), value)
}

/// The template set handed to the exported page.
///
/// Constants are already filled in; only per-event placeholders remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    winner: String,
    draw: String,
    next_player: String,
    time_up: String,
    streak: String,
    lightning: String,
    achievement_unlocked: String,
}

impl Messages {
    /// Templates with `{target}` resolved.
    pub fn templates() -> Self {
        Self {
            winner: WINNER.to_string(),
            draw: DRAW.to_string(),
            next_player: NEXT_PLAYER.to_string(),
            time_up: TIME_UP.to_string(),
            streak: fill(STREAK, "target", &STREAK_TARGET.to_string()),
            lightning: LIGHTNING.to_string(),
            achievement_unlocked: ACHIEVEMENT_UNLOCKED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_occurrence() {
        assert_eq!(fill("{a} and {a}", "a", "b"), "b and b");
        assert_eq!(fill(DRAW, "name", "Ann"), DRAW);
    }

    #[test]
    fn test_templates_resolve_streak_target() {
        let templates = Messages::templates();
        assert_eq!(templates.streak, "{name} won 3 games in a row!");
        assert!(templates.lightning.contains("{moves}"));
    }
}
