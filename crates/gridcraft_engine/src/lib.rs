//! Gridcraft engine - N×N tic-tac-toe rules and match control
//!
//! Pure game logic shared by the terminal preview and the exported page.
//!
//! # Architecture
//!
//! - **Lines**: the ordered table of winnable lines for a size and win condition
//! - **Rules**: board evaluation (win, draw, ongoing)
//! - **Controller**: turns, history, scores, streaks, achievements and the move timer
//! - **Save**: the JSON format both front ends save and load
//!
//! # Example
//!
//! ```
//! use gridcraft_engine::{MatchConfig, MatchController, MoveOutcome, Seat};
//!
//! let mut game = MatchController::new(MatchConfig::classic());
//! for index in [0, 1, 3, 4] {
//!     game.apply_move(index);
//! }
//! assert_eq!(
//!     game.apply_move(6),
//!     MoveOutcome::Won { seat: Seat::First, moves: 5 }
//! );
//! assert_eq!(game.status_text(), "Winner: Player 1");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod achievements;
mod config;
mod controller;
mod effects;
mod error;
mod history;
mod lines;
mod messages;
mod rules;
mod save;
mod timer;
mod types;

// Crate-level exports - Errors
pub use error::{ConfigError, EffectError, RestoreError};

// Crate-level exports - Board and lines
pub use lines::{Line, candidate_lines, line_count};
pub use rules::{Verdict, evaluate, find_winner, is_full, winning_lines};
pub use types::{Board, Cell, PlayerProfile, Seat};

// Crate-level exports - Match control
pub use achievements::{
    Achievements, PerSeat, STREAK_TARGET, Scores, Streaks, lightning_text, lightning_threshold,
    streak_text,
};
pub use config::{DEFAULT_TIMER_SECONDS, MatchConfig, TimerSettings};
pub use controller::{MatchController, MatchPhase, MoveOutcome, MoveRejection, TickOutcome};
pub use history::{History, Snapshot};
pub use timer::{Countdown, ManualTicks, MoveTimer, TickScheduler};

// Crate-level exports - Messages
pub use messages::{
    ACHIEVEMENT_UNLOCKED, DRAW, LIGHTNING, Messages, NEXT_PLAYER, STREAK, TIME_UP, WINNER, fill,
};

// Crate-level exports - Effects
pub use effects::{EffectCall, Effects, RecordingEffects, SilentEffects, SoundKind};

// Crate-level exports - Save format
pub use save::{STORAGE_KEY, SavedMatch, SavedStep, decode_board, encode_board};
