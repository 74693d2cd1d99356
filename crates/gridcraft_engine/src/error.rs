//! Engine error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Invalid match configuration, with caller location.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Why a saved match could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RestoreError {
    /// A board in the save does not match the configured size.
    #[display("Saved board has {found} cells, expected {expected}")]
    BoardSize {
        /// Cells required by the configuration.
        expected: usize,
        /// Cells found in the save.
        found: usize,
    },

    /// A cell holds a mark neither player uses.
    #[display("Saved board contains unknown mark {:?}", _0)]
    UnknownSymbol(#[error(not(source))] String),

    /// The history has no root snapshot.
    #[display("Saved history is empty")]
    EmptyHistory,

    /// The view pointer is past the end of the history.
    #[display("Saved step {step} is outside a history of {len} snapshots")]
    StepOutOfRange {
        /// Saved view pointer.
        step: usize,
        /// Saved history length.
        len: usize,
    },

    /// The first snapshot is not an empty board with player 1 to move.
    #[display("Saved history does not start from an empty board")]
    BadRoot,

    /// The saved winner or winning line disagrees with the saved board.
    #[display("Saved result does not match the board")]
    ResultMismatch,

    /// The payload is not valid save JSON.
    #[display("Saved game is not readable: {}", _0)]
    Malformed(#[error(not(source))] String),
}

/// A side effect (sound, animation) failed. Never fatal to the match.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Effect failed: {}", message)]
pub struct EffectError {
    /// What went wrong.
    pub message: String,
}

impl EffectError {
    /// Creates a new effect error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
