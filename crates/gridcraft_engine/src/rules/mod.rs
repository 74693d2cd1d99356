//! Board evaluation rules.
//!
//! Pure functions over a cell slice, its side length and the run length
//! needed to win. Rules are kept apart from board storage so the same
//! routine backs the live preview and the exported game.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{find_winner, winning_lines};

use crate::lines::Line;
use crate::types::{Cell, Seat};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// A full line belongs to `seat`.
    Win {
        /// Owner of the line.
        seat: Seat,
        /// The first matching line in enumeration order.
        line: Line,
    },
    /// Every cell is filled and no line matches.
    Draw,
    /// Play continues.
    Ongoing,
}

impl Verdict {
    /// True for `Win` and `Draw`.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Ongoing)
    }

    /// The winning seat, if any.
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Verdict::Win { seat, .. } => Some(*seat),
            _ => None,
        }
    }
}

/// Evaluates a board of side `size` for runs of `condition`.
///
/// The caller guarantees `cells.len() == size * size` and
/// `1 <= condition <= size`.
#[instrument(skip(cells), fields(cells = cells.len()))]
pub fn evaluate(cells: &[Cell], size: usize, condition: usize) -> Verdict {
    if let Some((seat, line)) = find_winner(cells, size, condition) {
        return Verdict::Win { seat, line };
    }
    if is_full(cells) {
        Verdict::Draw
    } else {
        Verdict::Ongoing
    }
}
