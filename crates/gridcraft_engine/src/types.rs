//! Core domain types for N×N tic-tac-toe.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two seats at the table.
///
/// The first seat always moves first; which mark it draws is a
/// configuration concern (see [`PlayerProfile`]).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Seat {
    /// Player 1 (moves first).
    First,
    /// Player 2.
    Second,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Zero-based index of this seat (0 for player 1).
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a seat's mark.
    Taken(Seat),
}

impl Cell {
    /// Returns the occupying seat, if any.
    pub fn seat(self) -> Option<Seat> {
        match self {
            Cell::Empty => None,
            Cell::Taken(seat) => Some(seat),
        }
    }
}

/// Square board of `size * size` cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with the given side length.
    #[instrument]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a board from raw cells.
    ///
    /// Returns `None` unless `cells.len() == size * size`.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == size * size).then_some(Self { size, cells })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Gets the cell at `index`.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Marks a cell for `seat`. Out-of-range indices are ignored.
    pub fn place(&mut self, index: usize, seat: Seat) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::Taken(seat);
        }
    }

    /// True once no empty cell remains.
    pub fn is_full(&self) -> bool {
        crate::rules::is_full(&self.cells)
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Empties every cell, keeping the size.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = Cell::Empty);
    }

    /// Row and column of a cell index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }
}

/// Display name and mark for one seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct PlayerProfile {
    /// Name shown in status lines and achievements.
    name: String,
    /// Mark drawn in cells; any non-empty text, emoji included.
    symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_square_and_empty() {
        let board = Board::new(4);
        assert_eq!(board.cells().len(), 16);
        assert_eq!(board.occupied(), 0);
        assert!(board.is_empty(15));
        assert!(!board.is_empty(16));
    }

    #[test]
    fn test_from_cells_rejects_wrong_length() {
        assert!(Board::from_cells(3, vec![Cell::Empty; 8]).is_none());
        assert!(Board::from_cells(3, vec![Cell::Empty; 9]).is_some());
    }

    #[test]
    fn test_clear_keeps_size() {
        let mut board = Board::new(3);
        board.place(4, Seat::First);
        board.clear();
        assert_eq!(board, Board::new(3));
    }

    #[test]
    fn test_coords() {
        let board = Board::new(5);
        assert_eq!(board.coords(7), (1, 2));
    }
}
