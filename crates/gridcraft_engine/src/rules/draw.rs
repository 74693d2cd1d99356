//! Draw detection.

use crate::types::Cell;

/// Checks if every cell is occupied.
///
/// A full board with no winning line is a draw.
pub fn is_full(cells: &[Cell]) -> bool {
    cells.iter().all(|c| *c != Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::{Verdict, evaluate};
    use super::*;
    use crate::types::{Board, Seat};

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(Board::new(3).cells()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new(4);
        board.place(5, Seat::First);
        assert!(!is_full(board.cells()));
    }

    #[test]
    fn test_full_four_board_without_runs_is_draw() {
        // Alternating pairs: no three in a row anywhere on 4x4.
        // X X O O / O O X X / X X O O / O O X X
        let pattern = [0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0];
        let mut board = Board::new(4);
        for (i, p) in pattern.iter().enumerate() {
            board.place(i, if *p == 0 { Seat::First } else { Seat::Second });
        }
        assert!(is_full(board.cells()));
        assert_eq!(evaluate(board.cells(), 4, 3), Verdict::Draw);
    }
}
