//! Win detection for N×N boards.

use crate::lines::{Line, candidate_lines};
use crate::types::{Cell, Seat};
use tracing::instrument;

/// Returns the owner of the first fully matching line and that line.
///
/// Lines are checked in [`candidate_lines`] order, so when one move
/// completes two lines the earlier-enumerated one is reported.
#[instrument(skip(cells))]
pub fn find_winner(cells: &[Cell], size: usize, condition: usize) -> Option<(Seat, Line)> {
    candidate_lines(size, condition)
        .into_iter()
        .find_map(|line| line_owner(cells, &line).map(|seat| (seat, line)))
}

/// Returns every fully matching line, in enumeration order.
#[instrument(skip(cells))]
pub fn winning_lines(cells: &[Cell], size: usize, condition: usize) -> Vec<(Seat, Line)> {
    candidate_lines(size, condition)
        .into_iter()
        .filter_map(|line| line_owner(cells, &line).map(|seat| (seat, line)))
        .collect()
}

/// The seat holding every cell of `line`, if one does.
fn line_owner(cells: &[Cell], line: &Line) -> Option<Seat> {
    let (&head, rest) = line.indices().split_first()?;
    let seat = cells.get(head)?.seat()?;
    rest.iter()
        .all(|&i| cells.get(i) == Some(&Cell::Taken(seat)))
        .then_some(seat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Board;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new(3);
        assert_eq!(find_winner(board.cells(), 3, 3), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new(3);
        for i in 0..3 {
            board.place(i, Seat::First);
        }
        let (seat, line) = find_winner(board.cells(), 3, 3).expect("row should win");
        assert_eq!(seat, Seat::First);
        assert_eq!(line.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_no_winner_mixed_line() {
        let mut board = Board::new(3);
        board.place(0, Seat::First);
        board.place(1, Seat::Second);
        board.place(2, Seat::First);
        assert_eq!(find_winner(board.cells(), 3, 3), None);
    }

    #[test]
    fn test_double_line_reports_row_first() {
        // Last move at 0 completes row 0 and column 0.
        let mut board = Board::new(3);
        for i in [0, 1, 2, 3, 6] {
            board.place(i, Seat::Second);
        }
        let (_, line) = find_winner(board.cells(), 3, 3).expect("should win");
        assert_eq!(line.indices(), &[0, 1, 2]);

        let all = winning_lines(board.cells(), 3, 3);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].1.indices(), &[0, 3, 6]);
    }

    #[test]
    fn test_anti_diagonal_on_five_board() {
        let mut board = Board::new(5);
        for i in [4, 8, 12, 16] {
            board.place(i, Seat::Second);
        }
        let (seat, line) = find_winner(board.cells(), 5, 4).expect("should win");
        assert_eq!(seat, Seat::Second);
        assert_eq!(line.indices(), &[4, 8, 12, 16]);
    }
}
