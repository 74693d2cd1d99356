//! Move history with a movable view pointer.

use crate::types::{Board, Seat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Board state plus the seat to move after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Snapshot {
    board: Board,
    to_move: Seat,
}

impl Snapshot {
    /// Creates a snapshot.
    pub fn new(board: Board, to_move: Seat) -> Self {
        Self { board, to_move }
    }

    /// Empty board, player 1 to move.
    pub fn root(size: usize) -> Self {
        Self::new(Board::new(size), Seat::First)
    }
}

/// Ordered snapshots; index 0 is always the empty root.
///
/// Navigation only moves `current_step`. Recording while viewing an
/// earlier step discards every later snapshot first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    snapshots: Vec<Snapshot>,
    current_step: usize,
}

impl History {
    /// History holding only the root for a board of `size`.
    pub fn new(size: usize) -> Self {
        Self {
            snapshots: vec![Snapshot::root(size)],
            current_step: 0,
        }
    }

    /// Rebuilds a history from saved parts.
    ///
    /// Returns `None` for an empty list or a step past the end.
    pub fn from_parts(snapshots: Vec<Snapshot>, current_step: usize) -> Option<Self> {
        (current_step < snapshots.len()).then_some(Self {
            snapshots,
            current_step,
        })
    }

    /// Appends after the current step, truncating any later branch.
    #[instrument(skip(self, snapshot), fields(step = self.current_step))]
    pub fn record(&mut self, snapshot: Snapshot) {
        let keep = self.current_step + 1;
        if self.snapshots.len() > keep {
            debug!(
                discarded = self.snapshots.len() - keep,
                "Discarding snapshots after branch point"
            );
            self.snapshots.truncate(keep);
        }
        self.snapshots.push(snapshot);
        self.current_step = self.snapshots.len() - 1;
    }

    /// Moves the view pointer. Returns the snapshot, or `None` when out of range.
    pub fn jump(&mut self, step: usize) -> Option<&Snapshot> {
        if step >= self.snapshots.len() {
            return None;
        }
        self.current_step = step;
        self.snapshots.get(step)
    }

    /// Rewrites the turn stored with the newest snapshot.
    ///
    /// Used when a timer expiry passes the turn without a move.
    pub fn set_latest_to_move(&mut self, seat: Seat) {
        if let Some(latest) = self.snapshots.last_mut() {
            latest.to_move = seat;
        }
    }

    /// Drops everything but a fresh root.
    pub fn reset(&mut self, size: usize) {
        *self = Self::new(size);
    }

    /// Index of the snapshot being viewed.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Index of the newest snapshot.
    pub fn latest_step(&self) -> usize {
        self.snapshots.len() - 1
    }

    /// True when viewing the newest snapshot.
    pub fn is_at_latest(&self) -> bool {
        self.current_step == self.latest_step()
    }

    /// All snapshots, root first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of snapshots including the root.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(size: usize, index: usize, seat: Seat) -> Snapshot {
        let mut board = Board::new(size);
        board.place(index, seat);
        Snapshot::new(board, seat.opponent())
    }

    #[test]
    fn test_root_is_empty_first_to_move() {
        let history = History::new(3);
        assert_eq!(history.len(), 1);
        assert_eq!(history.snapshots()[0], Snapshot::root(3));
        assert!(history.is_at_latest());
    }

    #[test]
    fn test_jump_keeps_snapshots() {
        let mut history = History::new(3);
        history.record(after(3, 4, Seat::First));
        history.record(after(3, 0, Seat::Second));
        assert!(history.jump(1).is_some());
        assert_eq!(history.len(), 3);
        assert!(!history.is_at_latest());
        assert!(history.jump(3).is_none());
        assert_eq!(history.current_step(), 1);
    }

    #[test]
    fn test_record_after_jump_truncates_branch() {
        let mut history = History::new(3);
        history.record(after(3, 4, Seat::First));
        history.record(after(3, 0, Seat::Second));
        history.jump(1);
        history.record(after(3, 8, Seat::Second));
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_step(), 2);
    }

    #[test]
    fn test_from_parts_validates_step() {
        assert!(History::from_parts(vec![Snapshot::root(3)], 1).is_none());
        assert!(History::from_parts(Vec::new(), 0).is_none());
        assert!(History::from_parts(vec![Snapshot::root(3)], 0).is_some());
    }
}
