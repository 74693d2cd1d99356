//! Candidate winning lines for an N×N board.
//!
//! A line is `condition` consecutive cells along a row, a column, or either
//! diagonal. Lines are generated per evaluation from `size` and `condition`
//! and are never stored with the board.
//!
//! The export bundle embeds the output of [`candidate_lines`] verbatim, so
//! the enumeration order here is the order the exported game checks too.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Ordered board indices forming one candidate line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct Line(Vec<usize>);

impl Line {
    /// Wraps raw indices.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Indices in order.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Checks whether the line passes through `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Number of cells in the line.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length line.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Line> for Vec<usize> {
    fn from(line: Line) -> Self {
        line.0
    }
}

/// Enumerates every candidate line.
///
/// Order: all rows, then all columns, then ↘ diagonals, then ↙ diagonals
/// (starting column walking from `size - 1` down to `condition - 1`).
/// Callers must keep `1 <= condition <= size`.
#[instrument]
pub fn candidate_lines(size: usize, condition: usize) -> Vec<Line> {
    if condition == 0 || condition > size {
        return Vec::new();
    }
    let span = size - condition;
    let mut lines = Vec::with_capacity(line_count(size, condition));

    for row in 0..size {
        for col in 0..=span {
            lines.push(walk(condition, |i| row * size + col + i));
        }
    }

    for col in 0..size {
        for row in 0..=span {
            lines.push(walk(condition, |i| (row + i) * size + col));
        }
    }

    for row in 0..=span {
        for col in 0..=span {
            lines.push(walk(condition, |i| (row + i) * size + col + i));
        }
    }

    for row in 0..=span {
        for col in (condition - 1..size).rev() {
            lines.push(walk(condition, |i| (row + i) * size + col - i));
        }
    }

    lines
}

fn walk(condition: usize, index: impl Fn(usize) -> usize) -> Line {
    Line((0..condition).map(index).collect())
}

/// Number of candidate lines for a board, in closed form.
///
/// `2·size·(size−condition+1) + 2·(size−condition+1)²`
pub fn line_count(size: usize, condition: usize) -> usize {
    if condition == 0 || condition > size {
        return 0;
    }
    let fits = size - condition + 1;
    2 * size * fits + 2 * fits * fits
}
