//! Save format shared by the preview and the exported game.
//!
//! Cells are stored as the players' symbols (or `null`) so that a save
//! written by the exported page's `localStorage` and one written by the
//! terminal preview are the same JSON document.

use crate::achievements::PerSeat;
use crate::config::MatchConfig;
use crate::error::RestoreError;
use crate::types::{Board, Cell};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// `localStorage` key the exported game saves under.
pub const STORAGE_KEY: &str = "tictactoe-saved-game";

/// One history entry as saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedStep {
    /// Cells as symbols, `null` for empty.
    pub board: Vec<Option<String>>,
    /// Whether player 1 moves next.
    pub is_player1_next: bool,
}

/// Full match state as saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedMatch {
    /// Cells being viewed.
    pub current_board: Vec<Option<String>>,
    /// Whether player 1 moves next.
    pub is_player1_next: bool,
    /// Winner's symbol.
    pub game_winner: Option<String>,
    /// Highlighted winning line.
    pub winning_line: Option<Vec<usize>>,
    /// Every snapshot, root first.
    pub move_history: Vec<SavedStep>,
    /// Index of the snapshot being viewed.
    pub current_step: usize,
    /// Player 1's cumulative score.
    pub player1_score: u32,
    /// Player 2's cumulative score.
    pub player2_score: u32,
    /// Moves in the current match.
    pub move_count: usize,
    /// Whether a first move has been made.
    pub game_started: bool,
    /// Fewest moves in any recorded win.
    pub fastest_win: Option<usize>,
    /// Unlocked achievements in order.
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Consecutive wins per player.
    #[serde(default)]
    pub consecutive_wins: PerSeat,
    /// Page title, when saved by the exported game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_title: Option<String>,
}

impl SavedMatch {
    /// Serializes to the JSON stored under [`STORAGE_KEY`].
    pub fn to_json(&self) -> String {
        // A struct of strings, numbers and vectors always serializes.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Parses a saved document.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Malformed`] for anything that is not save JSON.
    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        serde_json::from_str(json).map_err(|e| RestoreError::Malformed(e.to_string()))
    }
}

/// Converts a board to saved cells.
pub fn encode_board(board: &Board, config: &MatchConfig) -> Vec<Option<String>> {
    board
        .cells()
        .iter()
        .map(|cell| cell.seat().map(|seat| config.player(seat).symbol().clone()))
        .collect()
}

/// Converts saved cells back to a board of the configured size.
///
/// # Errors
///
/// Fails when the length is wrong or a symbol belongs to neither player.
pub fn decode_board(cells: &[Option<String>], config: &MatchConfig) -> Result<Board, RestoreError> {
    if cells.len() != config.cell_count() {
        return Err(RestoreError::BoardSize {
            expected: config.cell_count(),
            found: cells.len(),
        });
    }
    let decoded = cells
        .iter()
        .map(|cell| match cell {
            None => Ok(Cell::Empty),
            Some(symbol) => config
                .seat_for_symbol(symbol)
                .map(Cell::Taken)
                .ok_or_else(|| RestoreError::UnknownSymbol(symbol.clone())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Board::from_cells(*config.size(), decoded).ok_or(RestoreError::BoardSize {
        expected: config.cell_count(),
        found: cells.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Seat;

    #[test]
    fn test_board_codec_uses_symbols() {
        let config = MatchConfig::classic();
        let mut board = Board::new(3);
        board.place(0, Seat::First);
        board.place(4, Seat::Second);

        let encoded = encode_board(&board, &config);
        assert_eq!(encoded[0].as_deref(), Some("X"));
        assert_eq!(encoded[4].as_deref(), Some("O"));
        assert_eq!(encoded[1], None);
        assert_eq!(decode_board(&encoded, &config), Ok(board));
    }

    #[test]
    fn test_decode_rejects_foreign_symbol() {
        let config = MatchConfig::classic();
        let mut cells = vec![None; 9];
        cells[2] = Some("Z".to_string());
        assert_eq!(
            decode_board(&cells, &config),
            Err(RestoreError::UnknownSymbol("Z".to_string()))
        );
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let config = MatchConfig::classic();
        assert!(matches!(
            decode_board(&[None, None], &config),
            Err(RestoreError::BoardSize { expected: 9, found: 2 })
        ));
    }

    #[test]
    fn test_exported_page_document_parses() {
        // Shape written by the exported page's saveGame().
        let json = r#"{
            "currentBoard": ["X", null, null, null, "O", null, null, null, null],
            "isPlayer1Next": true,
            "gameWinner": null,
            "winningLine": null,
            "moveHistory": [
                {"board": [null,null,null,null,null,null,null,null,null], "isPlayer1Next": true},
                {"board": ["X",null,null,null,null,null,null,null,null], "isPlayer1Next": false},
                {"board": ["X",null,null,null,"O",null,null,null,null], "isPlayer1Next": true}
            ],
            "currentStep": 2,
            "player1Score": 1,
            "player2Score": 0,
            "moveCount": 2,
            "gameStarted": true,
            "fastestWin": null,
            "achievements": [],
            "consecutiveWins": {"player1": 1, "player2": 0},
            "gameTitle": "Backyard Cup"
        }"#;
        let saved = SavedMatch::from_json(json).expect("valid save");
        assert_eq!(saved.move_history.len(), 3);
        assert_eq!(saved.consecutive_wins.first, 1);
        assert_eq!(saved.game_title.as_deref(), Some("Backyard Cup"));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            SavedMatch::from_json("{not json"),
            Err(RestoreError::Malformed(_))
        ));
    }
}
