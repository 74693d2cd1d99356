//! Tests for the match controller: turns, results, history and statistics.

use gridcraft_engine::{
    EffectCall, MatchConfig, MatchController, MatchPhase, MoveOutcome, MoveRejection,
    PlayerProfile, RecordingEffects, Seat, SoundKind, TimerSettings, lightning_text, streak_text,
};

fn config(size: usize, condition: usize) -> MatchConfig {
    MatchConfig::new(
        size,
        condition,
        [
            PlayerProfile::new("Ann".to_string(), "X".to_string()),
            PlayerProfile::new("Bo".to_string(), "O".to_string()),
        ],
        TimerSettings::off(),
        true,
        true,
    )
    .expect("valid config")
}

fn play(game: &mut MatchController, moves: &[usize]) -> MoveOutcome {
    let mut last = MoveOutcome::Rejected(MoveRejection::OutOfBounds);
    for &index in moves {
        last = game.apply_move(index);
    }
    last
}

/// First seat takes the left column on a 3×3 board.
const COLUMN_WIN: [usize; 5] = [0, 1, 3, 4, 6];

/// Ends X O X / X O O / O X X.
const FULL_DRAW: [usize; 9] = [0, 1, 2, 4, 3, 5, 7, 6, 8];

#[test]
fn test_column_win_scores_and_highlights() {
    let mut game = MatchController::new(config(3, 3));
    let outcome = play(&mut game, &COLUMN_WIN);

    assert_eq!(
        outcome,
        MoveOutcome::Won {
            seat: Seat::First,
            moves: 5
        }
    );
    assert_eq!(game.phase(), MatchPhase::Won(Seat::First));
    assert_eq!(
        game.winning_line().as_ref().map(|l| l.indices().to_vec()),
        Some(vec![0, 3, 6])
    );
    assert_eq!(game.scores().first, 1);
    assert_eq!(game.scores().second, 0);
    assert_eq!(*game.fastest_win(), Some(5));
    assert_eq!(game.status_text(), "Winner: Ann");
}

#[test]
fn test_full_board_is_a_draw_and_clears_streaks() {
    let mut game = MatchController::new(config(3, 3));
    play(&mut game, &COLUMN_WIN);
    assert_eq!(game.streaks().first, 1);

    game.reset();
    let outcome = play(&mut game, &FULL_DRAW);

    assert_eq!(outcome, MoveOutcome::Drawn);
    assert_eq!(game.phase(), MatchPhase::Drawn);
    assert_eq!(game.status_text(), "Game ended in a draw!");
    assert_eq!(game.streaks().first, 0);
    assert_eq!(game.streaks().second, 0);
    assert_eq!(game.scores().first, 1, "Draws do not touch scores");
}

#[test]
fn test_turns_alternate_and_status_names_next_player() {
    let mut game = MatchController::new(config(3, 3));
    assert_eq!(game.phase(), MatchPhase::NotStarted);
    assert_eq!(game.status_text(), "Next player: Ann");

    assert_eq!(game.apply_move(4), MoveOutcome::Continued { next: Seat::Second });
    assert_eq!(game.phase(), MatchPhase::InProgress);
    assert_eq!(game.status_text(), "Next player: Bo");
    assert_eq!(game.symbol_at(4), Some("X"));
    assert_eq!(game.symbol_at(0), None);
}

#[test]
fn test_rejected_moves_leave_state_unchanged() {
    let mut game = MatchController::new(config(3, 3));
    game.apply_move(4);

    assert_eq!(
        game.apply_move(4),
        MoveOutcome::Rejected(MoveRejection::Occupied)
    );
    assert_eq!(
        game.apply_move(9),
        MoveOutcome::Rejected(MoveRejection::OutOfBounds)
    );
    assert_eq!(*game.move_count(), 1);
    assert_eq!(*game.to_move(), Seat::Second);

    game.apply_move(0);
    game.undo();
    assert_eq!(
        game.apply_move(8),
        MoveOutcome::Rejected(MoveRejection::ViewingHistory)
    );

    let mut decided = MatchController::new(config(3, 3));
    play(&mut decided, &COLUMN_WIN);
    assert_eq!(
        decided.apply_move(8),
        MoveOutcome::Rejected(MoveRejection::Decided)
    );
    assert_eq!(decided.scores().first, 1);
}

#[test]
fn test_undo_then_redo_restores_identical_state() {
    let mut game = MatchController::new(config(3, 3));
    play(&mut game, &COLUMN_WIN);
    let board = game.board().clone();
    let to_move = *game.to_move();
    let winner = *game.winner();
    let line = game.winning_line().clone();

    assert!(game.undo());
    assert_eq!(*game.winner(), None);
    assert_eq!(game.phase(), MatchPhase::InProgress);

    assert!(game.jump_to_step(5));
    assert_eq!(game.board(), &board);
    assert_eq!(*game.to_move(), to_move);
    assert_eq!(*game.winner(), winner);
    assert_eq!(game.winning_line(), &line);
    assert_eq!(game.scores().first, 1, "Revisiting a win does not score it again");
}

#[test]
fn test_jump_to_root_and_out_of_range() {
    let mut game = MatchController::new(config(3, 3));
    play(&mut game, &[0, 4]);

    assert!(!game.jump_to_step(3));
    assert!(game.jump_to_step(0));
    assert_eq!(game.phase(), MatchPhase::NotStarted);
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.history().len(), 3, "History survives navigation");
    assert!(!game.undo(), "Nothing before the root");
}

#[test]
fn test_reset_keeps_scores_and_clears_board() {
    let mut game = MatchController::new(config(3, 3));
    play(&mut game, &COLUMN_WIN);
    game.reset();

    assert_eq!(game.phase(), MatchPhase::NotStarted);
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.history().len(), 1);
    assert_eq!(*game.to_move(), Seat::First);
    assert_eq!(game.scores().first, 1);

    game.reset_scores();
    assert_eq!(game.scores().first, 0);
}

#[test]
fn test_streak_achievement_unlocks_once() {
    let effects = RecordingEffects::default();
    let mut game = MatchController::new(config(3, 3)).with_effects(Box::new(effects.clone()));

    for _ in 0..4 {
        play(&mut game, &COLUMN_WIN);
        game.reset();
    }

    let expected = streak_text("Ann");
    assert_eq!(game.achievements().texts(), &[expected.clone()]);
    assert_eq!(game.streaks().first, 4);
    let notices: Vec<_> = effects
        .calls()
        .into_iter()
        .filter(|c| matches!(c, EffectCall::Notice(_)))
        .collect();
    assert_eq!(
        notices,
        vec![EffectCall::Notice(format!("Achievement unlocked: {expected}"))]
    );
    let achievement_sounds = effects
        .sounds()
        .into_iter()
        .filter(|s| *s == SoundKind::Achievement)
        .count();
    assert_eq!(achievement_sounds, 1);
}

#[test]
fn test_opponent_win_breaks_streak() {
    let mut game = MatchController::new(config(3, 3));
    play(&mut game, &COLUMN_WIN);
    game.reset();
    play(&mut game, &COLUMN_WIN);
    game.reset();
    // Second seat takes the middle column.
    play(&mut game, &[0, 1, 2, 4, 8, 7]);

    assert_eq!(game.phase(), MatchPhase::Won(Seat::Second));
    assert_eq!(game.streaks().first, 0);
    assert_eq!(game.streaks().second, 1);
    game.reset();
    play(&mut game, &COLUMN_WIN);
    assert!(game.achievements().is_empty());
}

#[test]
fn test_lightning_victory_and_fastest_win_never_regresses() {
    let mut game = MatchController::new(config(4, 3));
    // Five-move row on 4×4: within size + 1.
    play(&mut game, &[0, 4, 1, 5, 2]);
    assert_eq!(*game.fastest_win(), Some(5));
    assert_eq!(game.achievements().texts(), &[lightning_text(5)]);

    game.reset();
    // Seven-move win is slower.
    let outcome = play(&mut game, &[0, 4, 15, 5, 1, 14, 2]);
    assert_eq!(
        outcome,
        MoveOutcome::Won {
            seat: Seat::First,
            moves: 7
        }
    );
    assert_eq!(*game.fastest_win(), Some(5));
    assert_eq!(game.achievements().len(), 1);
}

#[test]
fn test_reset_statistics_forgets_achievements() {
    let mut game = MatchController::new(config(4, 3));
    play(&mut game, &[0, 4, 1, 5, 2]);
    game.reset_statistics();

    assert!(game.achievements().is_empty());
    assert_eq!(*game.fastest_win(), None);
    assert_eq!(game.streaks().first, 0);
    assert_eq!(game.scores().first, 1, "Scores are reset separately");
}

#[test]
fn test_effects_follow_flags_and_failures_are_swallowed() {
    let effects = RecordingEffects::failing();
    let mut game = MatchController::new(config(3, 3)).with_effects(Box::new(effects.clone()));

    let outcome = play(&mut game, &COLUMN_WIN);
    assert!(matches!(outcome, MoveOutcome::Won { .. }));
    assert_eq!(
        effects.sounds(),
        vec![
            SoundKind::Move,
            SoundKind::Move,
            SoundKind::Move,
            SoundKind::Move,
            SoundKind::Move,
            SoundKind::Win
        ]
    );
    assert!(effects.calls().contains(&EffectCall::Celebrate));

    let quiet = MatchConfig::new(
        3,
        3,
        [
            PlayerProfile::new("Ann".to_string(), "X".to_string()),
            PlayerProfile::new("Bo".to_string(), "O".to_string()),
        ],
        TimerSettings::off(),
        false,
        false,
    )
    .expect("valid config");
    let silent = RecordingEffects::default();
    let mut game = MatchController::new(quiet).with_effects(Box::new(silent.clone()));
    play(&mut game, &COLUMN_WIN);
    assert!(silent.calls().is_empty());
}

#[test]
fn test_reconfigure_resets_match_but_keeps_scores() {
    let mut game = MatchController::new(config(3, 3));
    play(&mut game, &COLUMN_WIN);
    game.reconfigure(config(5, 4));

    assert_eq!(game.board().size(), 5);
    assert_eq!(game.board().cells().len(), 25);
    assert_eq!(game.phase(), MatchPhase::NotStarted);
    assert_eq!(game.scores().first, 1);
}
