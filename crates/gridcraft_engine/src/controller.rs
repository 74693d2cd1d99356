//! Match controller: the stateful wrapper around the board evaluator.
//!
//! Every external event (a cell pick, a timer tick, a history jump) runs to
//! completion here before the next one is handled. The controller owns the
//! tick scheduler and starts or cancels it only when the match enters or
//! leaves the live, undecided state.

use crate::achievements::{
    Achievements, STREAK_TARGET, Scores, Streaks, lightning_text, lightning_threshold, streak_text,
};
use crate::config::MatchConfig;
use crate::effects::{Effects, SilentEffects, SoundKind};
use crate::error::RestoreError;
use crate::history::{History, Snapshot};
use crate::lines::Line;
use crate::messages::{ACHIEVEMENT_UNLOCKED, DRAW, NEXT_PLAYER, TIME_UP, WINNER, fill};
use crate::rules::{Verdict, evaluate};
use crate::save::{SavedMatch, SavedStep, decode_board, encode_board};
use crate::timer::{Countdown, ManualTicks, MoveTimer, TickScheduler};
use crate::types::{Board, Seat};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// Coarse match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    /// No move made (or viewing the root step).
    NotStarted,
    /// Moves are being made.
    InProgress,
    /// A seat completed a line.
    Won(Seat),
    /// Board full without a line.
    Drawn,
}

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MoveRejection {
    /// Index is not on the board.
    #[display("Cell is off the board")]
    OutOfBounds,
    /// Cell already holds a mark.
    #[display("Cell is already taken")]
    Occupied,
    /// The match has a result.
    #[display("Match is already decided")]
    Decided,
    /// An earlier history step is being viewed.
    #[display("Viewing an earlier move")]
    ViewingHistory,
}

/// Result of [`MatchController::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// Ignored; state unchanged.
    Rejected(MoveRejection),
    /// Placed; `next` moves now.
    Continued {
        /// Seat to move.
        next: Seat,
    },
    /// Placed and won.
    Won {
        /// Winning seat.
        seat: Seat,
        /// Moves it took.
        moves: usize,
    },
    /// Placed and filled the board.
    Drawn,
}

/// Result of [`MatchController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// Timer not running.
    Idle,
    /// One second counted down.
    Counted {
        /// Seconds left.
        remaining: u32,
    },
    /// The turn was forfeited.
    Expired {
        /// Seat now to move.
        next: Seat,
    },
}

/// Owns all state for one interactive match session.
#[derive(Debug, Getters)]
pub struct MatchController {
    config: MatchConfig,
    board: Board,
    to_move: Seat,
    winner: Option<Seat>,
    winning_line: Option<Line>,
    #[getter(skip)]
    drawn: bool,
    history: History,
    move_count: usize,
    #[getter(skip)]
    started: bool,
    scores: Scores,
    streaks: Streaks,
    fastest_win: Option<usize>,
    achievements: Achievements,
    timer: MoveTimer,
    #[getter(skip)]
    timed_out: bool,
    #[getter(skip)]
    scheduler: Box<dyn TickScheduler>,
    #[getter(skip)]
    effects: Box<dyn Effects>,
}

impl MatchController {
    /// Fresh match with manual ticks and silent effects.
    #[instrument(skip(config), fields(size = config.size(), condition = config.condition()))]
    pub fn new(config: MatchConfig) -> Self {
        info!("Creating match controller");
        let size = *config.size();
        Self {
            board: Board::new(size),
            to_move: Seat::First,
            winner: None,
            winning_line: None,
            drawn: false,
            history: History::new(size),
            move_count: 0,
            started: false,
            scores: Scores::default(),
            streaks: Streaks::default(),
            fastest_win: None,
            achievements: Achievements::default(),
            timer: MoveTimer::new(*config.timer()),
            timed_out: false,
            scheduler: Box::new(ManualTicks::default()),
            effects: Box::new(SilentEffects),
            config,
        }
    }

    /// Replaces the tick scheduler.
    pub fn with_scheduler(mut self, scheduler: Box<dyn TickScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Replaces the effects sink.
    pub fn with_effects(mut self, effects: Box<dyn Effects>) -> Self {
        self.effects = effects;
        self
    }

    /// Seeds cumulative scores (e.g. from persisted preferences).
    pub fn with_scores(mut self, scores: Scores) -> Self {
        self.scores = scores;
        self
    }

    /// Seeds already-unlocked achievements.
    pub fn with_achievements(mut self, achievements: Achievements) -> Self {
        self.achievements = achievements;
        self
    }

    /// The scheduler driving ticks.
    pub fn scheduler(&self) -> &dyn TickScheduler {
        self.scheduler.as_ref()
    }

    /// Coarse state of the match being viewed.
    pub fn phase(&self) -> MatchPhase {
        match (self.winner, self.drawn, self.started) {
            (Some(seat), _, _) => MatchPhase::Won(seat),
            (None, true, _) => MatchPhase::Drawn,
            (None, false, false) => MatchPhase::NotStarted,
            (None, false, true) => MatchPhase::InProgress,
        }
    }

    /// True once won or drawn.
    pub fn is_decided(&self) -> bool {
        self.winner.is_some() || self.drawn
    }

    /// True when a first move has been made.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// One-line status for display.
    pub fn status_text(&self) -> String {
        let named = |template: &str, seat: Seat| {
            fill(template, "name", self.config.player(seat).name())
        };
        match self.phase() {
            MatchPhase::Won(seat) => named(WINNER, seat),
            MatchPhase::Drawn => DRAW.to_string(),
            _ if self.timed_out => named(TIME_UP, self.to_move),
            _ => named(NEXT_PLAYER, self.to_move),
        }
    }

    /// Symbol drawn in cell `index`, if occupied.
    pub fn symbol_at(&self, index: usize) -> Option<&str> {
        self.board
            .get(index)
            .and_then(|c| c.seat())
            .map(|seat| self.config.player(seat).symbol().as_str())
    }

    /// Places the current seat's mark at `index`.
    ///
    /// Occupied cells, decided matches, off-board indices and moves made
    /// while viewing an earlier step are ignored.
    #[instrument(skip(self), fields(seat = %self.to_move, step = self.history.current_step()))]
    pub fn apply_move(&mut self, index: usize) -> MoveOutcome {
        if let Some(reason) = self.rejection(index) {
            debug!(%reason, "Move rejected");
            return MoveOutcome::Rejected(reason);
        }

        let seat = self.to_move;
        self.started = true;
        self.timed_out = false;
        self.board.place(index, seat);
        self.move_count += 1;
        self.sound(SoundKind::Move);
        self.timer.refill();

        let size = *self.config.size();
        let outcome = match evaluate(self.board.cells(), size, *self.config.condition()) {
            Verdict::Win { seat, line } => self.settle_win(seat, line),
            Verdict::Draw => self.settle_draw(),
            Verdict::Ongoing => {
                self.to_move = seat.opponent();
                self.arm_timer();
                MoveOutcome::Continued { next: self.to_move }
            }
        };

        self.history
            .record(Snapshot::new(self.board.clone(), self.to_move));
        debug!(moves = self.move_count, ?outcome, "Move applied");
        outcome
    }

    fn rejection(&self, index: usize) -> Option<MoveRejection> {
        if index >= self.config.cell_count() {
            Some(MoveRejection::OutOfBounds)
        } else if self.is_decided() {
            Some(MoveRejection::Decided)
        } else if !self.history.is_at_latest() {
            Some(MoveRejection::ViewingHistory)
        } else if !self.board.is_empty(index) {
            Some(MoveRejection::Occupied)
        } else {
            None
        }
    }

    fn settle_win(&mut self, seat: Seat, line: Line) -> MoveOutcome {
        let moves = self.move_count;
        info!(%seat, moves, line = ?line.indices(), "Match won");
        self.winner = Some(seat);
        self.winning_line = Some(line);

        *self.scores.get_mut(seat) += 1;
        *self.streaks.get_mut(seat) += 1;
        *self.streaks.get_mut(seat.opponent()) = 0;

        if self.streaks.get(seat) == STREAK_TARGET {
            let text = streak_text(self.config.player(seat).name());
            self.unlock(text);
        }

        if self.fastest_win.is_none_or(|fastest| moves < fastest) {
            self.fastest_win = Some(moves);
            if moves <= lightning_threshold(*self.config.size()) {
                self.unlock(lightning_text(moves));
            }
        }

        self.sound(SoundKind::Win);
        if *self.config.animations() {
            if let Err(e) = self.effects.celebrate() {
                warn!(error = %e, "Celebration failed");
            }
        }
        self.halt_timer();
        MoveOutcome::Won { seat, moves }
    }

    fn settle_draw(&mut self) -> MoveOutcome {
        info!(moves = self.move_count, "Match drawn");
        self.drawn = true;
        self.streaks = Streaks::default();
        self.sound(SoundKind::Draw);
        self.halt_timer();
        MoveOutcome::Drawn
    }

    /// Steps the view back one snapshot. Returns false at the root.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        match self.history.current_step().checked_sub(1) {
            Some(step) => self.jump_to_step(step),
            None => false,
        }
    }

    /// Views history snapshot `step`, re-deriving the result from its board.
    ///
    /// History is kept; only the view moves. Returns false when out of range.
    #[instrument(skip(self))]
    pub fn jump_to_step(&mut self, step: usize) -> bool {
        let Some(snapshot) = self.history.jump(step).cloned() else {
            debug!(latest = self.history.latest_step(), "Step out of range");
            return false;
        };

        self.board = snapshot.board().clone();
        self.to_move = *snapshot.to_move();
        self.move_count = step;
        self.timed_out = false;
        self.winner = None;
        self.winning_line = None;
        self.drawn = false;

        if step == 0 {
            self.started = false;
            self.halt_timer();
            return true;
        }

        self.started = true;
        match evaluate(
            self.board.cells(),
            *self.config.size(),
            *self.config.condition(),
        ) {
            Verdict::Win { seat, line } => {
                self.winner = Some(seat);
                self.winning_line = Some(line);
            }
            Verdict::Draw => self.drawn = true,
            Verdict::Ongoing => {}
        }

        if self.history.is_at_latest() && !self.is_decided() {
            self.arm_timer();
        } else {
            self.halt_timer();
        }
        true
    }

    /// Clears the board and history for a new match.
    ///
    /// Scores, streaks, fastest win and achievements carry over.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Resetting match");
        let size = *self.config.size();
        self.board = Board::new(size);
        self.to_move = Seat::First;
        self.winner = None;
        self.winning_line = None;
        self.drawn = false;
        self.history.reset(size);
        self.move_count = 0;
        self.started = false;
        self.timed_out = false;
        self.halt_timer();
    }

    /// Swaps in a new configuration and resets the match.
    #[instrument(skip(self, config), fields(size = config.size(), condition = config.condition()))]
    pub fn reconfigure(&mut self, config: MatchConfig) {
        self.timer = MoveTimer::new(*config.timer());
        self.config = config;
        self.reset();
    }

    /// Zeroes both cumulative scores.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        self.scores = Scores::default();
    }

    /// Zeroes streaks, forgets the fastest win and every achievement.
    #[instrument(skip(self))]
    pub fn reset_statistics(&mut self) {
        self.streaks = Streaks::default();
        self.fastest_win = None;
        self.achievements.clear();
    }

    /// Advances the move timer by one second.
    ///
    /// At expiry the turn passes to the other seat; this is not a move and
    /// never ends the match.
    #[instrument(skip(self), level = "trace")]
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_decided() {
            return TickOutcome::Idle;
        }
        match self.timer.step() {
            None => TickOutcome::Idle,
            Some(Countdown::Decremented(remaining)) => TickOutcome::Counted { remaining },
            Some(Countdown::Expired) => {
                self.to_move = self.to_move.opponent();
                self.timed_out = true;
                self.history.set_latest_to_move(self.to_move);
                info!(next = %self.to_move, "Turn timed out");
                self.sound(SoundKind::TimerExpiry);
                TickOutcome::Expired { next: self.to_move }
            }
        }
    }

    /// Pauses or resumes the countdown of a live match.
    ///
    /// Returns whether the timer is running afterwards.
    #[instrument(skip(self))]
    pub fn toggle_timer(&mut self) -> bool {
        let live = self.started && !self.is_decided() && self.history.is_at_latest();
        if !(*self.timer.enabled() && live) {
            return false;
        }
        if *self.timer.active() {
            self.timer.pause();
            self.scheduler.cancel();
            false
        } else {
            self.timer.resume();
            self.scheduler.start();
            true
        }
    }

    /// Captures the full match state in the shared save format.
    #[instrument(skip(self))]
    pub fn save(&self, title: Option<String>) -> SavedMatch {
        let symbol = |seat: Seat| self.config.player(seat).symbol().clone();
        SavedMatch {
            current_board: encode_board(&self.board, &self.config),
            is_player1_next: self.to_move == Seat::First,
            game_winner: self.winner.map(symbol),
            winning_line: self.winning_line.clone().map(Vec::from),
            move_history: self
                .history
                .snapshots()
                .iter()
                .map(|s| SavedStep {
                    board: encode_board(s.board(), &self.config),
                    is_player1_next: *s.to_move() == Seat::First,
                })
                .collect(),
            current_step: self.history.current_step(),
            player1_score: self.scores.first,
            player2_score: self.scores.second,
            move_count: self.move_count,
            game_started: self.started,
            fastest_win: self.fastest_win,
            achievements: self.achievements.texts().to_vec(),
            consecutive_wins: self.streaks,
            game_title: title,
        }
    }

    /// Replaces the match state with a saved one.
    ///
    /// # Errors
    ///
    /// Leaves the controller untouched and returns the reason when the save
    /// does not fit the current configuration.
    #[instrument(skip(self, saved), fields(steps = saved.move_history.len()))]
    pub fn restore(&mut self, saved: SavedMatch) -> Result<(), RestoreError> {
        if saved.move_history.is_empty() {
            return Err(RestoreError::EmptyHistory);
        }
        let snapshots = saved
            .move_history
            .iter()
            .map(|step| {
                decode_board(&step.board, &self.config)
                    .map(|board| Snapshot::new(board, seat_from_flag(step.is_player1_next)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if snapshots[0] != Snapshot::root(*self.config.size()) {
            return Err(RestoreError::BadRoot);
        }
        let len = snapshots.len();
        let history = History::from_parts(snapshots, saved.current_step).ok_or(
            RestoreError::StepOutOfRange {
                step: saved.current_step,
                len,
            },
        )?;
        let board = decode_board(&saved.current_board, &self.config)?;
        let winner = saved
            .game_winner
            .as_deref()
            .map(|symbol| {
                self.config
                    .seat_for_symbol(symbol)
                    .ok_or_else(|| RestoreError::UnknownSymbol(symbol.to_string()))
            })
            .transpose()?;

        let verdict = evaluate(board.cells(), *self.config.size(), *self.config.condition());
        let (derived_winner, derived_line) = match &verdict {
            Verdict::Win { seat, line } => (Some(*seat), Some(line.clone())),
            _ => (None, None),
        };
        let line_agrees = match (&saved.winning_line, &derived_line) {
            (None, _) => true,
            (Some(saved_line), Some(line)) => saved_line.as_slice() == line.indices(),
            (Some(_), None) => false,
        };
        if winner != derived_winner || !line_agrees {
            warn!(?winner, ?derived_winner, "Saved result disagrees with board");
            return Err(RestoreError::ResultMismatch);
        }

        self.drawn = verdict == Verdict::Draw;
        self.board = board;
        self.history = history;
        self.to_move = seat_from_flag(saved.is_player1_next);
        self.winner = derived_winner;
        self.winning_line = derived_line;
        self.move_count = saved.move_count;
        self.started = saved.game_started;
        self.scores = Scores {
            first: saved.player1_score,
            second: saved.player2_score,
        };
        self.streaks = saved.consecutive_wins;
        self.fastest_win = saved.fastest_win;
        self.achievements = Achievements::from_texts(saved.achievements);
        self.timed_out = false;

        self.halt_timer();
        if self.started && !self.is_decided() && self.history.is_at_latest() {
            self.arm_timer();
        }
        info!(step = self.history.current_step(), "Match restored");
        Ok(())
    }

    fn unlock(&mut self, text: String) {
        if self.achievements.unlock(text.clone()) {
            info!(achievement = %text, "Achievement unlocked");
            self.sound(SoundKind::Achievement);
            self.effects
                .notify(&fill(ACHIEVEMENT_UNLOCKED, "text", &text));
        }
    }

    fn sound(&mut self, kind: SoundKind) {
        if !*self.config.sound() {
            return;
        }
        if let Err(e) = self.effects.play_sound(kind) {
            warn!(error = %e, sound = %kind, "Sound playback failed");
        }
    }

    fn arm_timer(&mut self) {
        if self.timer.arm() {
            self.scheduler.start();
        }
    }

    fn halt_timer(&mut self) {
        self.timer.halt();
        self.scheduler.cancel();
    }
}

fn seat_from_flag(is_player1_next: bool) -> Seat {
    if is_player1_next {
        Seat::First
    } else {
        Seat::Second
    }
}
