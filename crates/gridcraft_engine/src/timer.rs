//! Per-move countdown and the scheduled task that drives it.
//!
//! The countdown itself is plain state. Wall-clock ticks come from a
//! [`TickScheduler`] owned by the match controller, which starts and
//! cancels it only at the transitions that change whether the match is
//! live.

use crate::config::TimerSettings;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A cancellable one-second recurring task.
///
/// Implementations deliver ticks back to the controller by calling
/// [`MatchController::tick`](crate::MatchController::tick) from the event
/// loop; the scheduler itself never touches match state.
pub trait TickScheduler: std::fmt::Debug + Send {
    /// Starts (or keeps) ticking once per second.
    fn start(&mut self);

    /// Stops ticking. Idempotent.
    fn cancel(&mut self);

    /// Whether ticks are currently scheduled.
    fn is_running(&self) -> bool;
}

/// Scheduler that only records whether it should be running.
///
/// Used headless and in tests, where ticks are fed by hand.
#[derive(Debug, Default, Clone)]
pub struct ManualTicks {
    running: bool,
    starts: usize,
    cancels: usize,
}

impl ManualTicks {
    /// How many times `start` was called.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// How many times `cancel` was called.
    pub fn cancels(&self) -> usize {
        self.cancels
    }
}

impl TickScheduler for ManualTicks {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn cancel(&mut self) {
        self.running = false;
        self.cancels += 1;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Countdown state for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MoveTimer {
    enabled: bool,
    duration: u32,
    remaining: u32,
    active: bool,
}

/// What a single countdown step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// One second elapsed.
    Decremented(u32),
    /// The turn ran out; remaining has been refilled.
    Expired,
}

impl MoveTimer {
    /// Inactive timer with a full countdown.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            enabled: *settings.enabled(),
            duration: *settings.seconds(),
            remaining: *settings.seconds(),
            active: false,
        }
    }

    /// Refills the countdown and marks it active. No-op when disabled.
    pub fn arm(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.remaining = self.duration;
        self.active = true;
        true
    }

    /// Stops and refills.
    pub fn halt(&mut self) {
        self.active = false;
        self.remaining = self.duration;
    }

    /// Stops without touching the remaining time.
    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Continues from the remaining time. No-op when disabled.
    pub fn resume(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.active = true;
        true
    }

    /// Refills without changing whether the countdown runs.
    pub fn refill(&mut self) {
        self.remaining = self.duration;
    }

    /// Advances one second.
    ///
    /// A tick that finds time left decrements it; a tick that finds zero
    /// expires the turn and refills. Returns `None` while inactive.
    pub fn step(&mut self) -> Option<Countdown> {
        if !(self.enabled && self.active) {
            return None;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            Some(Countdown::Decremented(self.remaining))
        } else {
            self.remaining = self.duration;
            Some(Countdown::Expired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_timer_never_arms() {
        let mut timer = MoveTimer::new(TimerSettings::off());
        assert!(!timer.arm());
        assert_eq!(timer.step(), None);
    }

    #[test]
    fn test_countdown_expires_after_reaching_zero() {
        let mut timer = MoveTimer::new(TimerSettings::on(2));
        timer.arm();
        assert_eq!(timer.step(), Some(Countdown::Decremented(1)));
        assert_eq!(timer.step(), Some(Countdown::Decremented(0)));
        assert_eq!(timer.step(), Some(Countdown::Expired));
        assert_eq!(*timer.remaining(), 2);
        assert!(*timer.active());
    }

    #[test]
    fn test_pause_keeps_remaining() {
        let mut timer = MoveTimer::new(TimerSettings::on(5));
        timer.arm();
        timer.step();
        timer.pause();
        assert_eq!(timer.step(), None);
        assert_eq!(*timer.remaining(), 4);
        timer.resume();
        assert_eq!(timer.step(), Some(Countdown::Decremented(3)));
    }

    #[test]
    fn test_manual_ticks_tracks_calls() {
        let mut ticks = ManualTicks::default();
        ticks.start();
        ticks.cancel();
        ticks.cancel();
        assert!(!ticks.is_running());
        assert_eq!(ticks.starts(), 1);
        assert_eq!(ticks.cancels(), 2);
    }
}
