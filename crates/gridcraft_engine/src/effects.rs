//! Outbound side effects: sounds, celebration, notices.
//!
//! The controller fires these and moves on. A failing or missing
//! playback path is logged and otherwise ignored.

use crate::EffectError;
use serde::{Deserialize, Serialize};

/// Which sound to play.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SoundKind {
    /// A mark was placed.
    Move,
    /// The match was won.
    Win,
    /// The match was drawn.
    Draw,
    /// A turn ran out of time.
    TimerExpiry,
    /// An achievement was unlocked.
    Achievement,
}

/// Sink for the controller's side effects.
pub trait Effects: std::fmt::Debug + Send {
    /// Plays a sound.
    fn play_sound(&mut self, kind: SoundKind) -> Result<(), EffectError>;

    /// Shows the win celebration.
    fn celebrate(&mut self) -> Result<(), EffectError>;

    /// Shows a transient message.
    fn notify(&mut self, text: &str);
}

/// Discards every effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentEffects;

impl Effects for SilentEffects {
    fn play_sound(&mut self, _kind: SoundKind) -> Result<(), EffectError> {
        Ok(())
    }

    fn celebrate(&mut self) -> Result<(), EffectError> {
        Ok(())
    }

    fn notify(&mut self, _text: &str) {}
}

/// One recorded effect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectCall {
    /// `play_sound`
    Sound(SoundKind),
    /// `celebrate`
    Celebrate,
    /// `notify`
    Notice(String),
}

/// Records calls into a shared log; optionally fails every sound.
#[derive(Debug, Default, Clone)]
pub struct RecordingEffects {
    calls: std::sync::Arc<std::sync::Mutex<Vec<EffectCall>>>,
    fail_sounds: bool,
}

impl RecordingEffects {
    /// Recorder whose sounds always fail.
    pub fn failing() -> Self {
        Self {
            fail_sounds: true,
            ..Self::default()
        }
    }

    /// Snapshot of calls so far.
    pub fn calls(&self) -> Vec<EffectCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Sounds requested so far, in order.
    pub fn sounds(&self) -> Vec<SoundKind> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EffectCall::Sound(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: EffectCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Effects for RecordingEffects {
    fn play_sound(&mut self, kind: SoundKind) -> Result<(), EffectError> {
        self.push(EffectCall::Sound(kind));
        if self.fail_sounds {
            return Err(EffectError::new(format!("no audio device for {kind}")));
        }
        Ok(())
    }

    fn celebrate(&mut self) -> Result<(), EffectError> {
        self.push(EffectCall::Celebrate);
        Ok(())
    }

    fn notify(&mut self, text: &str) {
        self.push(EffectCall::Notice(text.to_string()));
    }
}
