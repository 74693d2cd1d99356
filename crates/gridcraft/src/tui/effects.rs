//! Terminal rendition of sounds, celebrations and notices.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gridcraft_engine::{EffectError, Effects, SoundKind};
use tracing::{debug, instrument};

/// How long a notice stays on screen.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// How long the win flash lasts.
pub const FLASH_DURATION: Duration = Duration::from_millis(1500);

#[derive(Debug, Default)]
struct BannerState {
    notice: Option<(String, Instant)>,
    flash_until: Option<Instant>,
}

/// Transient notice and flash shared between the effects sink and the screen.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    state: Arc<Mutex<BannerState>>,
}

impl Banner {
    /// Shows `text` for [`NOTICE_DURATION`].
    pub fn show(&self, text: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.notice = Some((text.into(), Instant::now() + NOTICE_DURATION));
        }
    }

    /// Starts the win flash.
    pub fn flash(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.flash_until = Some(Instant::now() + FLASH_DURATION);
        }
    }

    /// Notice still on screen at `now`.
    pub fn notice_at(&self, now: Instant) -> Option<String> {
        let state = self.state.lock().ok()?;
        state
            .notice
            .as_ref()
            .filter(|(_, until)| *until > now)
            .map(|(text, _)| text.clone())
    }

    /// Whether the flash is showing at `now`.
    pub fn flashing_at(&self, now: Instant) -> bool {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.flash_until)
            .is_some_and(|until| until > now)
    }
}

/// Rings the terminal bell and drives the [`Banner`].
#[derive(Debug)]
pub struct TerminalEffects<W: Write + Send + std::fmt::Debug> {
    out: W,
    banner: Banner,
}

impl TerminalEffects<std::io::Stdout> {
    /// Rings on stdout.
    pub fn stdout(banner: Banner) -> Self {
        Self::new(std::io::stdout(), banner)
    }
}

impl<W: Write + Send + std::fmt::Debug> TerminalEffects<W> {
    /// Rings on `out`.
    pub fn new(out: W, banner: Banner) -> Self {
        Self { out, banner }
    }

    /// The writer bells go to.
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write + Send + std::fmt::Debug> Effects for TerminalEffects<W> {
    #[instrument(skip(self))]
    fn play_sound(&mut self, kind: SoundKind) -> Result<(), EffectError> {
        // One bell per event; placing a mark stays quiet.
        if kind == SoundKind::Move {
            return Ok(());
        }
        self.out
            .write_all(b"\x07")
            .and_then(|()| self.out.flush())
            .map_err(|e| EffectError::new(format!("Bell failed: {}", e)))?;
        debug!(%kind, "Rang bell");
        Ok(())
    }

    fn celebrate(&mut self) -> Result<(), EffectError> {
        self.banner.flash();
        Ok(())
    }

    fn notify(&mut self, text: &str) {
        self.banner.show(text);
    }
}
