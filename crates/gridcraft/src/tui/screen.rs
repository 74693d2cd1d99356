//! Screen trait, transitions and events for the TUI state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::PreferenceStore;

/// Input delivered to the active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A key press.
    Key(KeyEvent),
    /// One timer tick, tagged with the scheduler generation that sent it.
    Tick(u64),
}

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`App`](super::App) state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Open the settings wizard.
    GoToSettings,
    /// Save the wizard's preferences and open the live preview.
    GoToPreview,
    /// Exit cleanly.
    Quit,
}

/// Implemented by each screen in the TUI state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
/// The app calls these methods in the event loop.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame, store: &PreferenceStore);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent, store: &mut PreferenceStore) -> ScreenTransition;
}
