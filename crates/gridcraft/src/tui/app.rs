//! App controller: the state machine driving the wizard and the preview.

use std::path::PathBuf;

use crossterm::event::{self, Event, KeyEventKind};
use derive_getters::Getters;
use ratatui::{Terminal, backend::Backend};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

use super::screen::{AppEvent, Screen, ScreenTransition};
use super::screens::{PreviewScreen, SettingsScreen};
use crate::PreferenceStore;

/// Screen shown when the app starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum StartScreen {
    /// The settings wizard.
    #[default]
    Settings,
    /// The live preview.
    Preview,
}

/// Active screen in the state machine.
#[derive(Debug)]
enum ActiveScreen {
    Settings(SettingsScreen),
    Preview(PreviewScreen),
}

/// Controller that owns the preference store and drives screen transitions.
///
/// Call [`App::run`] to start the event loop.
#[derive(Debug, Getters)]
pub struct App {
    store: PreferenceStore,
    save_path: PathBuf,
    #[getter(skip)]
    runtime: Handle,
    #[getter(skip)]
    events_tx: UnboundedSender<AppEvent>,
    #[getter(skip)]
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Creates the app; timer tasks are spawned on `runtime`.
    #[instrument(skip(store, runtime))]
    pub fn new(store: PreferenceStore, save_path: PathBuf, runtime: Handle) -> Self {
        info!("Creating App");
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store,
            save_path,
            runtime,
            events_tx,
            events_rx,
        }
    }

    /// Hands the store back after the loop ends.
    pub fn into_store(self) -> PreferenceStore {
        self.store
    }

    /// Runs the event loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns terminal I/O failures.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        start: StartScreen,
    ) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting event loop");

        let mut screen = match start {
            StartScreen::Settings => self.settings_screen(),
            StartScreen::Preview => self.preview_or_settings(),
        };

        loop {
            terminal.draw(|f| match &screen {
                ActiveScreen::Settings(s) => s.render(f, &self.store),
                ActiveScreen::Preview(s) => s.render(f, &self.store),
            })?;

            // Ticks arrive from timer tasks; drain whatever queued since the last frame.
            let mut pending = Vec::new();
            while let Ok(queued) = self.events_rx.try_recv() {
                pending.push(queued);
            }

            // Poll for input with short timeout to keep the loop responsive.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind != KeyEventKind::Release
            {
                pending.push(AppEvent::Key(key));
            }

            for app_event in pending {
                let transition = self.dispatch(&mut screen, app_event);
                screen = match self.apply_transition(transition, screen) {
                    Some(next) => next,
                    None => {
                        info!("App quitting");
                        return Ok(());
                    }
                };
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Delivers one event to the active screen.
    fn dispatch(&mut self, screen: &mut ActiveScreen, app_event: AppEvent) -> ScreenTransition {
        match (screen, app_event) {
            (ActiveScreen::Settings(s), AppEvent::Key(key)) => s.handle_key(key, &mut self.store),
            (ActiveScreen::Preview(s), AppEvent::Key(key)) => s.handle_key(key, &mut self.store),
            (ActiveScreen::Preview(s), AppEvent::Tick(generation)) => {
                s.on_tick(generation);
                ScreenTransition::Stay
            }
            (ActiveScreen::Settings(_), AppEvent::Tick(_)) => ScreenTransition::Stay,
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    #[instrument(skip(self, current))]
    fn apply_transition(
        &mut self,
        transition: ScreenTransition,
        current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        if transition != ScreenTransition::Stay {
            debug!(transition = ?transition, "Applying screen transition");
        }
        match transition {
            ScreenTransition::Stay => Some(current),
            ScreenTransition::GoToSettings => {
                info!("Navigating to Settings");
                Some(self.settings_screen())
            }
            ScreenTransition::GoToPreview => {
                info!("Navigating to Preview");
                Some(self.preview_or_settings())
            }
            ScreenTransition::Quit => None,
        }
    }

    fn settings_screen(&self) -> ActiveScreen {
        ActiveScreen::Settings(SettingsScreen::new(self.store.preferences().clone()))
    }

    fn preview_or_settings(&self) -> ActiveScreen {
        match PreviewScreen::new(
            self.store.preferences(),
            self.events_tx.clone(),
            self.runtime.clone(),
            self.save_path.clone(),
        ) {
            Ok(preview) => ActiveScreen::Preview(preview),
            Err(e) => {
                warn!(error = %e, "Preferences are not playable, opening settings");
                self.settings_screen()
            }
        }
    }
}
