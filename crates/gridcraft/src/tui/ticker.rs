//! Tokio-backed one-second tick scheduler.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gridcraft_engine::TickScheduler;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, instrument, trace};

use super::screen::AppEvent;

/// Sends [`AppEvent::Tick`] on a fixed period while started.
///
/// Every start opens a new generation; ticks carry the generation they were
/// sent under so the receiver can drop ones queued before a cancel.
#[derive(Debug)]
pub struct IntervalTicker {
    events: UnboundedSender<AppEvent>,
    runtime: Handle,
    period: Duration,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// One tick per second on `runtime`.
    #[instrument(skip(events, runtime))]
    pub fn new(events: UnboundedSender<AppEvent>, runtime: Handle) -> Self {
        Self {
            events,
            runtime,
            period: Duration::from_secs(1),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// Overrides the tick period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Shared counter holding the live generation.
    pub fn generation(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.generation)
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl TickScheduler for IntervalTicker {
    #[instrument(skip(self), fields(period_ms = self.period.as_millis() as u64))]
    fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let live = Arc::clone(&self.generation);
        let events = self.events.clone();
        let period = self.period;
        debug!(generation, "Starting tick task");

        self.task = Some(self.runtime.spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                if live.load(Ordering::SeqCst) != generation {
                    break;
                }
                trace!(generation, "Tick");
                if events.send(AppEvent::Tick(generation)).is_err() {
                    break;
                }
            }
        }));
    }

    #[instrument(skip(self))]
    fn cancel(&mut self) {
        if self.task.is_some() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            debug!("Cancelling tick task");
        }
        self.abort();
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.abort();
    }
}
