//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, warn};

use crate::{
    engine::{TimerConfig, TimerEngine, TimerEvent, TimerSnapshot},
    error::AppError,
    services::PhaseNotification,
};

/// Receiving ends of the side-effect queues, handed to the background tasks
#[derive(Debug)]
pub struct EffectQueues {
    pub persist_rx: mpsc::UnboundedReceiver<TimerConfig>,
    pub notify_rx: mpsc::UnboundedReceiver<PhaseNotification>,
}

/// Owns the single timer engine and fans its events out to the rest of the app
#[derive(Debug)]
pub struct AppState {
    /// The one and only timer
    engine: Mutex<TimerEngine>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Every engine event, for the ticker and stream subscribers
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Latest snapshot after every operation
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Configs waiting to be persisted
    persist_tx: mpsc::UnboundedSender<TimerConfig>,
    /// Notifications waiting to be delivered
    notify_tx: mpsc::UnboundedSender<PhaseNotification>,
}

impl AppState {
    /// Create a new AppState with an idle engine.
    ///
    /// Returns the receiving ends of the persistence and notification queues;
    /// the caller hands them to the background tasks that drain them.
    pub fn new(port: u16, host: String, config: TimerConfig) -> (Self, EffectQueues) {
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, _) = watch::channel(TimerSnapshot::idle());
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let state = Self {
            engine: Mutex::new(TimerEngine::new(config)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            snapshot_tx,
            persist_tx,
            notify_tx,
        };
        (state, EffectQueues { persist_rx, notify_rx })
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimerEngine>, AppError> {
        self.engine
            .lock()
            .map_err(|_| AppError::LockPoisoned("timer engine"))
    }

    /// Run one engine operation and publish what it produced.
    ///
    /// Queueing side effects, broadcasting the event and publishing the
    /// snapshot all happen under the engine lock, so subscribers see events
    /// in the same order the engine applied them. None of them block.
    fn apply<F>(&self, action: &str, op: F) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError>
    where
        F: FnOnce(&mut TimerEngine) -> Option<TimerEvent>,
    {
        let mut engine = self.lock_engine()?;
        let event = op(&mut *engine);
        let snapshot = engine.snapshot();

        if let Some(event) = &event {
            self.dispatch_effects(event);

            // No subscribers is normal before the ticker starts
            if self.event_tx.send(event.clone()).is_err() {
                debug!("No subscribers for {} event", event.name());
            }
        }
        self.snapshot_tx.send_replace(snapshot);
        drop(engine);

        if event.is_some() && action != "tick" {
            self.record_action(action);
        }
        Ok((event, snapshot))
    }

    fn dispatch_effects(&self, event: &TimerEvent) {
        if let Some(config) = event.config_to_persist() {
            if let Err(e) = self.persist_tx.send(config) {
                warn!("Preference writer is gone, not persisting: {:?}", e.0);
            }
        }

        if let TimerEvent::PhaseCompleted { completed, .. } = event {
            let notification = PhaseNotification::for_completed(*completed);
            if let Err(e) = self.notify_tx.send(notification) {
                warn!("Notification dispatcher is gone, dropping: {}", e.0.title);
            }
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Replace the interval lengths
    pub fn configure(&self, config: TimerConfig) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("configure", |engine| Some(engine.configure(config)))
    }

    /// Start a cycle, persisting the current config
    pub fn start(&self) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("start", |engine| Some(engine.start()))
    }

    pub fn pause(&self) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("pause", TimerEngine::pause)
    }

    pub fn resume(&self) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("resume", TimerEngine::resume)
    }

    pub fn stop(&self) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("stop", TimerEngine::stop)
    }

    /// Replace the cycle with a fresh one, persisting the current config
    pub fn restart(&self) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("restart", |engine| Some(engine.restart()))
    }

    /// Advance the timer by one elapsed second
    pub fn tick(&self) -> Result<(Option<TimerEvent>, TimerSnapshot), AppError> {
        self.apply("tick", TimerEngine::tick)
    }

    /// Get current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, AppError> {
        Ok(self.lock_engine()?.snapshot())
    }

    /// Get current interval lengths
    pub fn config(&self) -> Result<TimerConfig, AppError> {
        Ok(self.lock_engine()?.config())
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the latest snapshot
    pub fn watch_snapshot(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last user action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
