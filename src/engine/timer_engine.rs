//! Sit/stand timer engine
//!
//! The engine has no clock of its own. The host calls `tick()` once per
//! elapsed second while a cycle is running, and every other operation in
//! response to a user action.
//!
//! ```text
//! Idle --start/restart--> Sitting --tick(0)--> Standing --tick(0)--> Sitting ...
//!   ^                                                                  |
//!   +-------------------------------- stop ----------------------------+
//! ```
//!
//! `paused` is a flag layered on Sitting/Standing, not a phase of its own.
//! Operations whose preconditions do not hold are no-ops and return `None`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{Phase, TimerConfig, TimerEvent};

/// Point-in-time view of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
    pub paused: bool,
}

impl TimerSnapshot {
    /// Snapshot of a timer that has never been started
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            running: false,
            paused: false,
        }
    }

    /// Check if ticks currently count down
    pub fn is_counting(&self) -> bool {
        self.running && !self.paused
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

/// Core timer engine
#[derive(Debug, Clone)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: Phase,
    remaining_seconds: u64,
    paused: bool,
}

impl TimerEngine {
    /// Create an idle engine with the given interval lengths
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            remaining_seconds: 0,
            paused: false,
        }
    }

    // Queries

    /// Current interval lengths
    pub fn config(&self) -> TimerConfig {
        self.config
    }

    /// Current phase, Idle when not running
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Running is derived from the phase, so Idle and running can never coexist.
    pub fn is_running(&self) -> bool {
        self.phase.is_active()
    }

    /// Check if the countdown is frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            running: self.is_running(),
            paused: self.paused,
        }
    }

    // Commands

    /// Replace the interval lengths.
    ///
    /// The phase in progress keeps its remaining time; the new lengths apply
    /// from the next phase entered or the next start.
    pub fn configure(&mut self, config: TimerConfig) -> TimerEvent {
        debug!(
            "Configured sit={}min stand={}min",
            config.sit_minutes, config.stand_minutes
        );
        self.config = config;
        TimerEvent::Configured { config }
    }

    /// Begin a cycle with a full sitting phase.
    ///
    /// Calling this while already running replaces the current cycle and
    /// reports it as a restart.
    pub fn start(&mut self) -> TimerEvent {
        if self.is_running() {
            return self.restart();
        }
        self.enter_sitting();
        info!("Timer started: sitting for {}s", self.remaining_seconds);
        TimerEvent::Started {
            config: self.config,
        }
    }

    /// Stop and start again in one step, with no intermediate Idle state.
    pub fn restart(&mut self) -> TimerEvent {
        self.enter_sitting();
        info!("Timer restarted: sitting for {}s", self.remaining_seconds);
        TimerEvent::Restarted {
            config: self.config,
        }
    }

    /// Freeze the countdown of a running phase
    pub fn pause(&mut self) -> Option<TimerEvent> {
        if !self.is_running() || self.paused {
            return None;
        }
        self.paused = true;
        info!("Timer paused in {} with {}s left", self.phase, self.remaining_seconds);
        Some(TimerEvent::Paused {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Continue a paused countdown
    pub fn resume(&mut self) -> Option<TimerEvent> {
        if !self.is_running() || !self.paused {
            return None;
        }
        self.paused = false;
        info!("Timer resumed in {} with {}s left", self.phase, self.remaining_seconds);
        Some(TimerEvent::Resumed {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Return to Idle. Stopping an idle timer changes nothing.
    pub fn stop(&mut self) -> Option<TimerEvent> {
        if !self.is_running() {
            return None;
        }
        let phase = self.phase;
        self.phase = Phase::Idle;
        self.remaining_seconds = 0;
        self.paused = false;
        info!("Timer stopped during {}", phase);
        Some(TimerEvent::Stopped { phase })
    }

    /// Advance by one elapsed second.
    ///
    /// Counts down while more than one second remains. The tick that empties
    /// the phase also flips to the other phase at its full duration, so an
    /// N-second phase completes after exactly N ticks and a zero-length
    /// phase is left on the very next tick.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running() || self.paused {
            return None;
        }

        if self.remaining_seconds > 1 {
            self.remaining_seconds -= 1;
            trace!("{} tick, {}s left", self.phase, self.remaining_seconds);
            return None;
        }

        let completed = self.phase;
        let entered = completed.next();
        self.phase = entered;
        self.remaining_seconds = self.config.seconds_for(entered);
        info!(
            "{} completed, entering {} for {}s",
            completed, entered, self.remaining_seconds
        );
        Some(TimerEvent::PhaseCompleted {
            completed,
            entered,
            remaining_seconds: self.remaining_seconds,
        })
    }

    fn enter_sitting(&mut self) {
        self.phase = Phase::Sitting;
        self.remaining_seconds = self.config.sit_seconds();
        self.paused = false;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
