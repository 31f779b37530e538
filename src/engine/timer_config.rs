//! Interval configuration

use serde::{Deserialize, Serialize};

use super::Phase;

/// Default sitting interval in minutes
pub const DEFAULT_SIT_MINUTES: u32 = 25;
/// Default standing interval in minutes
pub const DEFAULT_STAND_MINUTES: u32 = 5;

/// Configured length of each phase, in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub sit_minutes: u32,
    pub stand_minutes: u32,
}

impl TimerConfig {
    pub fn new(sit_minutes: u32, stand_minutes: u32) -> Self {
        Self {
            sit_minutes,
            stand_minutes,
        }
    }

    pub fn sit_seconds(&self) -> u64 {
        u64::from(self.sit_minutes) * 60
    }

    pub fn stand_seconds(&self) -> u64 {
        u64::from(self.stand_minutes) * 60
    }

    /// Full duration of `phase` in seconds. Idle has no duration.
    pub fn seconds_for(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Sitting => self.sit_seconds(),
            Phase::Standing => self.stand_seconds(),
            Phase::Idle => 0,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIT_MINUTES, DEFAULT_STAND_MINUTES)
    }
}
