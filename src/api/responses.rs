//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{TimerConfig, TimerSnapshot};

/// Format seconds as `MM:SS`; minutes widen past two digits when needed
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Which controls are available for a given snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableActions {
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
    pub restart: bool,
}

impl AvailableActions {
    pub fn for_snapshot(snapshot: &TimerSnapshot) -> Self {
        Self {
            start: !snapshot.running,
            pause: snapshot.running && !snapshot.paused,
            resume: snapshot.running && snapshot.paused,
            stop: snapshot.running,
            restart: true,
        }
    }
}

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The operation changed the timer
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new("applied", message, timer)
    }

    /// The operation's precondition did not hold; nothing changed
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ignored", message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerSnapshot) -> Self {
        Self::new("error", message, timer)
    }
}

/// Status response with everything a front end needs to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub remaining: String,
    pub remaining_seconds: u64,
    pub running: bool,
    pub paused: bool,
    pub config: TimerConfig,
    pub actions: AvailableActions,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Body of `PUT /preferences`. Fields left out keep their current value.
///
/// Signed so negative input reaches validation instead of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureRequest {
    pub sit_minutes: Option<i64>,
    pub stand_minutes: Option<i64>,
}

impl ConfigureRequest {
    /// Merge onto `current`, rejecting values that are not valid minutes
    pub fn apply_to(&self, current: TimerConfig) -> Result<TimerConfig, String> {
        Ok(TimerConfig {
            sit_minutes: validate_minutes("sit_minutes", self.sit_minutes, current.sit_minutes)?,
            stand_minutes: validate_minutes(
                "stand_minutes",
                self.stand_minutes,
                current.stand_minutes,
            )?,
        })
    }
}

fn validate_minutes(field: &str, value: Option<i64>, current: u32) -> Result<u32, String> {
    match value {
        None => Ok(current),
        Some(v) if v < 0 => Err(format!("{} must not be negative, got {}", field, v)),
        Some(v) => u32::try_from(v).map_err(|_| format!("{} is too large: {}", field, v)),
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
