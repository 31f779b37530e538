//! Events emitted by the timer engine

use serde::{Deserialize, Serialize};

use super::{Phase, TimerConfig};

/// Every state change the engine makes produces one of these.
/// The shell reacts to them; subscribers re-render from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Configured {
        config: TimerConfig,
    },
    /// A cycle began from Idle. `config` is what should be persisted.
    Started {
        config: TimerConfig,
    },
    /// A running cycle was replaced by a fresh one.
    Restarted {
        config: TimerConfig,
    },
    Paused {
        phase: Phase,
        remaining_seconds: u64,
    },
    Resumed {
        phase: Phase,
        remaining_seconds: u64,
    },
    Stopped {
        phase: Phase,
    },
    /// `completed` ran out and `entered` began with its full duration.
    PhaseCompleted {
        completed: Phase,
        entered: Phase,
        remaining_seconds: u64,
    },
}

impl TimerEvent {
    /// Short name, also used as the SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Configured { .. } => "configured",
            TimerEvent::Started { .. } => "started",
            TimerEvent::Restarted { .. } => "restarted",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Stopped { .. } => "stopped",
            TimerEvent::PhaseCompleted { .. } => "phase_completed",
        }
    }

    /// The config to persist, if this event begins a new cycle
    pub fn config_to_persist(&self) -> Option<TimerConfig> {
        match self {
            TimerEvent::Started { config } | TimerEvent::Restarted { config } => Some(*config),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag_matching_name() {
        let event = TimerEvent::PhaseCompleted {
            completed: Phase::Sitting,
            entered: Phase::Standing,
            remaining_seconds: 300,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.name());
        assert_eq!(json["completed"], "Sitting");
        assert_eq!(json["remaining_seconds"], 300);
    }

    #[test]
    fn only_cycle_starts_carry_config_to_persist() {
        let config = TimerConfig::new(10, 2);
        assert_eq!(TimerEvent::Started { config }.config_to_persist(), Some(config));
        assert_eq!(TimerEvent::Restarted { config }.config_to_persist(), Some(config));
        assert_eq!(TimerEvent::Configured { config }.config_to_persist(), None);
        assert_eq!(TimerEvent::Stopped { phase: Phase::Sitting }.config_to_persist(), None);
    }
}
