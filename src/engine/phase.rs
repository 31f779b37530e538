//! Timer phase

use std::fmt;

use serde::{Deserialize, Serialize};

/// The phase the timer is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Sitting,
    Standing,
}

impl Phase {
    /// The phase entered when this one completes.
    ///
    /// Idle has no successor and maps to itself.
    pub fn next(self) -> Self {
        match self {
            Phase::Sitting => Phase::Standing,
            Phase::Standing => Phase::Sitting,
            Phase::Idle => Phase::Idle,
        }
    }

    /// Check if this is one of the two running phases
    pub fn is_active(self) -> bool {
        !matches!(self, Phase::Idle)
    }

    /// Lower-case form used in sentences ("Your sitting session has ended.")
    pub fn noun(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Sitting => "sitting",
            Phase::Standing => "standing",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Sitting => "Sitting",
            Phase::Standing => "Standing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_alternates_active_phases() {
        assert_eq!(Phase::Sitting.next(), Phase::Standing);
        assert_eq!(Phase::Standing.next(), Phase::Sitting);
        assert_eq!(Phase::Idle.next(), Phase::Idle);
    }

    #[test]
    fn serializes_with_display_names() {
        assert_eq!(serde_json::to_string(&Phase::Standing).unwrap(), "\"Standing\"");
        assert_eq!(Phase::Sitting.to_string(), "Sitting");
        assert_eq!(Phase::Sitting.noun(), "sitting");
    }
}
