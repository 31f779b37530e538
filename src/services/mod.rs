//! Collaborator services module
//!
//! The side-effecting pieces the timer engine relies on but never calls
//! directly: preference persistence and phase notifications.

pub mod notifier;
pub mod preferences;
pub mod tone;

// Re-export main types
pub use notifier::{DesktopNotifier, DesktopNotifierConfig, Notifier, PhaseNotification};
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use tone::{play_tone, Tone, ToneCommand};
