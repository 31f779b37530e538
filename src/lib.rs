//! Sit/Stand - an interval timer that alternates sitting and standing
//!
//! The timer engine is a pure state machine. Around it sit a per-second
//! ticker, a preference store, a notifier and a small HTTP control surface.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{Phase, TimerConfig, TimerEngine, TimerEvent, TimerSnapshot};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
