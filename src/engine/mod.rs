//! Timer engine module
//!
//! Pure sit/stand state machine. Nothing in here performs I/O; callers drive
//! it with `tick()` and react to the `TimerEvent`s it returns.

pub mod events;
pub mod phase;
pub mod timer_config;
pub mod timer_engine;

// Re-export main types
pub use events::TimerEvent;
pub use phase::Phase;
pub use timer_config::TimerConfig;
pub use timer_engine::{TimerEngine, TimerSnapshot};
