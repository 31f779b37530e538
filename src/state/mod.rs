//! State management module
//!
//! Holds the shared application state wrapped around the timer engine.

pub mod app_state;

// Re-export main types
pub use app_state::{AppState, EffectQueues};
