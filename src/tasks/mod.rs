//! Background tasks module
//!
//! The ticker that drives the timer, and the two queues that carry its side
//! effects out to the collaborators.

pub mod notification_dispatcher;
pub mod preference_writer;
pub mod ticker;

// Re-export main functions
pub use notification_dispatcher::notification_dispatcher_task;
pub use preference_writer::preference_writer_task;
pub use ticker::ticker_task;
