//! Preference persistence background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{engine::TimerConfig, services::PreferenceStore};

/// Background task that saves queued configs in the order they were queued.
///
/// Each save runs on the blocking pool; a failure is logged and the next
/// config is still written.
pub async fn preference_writer_task(
    mut persist_rx: mpsc::UnboundedReceiver<TimerConfig>,
    store: Arc<dyn PreferenceStore>,
) {
    info!("Starting preference writer task");

    while let Some(config) = persist_rx.recv().await {
        debug!(
            "Persisting preferences sit={}min stand={}min",
            config.sit_minutes, config.stand_minutes
        );

        let store = Arc::clone(&store);
        match tokio::task::spawn_blocking(move || store.save(&config)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Failed to save preferences: {}", e),
            Err(e) => error!("Preference save task failed: {}", e),
        }
    }

    info!("Persist queue closed, stopping preference writer task");
}
