//! Notification delivery background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::services::{Notifier, PhaseNotification};

/// Background task that delivers queued notifications.
///
/// Every notification gets its own task so a slow tone or a stuck desktop
/// bus never holds up the next one. Failures are logged and dropped.
pub async fn notification_dispatcher_task(
    mut notify_rx: mpsc::UnboundedReceiver<PhaseNotification>,
    notifier: Arc<dyn Notifier>,
) {
    info!("Starting notification dispatcher task");

    while let Some(notification) = notify_rx.recv().await {
        debug!("Dispatching notification: {}", notification.title);

        let notifier = Arc::clone(&notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&notification).await {
                warn!("Failed to deliver \"{}\": {}", notification.title, e);
            }
        });
    }

    info!("Notify queue closed, stopping notification dispatcher task");
}
