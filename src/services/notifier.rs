//! Phase-completion notifications

use std::{fs::OpenOptions, io::Write, path::PathBuf};

use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::tone::{play_tone, Tone, ToneCommand};
use crate::{engine::Phase, error::NotifyError};

/// Title and body shown when a phase runs out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseNotification {
    pub title: String,
    pub body: String,
}

impl PhaseNotification {
    /// Build the notification for the phase that just completed
    pub fn for_completed(completed: Phase) -> Self {
        let title = match completed {
            Phase::Sitting => "Time to Stand!",
            _ => "Time to Sit!",
        };
        Self {
            title: title.to_string(),
            body: format!("Your {} session has ended.", completed.noun()),
        }
    }
}

/// Delivers a notification to the user. Failures are reported, never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &PhaseNotification) -> Result<(), NotifyError>;
}

/// Desktop notifier settings
#[derive(Debug, Clone)]
pub struct DesktopNotifierConfig {
    /// Player fed the tone on stdin; `None` disables sound
    pub tone_player: Option<ToneCommand>,
    /// Append-only audit log of shown notifications
    pub log_path: Option<PathBuf>,
    pub show_desktop: bool,
    pub app_name: String,
}

impl Default for DesktopNotifierConfig {
    fn default() -> Self {
        Self {
            tone_player: Some(ToneCommand::default()),
            log_path: None,
            show_desktop: true,
            app_name: "sit-stand".to_string(),
        }
    }
}

/// Plays the tone, logs the notification and raises a desktop alert
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    config: DesktopNotifierConfig,
    tone: Tone,
}

impl DesktopNotifier {
    pub fn new(config: DesktopNotifierConfig) -> Self {
        Self {
            config,
            tone: Tone::default(),
        }
    }

    fn append_log(&self, notification: &PhaseNotification) -> Result<(), NotifyError> {
        let Some(path) = &self.config.log_path else {
            return Ok(());
        };

        let entry = format!(
            "Notification shown at: {} - Title: {}, Body: {}\n",
            Local::now(),
            notification.title,
            notification.body
        );
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())?;
        debug!("Notification logged to {}", path.display());
        Ok(())
    }

    async fn show_desktop(&self, notification: &PhaseNotification) -> Result<(), NotifyError> {
        let app_name = self.config.app_name.clone();
        let PhaseNotification { title, body } = notification.clone();

        // notify-rust blocks on the session bus
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&body)
                .show()
                .map(|_| ())
                .map_err(|e| NotifyError::Display(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Display(format!("Notification task failed: {}", e)))?
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: &PhaseNotification) -> Result<(), NotifyError> {
        let mut first_error = None;

        if let Some(player) = &self.config.tone_player {
            if let Err(e) = play_tone(player, &self.tone).await {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        if let Err(e) = self.append_log(notification) {
            warn!("{}", e);
            first_error.get_or_insert(e);
        }

        if self.config.show_desktop {
            if let Err(e) = self.show_desktop(notification).await {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Notified: {}", notification.title);
                Ok(())
            }
        }
    }
}
