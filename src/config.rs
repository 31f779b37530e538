//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::services::{DesktopNotifierConfig, ToneCommand};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "sit-stand")]
#[command(about = "Alternate between sitting and standing with timed reminders")]
#[command(version)]
pub struct Config {
    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the sit/stand interval preferences
    #[arg(long, default_value = "preferences.json")]
    pub preferences: PathBuf,

    /// Keep preferences in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Append every shown notification to this file
    #[arg(long, default_value = "notification_log.txt")]
    pub notification_log: PathBuf,

    /// Do not write the notification log
    #[arg(long)]
    pub no_notification_log: bool,

    /// Do not play the notification tone
    #[arg(long)]
    pub no_sound: bool,

    /// Command that plays the tone, fed a WAV on stdin (e.g. "paplay")
    #[arg(long, default_value = "aplay -q -")]
    pub tone_player: String,

    /// Do not raise desktop notifications
    #[arg(long)]
    pub no_desktop_notifications: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Notifier settings derived from the flags
    pub fn notifier(&self) -> DesktopNotifierConfig {
        DesktopNotifierConfig {
            tone_player: if self.no_sound {
                None
            } else {
                ToneCommand::parse(&self.tone_player)
            },
            log_path: (!self.no_notification_log).then(|| self.notification_log.clone()),
            show_desktop: !self.no_desktop_notifications,
            ..Default::default()
        }
    }
}
