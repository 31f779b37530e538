//! Notification tone synthesis and playback
//!
//! The cue is a short fixed-frequency sine with a fast attack and a linear
//! fade, rendered as an in-memory WAV and piped to an external player.

use std::{f64::consts::PI, process::Stdio};

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::error::NotifyError;

/// Parameters of the notification tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    pub duration_secs: f64,
    pub attack_secs: f64,
    pub sample_rate: u32,
}

impl Default for Tone {
    /// A4 for one second
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            duration_secs: 1.0,
            attack_secs: 0.01,
            sample_rate: 44_100,
        }
    }
}

impl Tone {
    pub fn sample_count(&self) -> usize {
        (self.duration_secs * f64::from(self.sample_rate)).round() as usize
    }

    /// Gain at time `t`: 0 -> 1 over the attack, then 1 -> 0 by the end
    pub fn gain_at(&self, t: f64) -> f64 {
        if t <= 0.0 || t >= self.duration_secs {
            0.0
        } else if t < self.attack_secs {
            t / self.attack_secs
        } else {
            (self.duration_secs - t) / (self.duration_secs - self.attack_secs)
        }
    }

    /// Signed 16-bit mono samples
    pub fn samples(&self) -> Vec<i16> {
        let rate = f64::from(self.sample_rate);
        (0..self.sample_count())
            .map(|n| {
                let t = n as f64 / rate;
                let value = (2.0 * PI * self.frequency_hz * t).sin() * self.gain_at(t);
                (value * f64::from(i16::MAX)) as i16
            })
            .collect()
    }

    /// Render as a complete PCM WAV file
    pub fn to_wav(&self) -> Vec<u8> {
        let samples = self.samples();
        let data_len = (samples.len() * 2) as u32;
        let byte_rate = self.sample_rate * 2;

        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&self.sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes()); // block align
        wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            wav.extend_from_slice(&sample.to_le_bytes());
        }
        wav
    }
}

/// External program that plays a WAV read from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToneCommand {
    /// Split a whitespace-separated command line such as `aplay -q -`.
    ///
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

impl Default for ToneCommand {
    /// ALSA's `aplay`, quiet, reading from stdin
    fn default() -> Self {
        Self {
            program: "aplay".to_string(),
            args: vec!["-q".to_string(), "-".to_string()],
        }
    }
}

/// Play `tone` by piping it as a WAV into `command`
pub async fn play_tone(command: &ToneCommand, tone: &Tone) -> Result<(), NotifyError> {
    let player = &command.program;
    debug!("Playing {}Hz tone via {}", tone.frequency_hz, player);

    let mut child = Command::new(player)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| NotifyError::Sound(format!("Failed to execute {}: {}", player, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(&tone.to_wav())
            .await
            .map_err(|e| NotifyError::Sound(format!("Failed to write to {}: {}", player, e)))?;
        // Close stdin so the player sees end of input
        drop(stdin);
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| NotifyError::Sound(format!("Failed to wait for {}: {}", player, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(NotifyError::Sound(format!("{} failed: {}", player, stderr)));
    }

    Ok(())
}
