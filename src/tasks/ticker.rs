//! Per-second ticker background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::error::RecvError,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::{
    engine::{TimerEvent, TimerSnapshot},
    state::AppState,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A fresh interval whose first tick lands one full period from now
fn arm() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Re-derive the armed state from a snapshot after events were missed.
///
/// A counting timer keeps an existing interval so the second in progress is
/// not restarted; anything else disarms.
fn resync(interval: &mut Option<Interval>, snapshot: &TimerSnapshot) {
    if !snapshot.is_counting() {
        *interval = None;
    } else if interval.is_none() {
        *interval = Some(arm());
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Background task that drives `AppState::tick` once per second while the
/// timer is counting.
///
/// The interval is created on start, restart and resume, and dropped on
/// pause and stop. Ticks and control events are handled one at a time in
/// this task, so a tick can never run concurrently with another.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task");

    let mut events = state.subscribe();
    let mut interval: Option<Interval> = None;

    loop {
        tokio::select! {
            _ = next_tick(&mut interval) => {
                if let Err(e) = state.tick() {
                    error!("Failed to tick timer: {}", e);
                }
            }

            received = events.recv() => match received {
                Ok(event) => match event {
                    TimerEvent::Started { .. }
                    | TimerEvent::Restarted { .. }
                    | TimerEvent::Resumed { .. } => {
                        debug!("Ticker armed on {}", event.name());
                        interval = Some(arm());
                    }
                    TimerEvent::Paused { .. } | TimerEvent::Stopped { .. } => {
                        debug!("Ticker disarmed on {}", event.name());
                        interval = None;
                    }
                    TimerEvent::Configured { .. } | TimerEvent::PhaseCompleted { .. } => {}
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Ticker missed {} events, resyncing from snapshot", skipped);
                    match state.snapshot() {
                        Ok(snapshot) => resync(&mut interval, &snapshot),
                        Err(e) => error!("Failed to read timer snapshot: {}", e),
                    }
                }
                Err(RecvError::Closed) => {
                    info!("Event channel closed, stopping ticker task");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Phase, TimerConfig};

    async fn spawn_ticker(sit: u32, stand: u32) -> Arc<AppState> {
        let (state, _queues) = AppState::new(0, "127.0.0.1".to_string(), TimerConfig::new(sit, stand));
        let state = Arc::new(state);
        tokio::spawn(ticker_task(Arc::clone(&state)));
        // Let the ticker subscribe before anything happens
        tokio::task::yield_now().await;
        state
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn counts_one_per_second_while_running() {
        let state = spawn_ticker(25, 5).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 0);

        state.start().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1497);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_stop_halt_ticking() {
        let state = spawn_ticker(25, 5).await;
        state.start().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(2500)).await;

        state.pause().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1498);

        state.resume().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1497);

        state.stop().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transitions_through_zero_length_phase() {
        let state = spawn_ticker(0, 1).await;
        state.start().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.phase, Phase::Standing);
        assert_eq!(snapshot.remaining_seconds, 60);
    }

    /// Flood the event channel past its capacity without letting the ticker run
    fn overflow_events(state: &AppState) {
        let config = state.config().unwrap();
        for _ in 0..150 {
            state.configure(config).unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn lagged_ticker_arms_from_snapshot() {
        let state = spawn_ticker(25, 5).await;

        // The Started event is pushed out of the channel before the ticker sees it
        state.start().unwrap();
        overflow_events(&state);
        settle().await;

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1498);
    }

    #[tokio::test(start_paused = true)]
    async fn lagged_ticker_disarms_from_snapshot() {
        let state = spawn_ticker(25, 5).await;
        state.start().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1499);

        state.pause().unwrap();
        overflow_events(&state);
        settle().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1499);
    }

    #[tokio::test(start_paused = true)]
    async fn resync_follows_snapshot() {
        let counting = TimerSnapshot {
            phase: Phase::Standing,
            remaining_seconds: 42,
            running: true,
            paused: false,
        };
        let paused = TimerSnapshot {
            paused: true,
            ..counting
        };

        let mut interval = None;
        resync(&mut interval, &counting);
        assert!(interval.is_some());

        resync(&mut interval, &paused);
        assert!(interval.is_none());

        interval = Some(arm());
        resync(&mut interval, &TimerSnapshot::idle());
        assert!(interval.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_supersedes_running_interval() {
        let state = spawn_ticker(25, 5).await;
        state.start().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1496);

        state.restart().unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1498);
    }
}
