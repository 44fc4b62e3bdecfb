// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Cancellable fixed-interval polling loop

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;

/// Shortest interval a loop runs at; `tokio::time::interval` rejects zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One fetch-and-publish cycle of a metric family
#[async_trait]
pub trait Poller: Send + Sync + 'static {
    /// Name used in log messages
    fn family(&self) -> &'static str;

    /// Fetches fresh data and publishes it
    ///
    /// A failed poll must leave previously published values untouched.
    async fn poll(&self) -> Result<()>;
}

/// Lifecycle of a polling loop
///
/// `Idle -> Polling -> (Idle | Stopped)`; `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

/// Handle of a spawned polling loop
pub struct PollLoop {
    handle: JoinHandle<()>,
    state: watch::Receiver<PollState>,
}

impl PollLoop {
    /// Receiver observing the loop state
    #[must_use]
    pub fn state(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Waits for the loop to stop
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!("Polling loop terminated abnormally: {}", e);
        }
    }
}

/// Spawns a loop calling `poller.poll()` every `interval`
///
/// The first poll starts immediately. Polls never overlap; ticks that fire
/// while a poll is in flight are skipped. A failed poll is logged and the
/// loop waits for the next tick. Once `shutdown_rx` turns `true` the loop
/// stops, cancelling an in-flight poll at its next suspension point.
/// Intervals below `MIN_POLL_INTERVAL` are raised to it.
pub fn spawn_poll_loop<P: Poller>(
    poller: P,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> PollLoop {
    let (state_tx, state_rx) = watch::channel(PollState::Idle);
    let family = poller.family();
    let interval = if interval < MIN_POLL_INTERVAL {
        tracing::warn!(
            "{} polling interval {:?} is too short, using {}s",
            family,
            interval,
            MIN_POLL_INTERVAL.as_secs()
        );
        MIN_POLL_INTERVAL
    } else {
        interval
    };
    tracing::info!(
        "Starting {} polling loop every {}s",
        family,
        interval.as_secs()
    );

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.wait_for(|&stop| stop) => break,
                _ = ticker.tick() => {},
            }

            state_tx.send_replace(PollState::Polling);
            let start = tokio::time::Instant::now();
            tokio::select! {
                biased;
                _ = shutdown_rx.wait_for(|&stop| stop) => {
                    tracing::debug!("Cancelled in-flight {} poll", family);
                    break;
                }
                result = poller.poll() => match result {
                    Ok(()) => tracing::debug!(
                        "Collected {} metrics in {:.3}s",
                        family,
                        start.elapsed().as_secs_f64()
                    ),
                    Err(e) => tracing::warn!(
                        "Failed to collect {} metrics in {:.3}s: {}",
                        family,
                        start.elapsed().as_secs_f64(),
                        e
                    ),
                },
            }
            state_tx.send_replace(PollState::Idle);
        }

        tracing::info!("Stopping {} polling loop", family);
        state_tx.send_replace(PollState::Stopped);
    });

    PollLoop {
        handle,
        state: state_rx,
    }
}
