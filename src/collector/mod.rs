// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics collection orchestration module for the FRITZ!Box
//!
//! Runs one polling loop per metric family. Both loops share the router
//! client and stop on the same shutdown signal.

mod pollers;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::fritzbox::FritzBoxClient;
use crate::metrics::MetricsRegistry;

pub use pollers::{DevicePoller, NetworkPoller};
pub use scheduler::{MIN_POLL_INTERVAL, PollLoop, PollState, Poller, spawn_poll_loop};

/// Handles of the running polling loops
pub struct Collection {
    pub devices: PollLoop,
    pub network: PollLoop,
}

impl Collection {
    /// Waits until both loops have stopped
    pub async fn join(self) {
        tokio::join!(self.devices.join(), self.network.join());
    }
}

/// Starts the device and network polling loops
pub fn start_collection(
    shutdown_rx: watch::Receiver<bool>,
    client: Arc<FritzBoxClient>,
    metrics: MetricsRegistry,
    device_interval: Duration,
    network_interval: Duration,
) -> Collection {
    let devices = spawn_poll_loop(
        DevicePoller::new(client.clone(), metrics.clone()),
        device_interval,
        shutdown_rx.clone(),
    );
    let network = spawn_poll_loop(
        NetworkPoller::new(client, metrics),
        network_interval,
        shutdown_rx,
    );
    Collection { devices, network }
}
