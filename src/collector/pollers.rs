// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Pollers for the two metric families

use async_trait::async_trait;
use std::sync::Arc;

use super::scheduler::Poller;
use crate::error::Result;
use crate::fritzbox::FritzBoxClient;
use crate::metrics::{DeviceObservation, MetricsRegistry, NetworkObservation};

/// Publishes home automation device metrics
pub struct DevicePoller {
    client: Arc<FritzBoxClient>,
    metrics: MetricsRegistry,
}

impl DevicePoller {
    #[must_use]
    pub fn new(client: Arc<FritzBoxClient>, metrics: MetricsRegistry) -> Self {
        Self { client, metrics }
    }
}

#[async_trait]
impl Poller for DevicePoller {
    fn family(&self) -> &'static str {
        "home automation"
    }

    async fn poll(&self) -> Result<()> {
        let devices = self.client.devices().await?;
        let observations: Vec<DeviceObservation> =
            devices.iter().map(DeviceObservation::from).collect();
        self.metrics.record_devices(&observations).await;
        tracing::trace!("Published metrics for {} devices", observations.len());
        Ok(())
    }
}

/// Publishes internet traffic metrics
pub struct NetworkPoller {
    client: Arc<FritzBoxClient>,
    metrics: MetricsRegistry,
}

impl NetworkPoller {
    #[must_use]
    pub fn new(client: Arc<FritzBoxClient>, metrics: MetricsRegistry) -> Self {
        Self { client, metrics }
    }
}

#[async_trait]
impl Poller for NetworkPoller {
    fn family(&self) -> &'static str {
        "network"
    }

    async fn poll(&self) -> Result<()> {
        let snapshot = self.client.network_stats().await?;
        self.metrics
            .record_network(&NetworkObservation::from(&snapshot));
        Ok(())
    }
}
