// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

mod cleanup;
mod init;
mod scrape;
mod update;

use crate::metrics::labels::DeviceLabels;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

/// Gauge holding fractional values
pub(crate) type FloatGauge = Gauge<f64, AtomicU64>;

#[derive(Clone)]
pub struct MetricsRegistry {
    pub(crate) registry: Arc<Mutex<Registry>>,
    // home automation gauges (per device)
    device_connected: Family<DeviceLabels, FloatGauge>,
    device_powered: Family<DeviceLabels, FloatGauge>,
    device_temperature_celsius: Family<DeviceLabels, FloatGauge>,
    device_power_watts: Family<DeviceLabels, FloatGauge>,
    device_voltage_volts: Family<DeviceLabels, FloatGauge>,
    device_energy_watthours: Family<DeviceLabels, FloatGauge>,
    // network gauges, indexed by TrafficStream::index
    network_bits_per_second: [FloatGauge; 8],
    // devices reported by the last successful device poll
    prev_devices: Arc<Mutex<HashSet<DeviceLabels>>>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
