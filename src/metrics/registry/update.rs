// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metric update logic for device and network observations

use crate::fritzbox::TrafficStream;
use crate::metrics::labels::DeviceLabels;
use crate::metrics::observations::{DeviceObservation, NetworkObservation};
use std::collections::HashSet;

use super::MetricsRegistry;

impl MetricsRegistry {
    /// Publish the observations of one device poll
    ///
    /// Devices that were reported by the previous poll but are missing now
    /// have their series removed.
    pub async fn record_devices(&self, observations: &[DeviceObservation]) {
        let mut current = HashSet::with_capacity(observations.len());
        for obs in observations {
            let labels = DeviceLabels::new(&obs.device_name);
            self.record_device(&labels, obs);
            tracing::debug!(
                device_name = %obs.device_name,
                is_connected = obs.is_connected,
                temperature_celsius = ?obs.temperature_celsius,
                power = ?obs.power,
                is_powered = ?obs.is_powered,
                "Collected device metrics"
            );
            current.insert(labels);
        }

        self.cleanup_stale_devices(current).await;
    }

    fn record_device(&self, labels: &DeviceLabels, obs: &DeviceObservation) {
        self.device_connected
            .get_or_create(labels)
            .set(obs.is_connected);

        if let Some(celsius) = obs.temperature_celsius {
            self.device_temperature_celsius
                .get_or_create(labels)
                .set(celsius);
        }

        if let Some(power) = obs.power {
            self.device_voltage_volts
                .get_or_create(labels)
                .set(power.volts);
            self.device_power_watts
                .get_or_create(labels)
                .set(power.watts);
            self.device_energy_watthours
                .get_or_create(labels)
                .set(power.watt_hours);
        }

        if let Some(powered) = obs.is_powered {
            self.device_powered.get_or_create(labels).set(powered);
        }
    }

    /// Publish the latest traffic values
    pub fn record_network(&self, obs: &NetworkObservation) {
        for stream in TrafficStream::ALL {
            self.network_bits_per_second[stream.index()].set(obs.get(stream));
        }
        tracing::debug!(
            downstream_bps = obs.get(TrafficStream::DownstreamInternet),
            upstream_bps = obs.get(TrafficStream::UpstreamDefaultPriority),
            "Collected network metrics"
        );
    }
}
