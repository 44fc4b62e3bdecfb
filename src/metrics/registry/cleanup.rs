// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Cleanup of label sets for devices that disappeared

use crate::metrics::labels::DeviceLabels;
use std::collections::HashSet;

use super::MetricsRegistry;

impl MetricsRegistry {
    /// Remove series of devices that are no longer in the device list
    ///
    /// Keeps the label set bounded when devices are unpaired or renamed.
    ///
    /// # Arguments
    /// * `current_devices` - Labels of every device in the latest poll
    pub(super) async fn cleanup_stale_devices(&self, current_devices: HashSet<DeviceLabels>) {
        let stale_devices: Vec<DeviceLabels> = {
            let mut prev = self.prev_devices.lock().await;
            let stale = prev.difference(&current_devices).cloned().collect();
            *prev = current_devices;
            stale
        };

        for labels in &stale_devices {
            self.device_connected.remove(labels);
            self.device_powered.remove(labels);
            self.device_temperature_celsius.remove(labels);
            self.device_power_watts.remove(labels);
            self.device_voltage_volts.remove(labels);
            self.device_energy_watthours.remove(labels);
        }
        if !stale_devices.is_empty() {
            tracing::debug!("Removed {} stale device label sets", stale_devices.len());
        }
    }
}
