// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry initialization and metric registration

use crate::fritzbox::TrafficStream;
use crate::metrics::labels::DeviceLabels;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{FloatGauge, MetricsRegistry};

/// Metric name and help text of a traffic stream gauge
fn network_metric(stream: TrafficStream) -> (&'static str, &'static str) {
    match stream {
        TrafficStream::DownstreamInternet => (
            "fritzbox_network_downstream_inet_bps",
            "Internet downstream in bits per second",
        ),
        TrafficStream::DownstreamMedia => (
            "fritzbox_network_downstream_media_bps",
            "Media downstream in bits per second",
        ),
        TrafficStream::DownstreamGuest => (
            "fritzbox_network_downstream_guest_bps",
            "Guest network downstream in bits per second",
        ),
        TrafficStream::UpstreamRealtime => (
            "fritzbox_network_upstream_realtime_bps",
            "Realtime priority upstream in bits per second",
        ),
        TrafficStream::UpstreamHighPriority => (
            "fritzbox_network_upstream_important_bps",
            "High priority upstream in bits per second",
        ),
        TrafficStream::UpstreamDefaultPriority => (
            "fritzbox_network_upstream_default_bps",
            "Default priority upstream in bits per second",
        ),
        TrafficStream::UpstreamLowPriority => (
            "fritzbox_network_upstream_background_bps",
            "Low priority upstream in bits per second",
        ),
        TrafficStream::UpstreamGuest => (
            "fritzbox_network_upstream_guest_bps",
            "Guest network upstream in bits per second",
        ),
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let device_connected = Family::<DeviceLabels, FloatGauge>::default();
        registry.register(
            "fritzbox_home_automation_device_connected_bool",
            "Either 0 or 1 to indicate if the device is currently connected to the FRITZ!Box",
            device_connected.clone(),
        );
        let device_powered = Family::<DeviceLabels, FloatGauge>::default();
        registry.register(
            "fritzbox_home_automation_is_powered_bool",
            "Either 0 or 1 to indicate if the device is powered on or off",
            device_powered.clone(),
        );
        let device_temperature_celsius = Family::<DeviceLabels, FloatGauge>::default();
        registry.register(
            "fritzbox_home_automation_temperature_celsius",
            "Temperature measured at the device sensor in degree Celsius",
            device_temperature_celsius.clone(),
        );
        let device_power_watts = Family::<DeviceLabels, FloatGauge>::default();
        registry.register(
            "fritzbox_home_automation_power_watts",
            "Electric power in Watt, refreshed approx every 2 minutes",
            device_power_watts.clone(),
        );
        let device_voltage_volts = Family::<DeviceLabels, FloatGauge>::default();
        registry.register(
            "fritzbox_home_automation_voltage_volts",
            "Electric voltage in Volt, refreshed approx every 2 minutes",
            device_voltage_volts.clone(),
        );
        let device_energy_watthours = Family::<DeviceLabels, FloatGauge>::default();
        registry.register(
            "fritzbox_home_automation_energy_watthours_total",
            "Accumulated power consumption in Watt hours since initial setup",
            device_energy_watthours.clone(),
        );

        let network_bits_per_second = TrafficStream::ALL.map(|stream| {
            let (name, help) = network_metric(stream);
            let gauge = FloatGauge::default();
            registry.register(name, help, gauge.clone());
            gauge
        });

        Self {
            registry: Arc::new(Mutex::new(registry)),
            device_connected,
            device_powered,
            device_temperature_celsius,
            device_power_watts,
            device_voltage_volts,
            device_energy_watthours,
            network_bits_per_second,
            prev_devices: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}
