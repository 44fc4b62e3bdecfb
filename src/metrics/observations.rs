// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Mapping from decoded router data to metric values
//!
//! Pure functions; the registry applies the results.

use crate::fritzbox::{Device, TrafficSnapshot, TrafficStream};

/// Energy meter values of one device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerObservation {
    pub watts: f64,
    pub volts: f64,
    pub watt_hours: f64,
}

/// Values collected for one device in one poll
///
/// Optional values are `None` when the device lacks the capability.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceObservation {
    pub device_name: String,
    pub is_connected: f64,
    pub temperature_celsius: Option<f64>,
    pub power: Option<PowerObservation>,
    pub is_powered: Option<f64>,
}

impl From<&Device> for DeviceObservation {
    fn from(device: &Device) -> Self {
        let temperature_celsius = device.can_measure_temperature().then(|| {
            device
                .temperature
                .as_ref()
                .map_or(0.0, |t| t.celsius())
        });

        let power = device.can_measure_power().then(|| {
            let meter = device.power.clone().unwrap_or_default();
            PowerObservation {
                watts: meter.watts(),
                volts: meter.volts(),
                watt_hours: meter.watt_hours(),
            }
        });

        let is_powered = device.is_switch().then(|| {
            prometheus_bool(
                device
                    .switch
                    .as_ref()
                    .is_some_and(|s| s.is_powered_on()),
            )
        });

        Self {
            device_name: device.name.clone(),
            is_connected: prometheus_bool(device.present),
            temperature_celsius,
            power,
            is_powered,
        }
    }
}

/// Latest traffic values in bits per second, indexed by `TrafficStream::index`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkObservation {
    pub bits_per_second: [f64; 8],
}

impl NetworkObservation {
    #[must_use]
    pub fn get(&self, stream: TrafficStream) -> f64 {
        self.bits_per_second[stream.index()]
    }
}

impl From<&TrafficSnapshot> for NetworkObservation {
    fn from(snapshot: &TrafficSnapshot) -> Self {
        // Only the newest bucket is exported, older ones are dropped
        Self {
            bits_per_second: TrafficStream::ALL.map(|s| snapshot.latest(s) * 8.0),
        }
    }
}

fn prometheus_bool(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}
