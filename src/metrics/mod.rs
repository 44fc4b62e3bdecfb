// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update module for the FRITZ!Box exporter
//!
//! Contains label types, observations derived from router data, and the
//! Prometheus metrics registry.

mod labels;
mod observations;
mod registry;


/// Labels for home automation devices
pub use labels::DeviceLabels;

/// Metric values derived from one poll
pub use observations::{DeviceObservation, NetworkObservation, PowerObservation};

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
