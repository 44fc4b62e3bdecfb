// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! ```rust
//! use fritzbox_exporter::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, FritzBoxConfig};
pub use crate::error::{AppError, Result};

// Metrics types
pub use crate::metrics::{
    DeviceLabels, DeviceObservation, MetricsRegistry, NetworkObservation, PowerObservation,
};

// FRITZ!Box client
pub use crate::fritzbox::{
    Capabilities, Capability, Device, FritzBoxClient, HttpTransport, PowerInfo, Session,
    SessionManager, SwitchInfo, TemperatureInfo, TrafficSnapshot, TrafficStream, Transport,
};

// Polling
pub use crate::collector::{PollState, Poller};
