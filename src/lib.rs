// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # FRITZ!Box Exporter
//!
//! Prometheus exporter for AVM FRITZ!Box routers.
//!
//! This library logs in to a FRITZ!Box via its session id protocol, polls
//! smart home devices and internet traffic on two independent schedules,
//! and exposes the results in OpenMetrics format.
//!
//! ## Main modules
//! - `api`: HTTP API handlers
//! - `collector`: polling loops
//! - `config`: configuration management
//! - `error`: error types
//! - `fritzbox`: FRITZ!Box web API client
//! - `metrics`: observations and registry
//! - `server`: process lifecycle
//! - `setup`: interactive setup wizard
//! - `prelude`: commonly used types and traits

mod api;
mod collector;
mod config;
mod error;
mod fritzbox;
mod metrics;
pub mod prelude;
mod server;
mod setup;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, FritzBoxConfig};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router and state
pub use api::handlers::OPENMETRICS_CONTENT_TYPE;
pub use api::{AppState, create_router};

/// Polling loops
pub use collector::{
    Collection, DevicePoller, MIN_POLL_INTERVAL, NetworkPoller, PollLoop, PollState, Poller,
    spawn_poll_loop, start_collection,
};

/// FRITZ!Box client and transport
pub use fritzbox::{
    BUCKETS_PER_STREAM, Capability, Device, FritzBoxClient, HttpTransport, LOGIN_PATH,
    LOGOUT_TIMEOUT, TrafficSnapshot, TrafficStream, Transport, ZERO_SESSION_ID, build_url,
    decode_device_list, decode_traffic_snapshot, solve_challenge,
};

/// Metrics registry and labels
pub use metrics::{DeviceLabels, DeviceObservation, MetricsRegistry, NetworkObservation};

/// Lifecycle entry points
pub use server::{SERVER_SHUTDOWN_GRACE, run, serve};
pub use setup::run_setup;
