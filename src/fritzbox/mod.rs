//! FRITZ!Box web API client module
//!
//! This module provides functionality to log in to a FRITZ!Box via its
//! session id protocol and read smart home devices and traffic statistics.

mod client;
mod device;
mod network;
mod session;
mod transport;

// Re-export public types and functions
pub use client::{FritzBoxClient, LOGOUT_TIMEOUT};
pub use device::{
    Capabilities, Capability, Device, PowerInfo, SwitchInfo, TemperatureInfo, decode_device_list,
};
pub use network::{BUCKETS_PER_STREAM, TrafficSnapshot, TrafficStream, decode_traffic_snapshot};
pub use session::{LOGIN_PATH, Session, SessionManager, ZERO_SESSION_ID, solve_challenge};
pub use transport::{HttpTransport, Transport, build_url};
