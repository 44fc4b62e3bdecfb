// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Internet traffic monitor (`inetstat_monitor.lua`)

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Number of 5 second buckets the router reports per stream
pub const BUCKETS_PER_STREAM: usize = 20;

/// One traffic stream reported by the traffic monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficStream {
    DownstreamInternet,
    DownstreamMedia,
    DownstreamGuest,
    UpstreamRealtime,
    UpstreamHighPriority,
    UpstreamDefaultPriority,
    UpstreamLowPriority,
    UpstreamGuest,
}

impl TrafficStream {
    pub const ALL: [TrafficStream; 8] = [
        TrafficStream::DownstreamInternet,
        TrafficStream::DownstreamMedia,
        TrafficStream::DownstreamGuest,
        TrafficStream::UpstreamRealtime,
        TrafficStream::UpstreamHighPriority,
        TrafficStream::UpstreamDefaultPriority,
        TrafficStream::UpstreamLowPriority,
        TrafficStream::UpstreamGuest,
    ];

    /// Key of the series in the router's JSON
    #[must_use]
    pub const fn json_key(self) -> &'static str {
        match self {
            TrafficStream::DownstreamInternet => "ds_bps_curr",
            TrafficStream::DownstreamMedia => "ds_mc_bps_curr",
            TrafficStream::DownstreamGuest => "ds_guest_bps_curr",
            TrafficStream::UpstreamRealtime => "us_realtime_bps_curr",
            TrafficStream::UpstreamHighPriority => "us_important_bps_curr",
            TrafficStream::UpstreamDefaultPriority => "us_default_bps_curr",
            TrafficStream::UpstreamLowPriority => "us_background_bps_curr",
            TrafficStream::UpstreamGuest => "guest_us_bps",
        }
    }

    /// Position in `ALL`
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Last 100 seconds of traffic, in bytes per second, newest bucket first
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrafficSnapshot {
    #[serde(rename = "ds_bps_curr")]
    downstream_internet: Vec<f64>,
    #[serde(rename = "ds_mc_bps_curr")]
    downstream_media: Vec<f64>,
    #[serde(rename = "ds_guest_bps_curr")]
    downstream_guest: Vec<f64>,
    #[serde(rename = "us_realtime_bps_curr")]
    upstream_realtime: Vec<f64>,
    #[serde(rename = "us_important_bps_curr")]
    upstream_high_priority: Vec<f64>,
    #[serde(rename = "us_default_bps_curr")]
    upstream_default_priority: Vec<f64>,
    #[serde(rename = "us_background_bps_curr")]
    upstream_low_priority: Vec<f64>,
    #[serde(rename = "guest_us_bps")]
    upstream_guest: Vec<f64>,
}

impl TrafficSnapshot {
    /// Full bucket series of a stream
    #[must_use]
    pub fn series(&self, stream: TrafficStream) -> &[f64] {
        match stream {
            TrafficStream::DownstreamInternet => &self.downstream_internet,
            TrafficStream::DownstreamMedia => &self.downstream_media,
            TrafficStream::DownstreamGuest => &self.downstream_guest,
            TrafficStream::UpstreamRealtime => &self.upstream_realtime,
            TrafficStream::UpstreamHighPriority => &self.upstream_high_priority,
            TrafficStream::UpstreamDefaultPriority => &self.upstream_default_priority,
            TrafficStream::UpstreamLowPriority => &self.upstream_low_priority,
            TrafficStream::UpstreamGuest => &self.upstream_guest,
        }
    }

    /// Most recent bucket of a stream in bytes per second
    #[must_use]
    pub fn latest(&self, stream: TrafficStream) -> f64 {
        // decode_traffic_snapshot guarantees non-empty series
        self.series(stream).first().copied().unwrap_or(0.0)
    }

    /// Builds a snapshot where every stream has the same series
    #[cfg(test)]
    pub(crate) fn uniform(series: &[f64]) -> Self {
        Self {
            downstream_internet: series.to_vec(),
            downstream_media: series.to_vec(),
            downstream_guest: series.to_vec(),
            upstream_realtime: series.to_vec(),
            upstream_high_priority: series.to_vec(),
            upstream_default_priority: series.to_vec(),
            upstream_low_priority: series.to_vec(),
            upstream_guest: series.to_vec(),
        }
    }
}

/// Decodes the traffic monitor's JSON array and returns its first element
///
/// # Errors
///
/// Returns `AppError::Decode` for malformed JSON, an empty array or an empty
/// stream series.
pub fn decode_traffic_snapshot(bytes: &[u8]) -> Result<TrafficSnapshot> {
    let snapshots: Vec<TrafficSnapshot> = serde_json::from_slice(bytes).map_err(|e| {
        AppError::Decode(format!("failed to decode traffic monitor response: {e}"))
    })?;

    let snapshot = snapshots
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Decode("FRITZ!Box returned no monitoring data".to_string()))?;

    if let Some(stream) = TrafficStream::ALL
        .into_iter()
        .find(|s| snapshot.series(*s).is_empty())
    {
        return Err(AppError::Decode(format!(
            "traffic series '{}' is empty",
            stream.json_key()
        )));
    }

    Ok(snapshot)
}
