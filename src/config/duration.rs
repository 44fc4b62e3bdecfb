// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Human readable durations for the configuration file

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Parse a duration string to seconds
///
/// Accepts formats like: 1h30m, 5m, 100s, 2d, 1w2d and bare numbers (seconds).
/// Returns `None` for anything containing an unknown unit.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let mut total = 0u64;
    let mut num = String::new();
    for ch in s.chars() {
        if ch.is_ascii_digit() {
            num.push(ch);
            continue;
        }
        if num.is_empty() {
            return None;
        }
        let value = num.parse::<u64>().ok()?;
        let unit_seconds = match ch {
            'w' => 7 * 24 * 3600,
            'd' => 24 * 3600,
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(unit_seconds)?)?;
        num.clear();
    }
    if !num.is_empty() {
        // trailing number without unit -> seconds
        total = total.checked_add(num.parse::<u64>().ok()?)?;
    }
    Some(Duration::from_secs(total))
}

/// Format a duration the way `parse_duration` reads it back
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    let (h, rem) = (secs / 3600, secs % 3600);
    let (m, s) = (rem / 60, rem % 60);
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 {
        out.push_str(&format!("{s}s"));
    }
    out
}

pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid duration '{text}': expected something like 30s, 5m or 1h30m"
            ))
        }),
    }
}

pub(super) fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_duration(*d))
}
