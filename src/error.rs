// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for the FRITZ!Box exporter

use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration was loaded but failed validation
    ///
    /// Holds every problem found so the operator can fix them in one go.
    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    /// Network or IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Address parsing error
    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Invalid router base URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP request to the router failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Router answered with a non-200 status
    #[error("Bad HTTP status {status} for {path}")]
    Status { status: u16, path: String },

    /// Login handshake was rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Router payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Interactive setup failed
    #[error("Setup error: {0}")]
    Setup(String),
}

impl AppError {
    /// Whether the error came from talking to the router (network or non-200)
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(error: std::fmt::Error) -> Self {
        Self::Metrics(error.to_string())
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(error: dialoguer::Error) -> Self {
        Self::Setup(error.to_string())
    }
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;
