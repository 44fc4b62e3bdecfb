// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! HTTP transport to the FRITZ!Box web API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::{AppError, Result};

/// Connection timeout (5 seconds)
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Whole request timeout (30 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues GET requests against the router and returns the raw body
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with the given query parameters
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the request fails and `AppError::Status`
    /// for any status other than 200.
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>>;
}

/// `reqwest` based transport bound to the router's base URL
pub struct HttpTransport {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for the given base URL
    ///
    /// # Errors
    ///
    /// Returns `AppError::Url` if the base URL does not parse and
    /// `AppError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECTION_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base_url, http })
    }
}

/// Joins the endpoint path onto the base URL and encodes the query
///
/// Parameters are sorted by key, then value, so the same call always
/// produces the same URL.
pub fn build_url(base: &Url, path: &str, params: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);

    let mut sorted = params.to_vec();
    sorted.sort_unstable();
    if sorted.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(sorted);
    }
    url
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = build_url(&self.base_url, path, params);
        tracing::trace!("GET {}{}", self.base_url, path.trim_start_matches('/'));

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await?;
        tracing::trace!("Received {} bytes from {}", body.len(), path);
        Ok(body.to_vec())
    }
}
