// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Exposition of the registry

use prometheus_client::encoding::text::encode;

use super::MetricsRegistry;
use crate::error::Result;

impl MetricsRegistry {
    /// Encode every registered metric in OpenMetrics text format
    ///
    /// # Errors
    ///
    /// Returns `AppError::Metrics` if encoding fails.
    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry)?;
        Ok(buffer)
    }
}
