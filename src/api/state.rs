//! State shared by the HTTP handlers
use crate::metrics::MetricsRegistry;

/// Shared application state
pub struct AppState {
    /// Registry the pollers write to and `/metrics` encodes
    pub metrics: MetricsRegistry,
}
