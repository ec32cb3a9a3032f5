//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The subscriber could not be installed or the filter is invalid.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The metrics recorder or exporter could not be installed.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// An address failed to parse.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
