//! # Contour Telemetry
//!
//! Observability for Contour services:
//!
//! - **Logging**: a `tracing-subscriber` stack with an `EnvFilter` and JSON,
//!   pretty or compact output
//! - **Metrics**: a Prometheus recorder behind the `metrics` facade, plus the
//!   request metrics the server records
//!
//! # Example
//!
//! ```rust,no_run
//! use contour_telemetry::{init_telemetry, TelemetryConfig};
//!
//! # fn main() -> Result<(), contour_telemetry::TelemetryError> {
//! let handle = init_telemetry(&TelemetryConfig::default())?;
//! if let Some(handle) = handle {
//!     println!("{}", handle.render());
//! }
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/contour-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};
pub use metrics::{install_metrics_recorder, render_metrics, MetricsConfig};
pub use metrics_exporter_prometheus::PrometheusHandle;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Configuration for logging and metrics together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryConfig {
    /// Logging configuration.
    pub logging: LogConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

/// Initializes logging, then metrics.
///
/// Returns the metrics handle when a recorder without listener was
/// installed.
///
/// # Errors
///
/// Returns the first subsystem failure.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<Option<PrometheusHandle>> {
    init_logging(&config.logging)?;
    install_metrics_recorder(&config.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_telemetry() {
        let config = TelemetryConfig {
            logging: LogConfig {
                enabled: false,
                ..LogConfig::default()
            },
            metrics: MetricsConfig {
                enabled: false,
                ..MetricsConfig::default()
            },
        };
        assert!(init_telemetry(&config).unwrap().is_none());
    }
}
