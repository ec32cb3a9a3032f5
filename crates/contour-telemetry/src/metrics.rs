//! Prometheus metrics.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `contour_requests_total` | Counter | `method`, `status` | Requests answered |
//! | `contour_request_duration_seconds` | Histogram | `method` | Time to answer |
//! | `contour_request_failures_total` | Counter | `category` | Requests that ended in an error |
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed with [`install_metrics_recorder`].

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Name of the request counter.
pub const REQUESTS_TOTAL: &str = "contour_requests_total";

/// Name of the request duration histogram.
pub const REQUEST_DURATION_SECONDS: &str = "contour_request_duration_seconds";

/// Name of the failure counter.
pub const REQUEST_FAILURES_TOTAL: &str = "contour_request_failures_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether a recorder is installed at all.
    pub enabled: bool,

    /// Address of a standalone scrape endpoint (e.g. "0.0.0.0:9090"). When
    /// absent the recorder is installed without one and metrics are read
    /// through [`render_metrics`].
    pub listen_addr: Option<String>,

    /// Buckets of the request duration histogram, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_addr: None,
            // 1ms .. 10s
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the global Prometheus recorder.
///
/// With a `listen_addr` the exporter's HTTP listener is spawned on the
/// current tokio runtime and `None` is returned. Otherwise the handle used
/// to render the metrics is returned and kept for [`render_metrics`].
///
/// # Errors
///
/// Returns an error if the address is invalid, the buckets are empty, or a
/// global recorder is already installed.
pub fn install_metrics_recorder(config: &MetricsConfig) -> TelemetryResult<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let builder = builder(config)?;

    let handle = match &config.listen_addr {
        Some(addr) => {
            let addr: SocketAddr = addr
                .parse()
                .map_err(|e| TelemetryError::InvalidAddress(format!("{addr}: {e}")))?;
            builder
                .with_http_listener(addr)
                .install()
                .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
            None
        }
        None => {
            let handle = builder
                .install_recorder()
                .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
            let _ = METRICS_HANDLE.set(handle.clone());
            Some(handle)
        }
    };

    describe_metrics();
    Ok(handle)
}

fn builder(config: &MetricsConfig) -> TelemetryResult<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Renders the metrics in Prometheus text format.
///
/// Returns `None` unless a recorder without listener was installed.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests answered");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time from dispatch to response"
    );
    describe_counter!(
        REQUEST_FAILURES_TOTAL,
        "Requests that ended in an error, by category"
    );
}

/// Records an answered request.
pub fn record_request(method: &str, status: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION_SECONDS, "method" => method.to_string())
        .record(duration.as_secs_f64());
}

/// Records a request that ended in an error of `category`.
pub fn record_failure(category: &str) {
    counter!(REQUEST_FAILURES_TOTAL, "category" => category.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert!(config.listen_addr.is_none());
        assert_eq!(config.duration_buckets.len(), 12);
    }

    #[test]
    fn test_disabled_installs_nothing() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert!(install_metrics_recorder(&config).unwrap().is_none());
    }

    #[test]
    fn test_invalid_address() {
        let config = MetricsConfig {
            listen_addr: Some("not an address".to_string()),
            ..MetricsConfig::default()
        };
        let error = install_metrics_recorder(&config).unwrap_err();
        assert!(matches!(error, TelemetryError::InvalidAddress(_)));
    }

    #[test]
    fn test_empty_buckets_rejected() {
        let config = MetricsConfig {
            duration_buckets: Vec::new(),
            ..MetricsConfig::default()
        };
        assert!(matches!(builder(&config), Err(TelemetryError::MetricsInit(_))));
    }

    #[test]
    fn test_recording_renders() {
        let recorder = builder(&MetricsConfig::default())
            .unwrap()
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_request("GET", 200, Duration::from_millis(3));
            record_request("GET", 200, Duration::from_millis(4));
            record_failure("not_found");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"contour_requests_total{method="GET",status="200"} 2"#));
        assert!(rendered.contains("contour_request_duration_seconds_bucket"));
        assert!(rendered.contains(r#"contour_request_failures_total{category="not_found"} 1"#));
    }
}
