//! Configuration sections.
//!
//! Each section mirrors one runtime configuration type in plain,
//! serializable fields. Every field has a default, so a file only needs to
//! name what it changes.

use contour_extract::{DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_SIZE};
use contour_server::{DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS};
use contour_telemetry::{LogConfig, LogFormat, MetricsConfig};
use serde::{Deserialize, Serialize};

/// `[server]` section.
///
/// ```toml
/// [server]
/// http_addr = "0.0.0.0:8080"
/// shutdown_timeout_secs = 30
/// request_timeout_secs = 30
/// input_error_status = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address.
    pub http_addr: String,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
    /// Seconds allowed for reading the body and for running the pipeline.
    pub request_timeout_secs: u64,
    /// Status sent with channel parse/validate errors.
    pub input_error_status: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            input_error_status: 200,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Whether logging is enabled.
    pub enabled: bool,
    /// Filter directive, e.g. `"info"` or `"contour_server=debug,info"`.
    pub level: String,
    /// `json`, `pretty` or `compact`.
    pub format: LogFormat,
    /// Log span open and close events.
    pub span_events: bool,
    /// Include file and line.
    pub file_line_info: bool,
    /// Include the target module path.
    pub include_target: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LogConfig::production().into()
    }
}

impl From<LogConfig> for LoggingSection {
    fn from(config: LogConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level,
            format: config.format,
            span_events: config.span_events,
            file_line_info: config.file_line_info,
            include_target: config.include_target,
        }
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            enabled: section.enabled,
            level: section.level.clone(),
            format: section.format,
            span_events: section.span_events,
            file_line_info: section.file_line_info,
            include_target: section.include_target,
        }
    }
}

/// `[metrics]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsSection {
    /// Whether a recorder is installed.
    pub enabled: bool,
    /// Standalone scrape endpoint address.
    pub listen_addr: Option<String>,
    /// Request duration histogram buckets, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        let config = MetricsConfig::default();
        Self {
            enabled: config.enabled,
            listen_addr: config.listen_addr,
            duration_buckets: config.duration_buckets,
        }
    }
}

impl From<&MetricsSection> for MetricsConfig {
    fn from(section: &MetricsSection) -> Self {
        Self {
            enabled: section.enabled,
            listen_addr: section.listen_addr.clone(),
            duration_buckets: section.duration_buckets.clone(),
        }
    }
}

/// `[multipart]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultipartSection {
    /// Maximum total body size in bytes.
    pub max_body_size: usize,
    /// Maximum size per part in bytes.
    pub max_field_size: usize,
    /// Maximum number of parts.
    pub max_fields: usize,
}

impl Default for MultipartSection {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_round_trips_runtime_config() {
        let section = LoggingSection::from(LogConfig::development());
        assert_eq!(LogConfig::from(&section), LogConfig::development());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let section: ServerSection = toml::from_str("request_timeout_secs = 5").unwrap();
        assert_eq!(section.request_timeout_secs, 5);
        assert_eq!(section.http_addr, DEFAULT_HTTP_ADDR);
        assert_eq!(section.input_error_status, 200);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<MultipartSection, _> = toml::from_str("max_files = 3");
        assert!(result.is_err());
    }
}
