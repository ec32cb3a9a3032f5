//! The root configuration type.

use std::net::SocketAddr;
use std::time::Duration;

use contour_extract::MultipartConfig;
use contour_server::ServerConfig;
use contour_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::sections::{LoggingSection, MetricsSection, MultipartSection, ServerSection};

/// Complete Contour server configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to layer files and environment
/// variables over the defaults.
///
/// # Example
///
/// ```
/// use contour_config::ContourConfig;
///
/// let config = ContourConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContourConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Prometheus metrics.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Multipart request limits.
    #[serde(default)]
    pub multipart: MultipartSection,
}

impl ContourConfig {
    /// Pretty debug logs; everything else at defaults.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development().into(),
            ..Self::default()
        }
    }

    /// JSON logs at `info`. Same as [`Default`].
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        input_error_status(self.server.input_error_status)?;

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs",
                "must be greater than 0",
            ));
        }

        if self.logging.enabled {
            contour_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid("logging.level", e.to_string()))?;
        }

        if self.metrics.enabled {
            if let Some(addr) = &self.metrics.listen_addr {
                if addr.parse::<SocketAddr>().is_err() {
                    return Err(ConfigError::invalid(
                        "metrics.listen_addr",
                        format!("invalid socket address: {addr}"),
                    ));
                }
            }
            if self.metrics.duration_buckets.is_empty() {
                return Err(ConfigError::invalid(
                    "metrics.duration_buckets",
                    "must not be empty",
                ));
            }
        }

        if self.multipart.max_fields == 0 {
            return Err(ConfigError::invalid(
                "multipart.max_fields",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Builds the runtime server configuration, multipart limits included.
    ///
    /// # Errors
    ///
    /// Fails if `server.input_error_status` is not an HTTP status code.
    pub fn server_config(&self) -> ConfigResult<ServerConfig> {
        Ok(ServerConfig::builder()
            .http_addr(self.server.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(self.server.shutdown_timeout_secs))
            .request_timeout(Duration::from_secs(self.server.request_timeout_secs))
            .input_error_status(input_error_status(self.server.input_error_status)?)
            .multipart(self.multipart_config())
            .build())
    }

    /// Builds the runtime multipart limits.
    #[must_use]
    pub fn multipart_config(&self) -> MultipartConfig {
        MultipartConfig::new()
            .max_body_size(self.multipart.max_body_size)
            .max_field_size(self.multipart.max_field_size)
            .max_fields(self.multipart.max_fields)
    }

    /// Builds the runtime logging configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from(&self.logging)
    }

    /// Builds the runtime metrics configuration.
    #[must_use]
    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig::from(&self.metrics)
    }

    /// Builds the combined telemetry configuration.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            logging: self.log_config(),
            metrics: self.metrics_config(),
        }
    }
}

fn input_error_status(code: u16) -> ConfigResult<StatusCode> {
    StatusCode::from_u16(code).map_err(|_| {
        ConfigError::invalid(
            "server.input_error_status",
            format!("not an HTTP status code: {code}"),
        )
    })
}
