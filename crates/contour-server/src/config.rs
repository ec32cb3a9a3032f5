//! Server configuration types.
//!
//! # Example
//!
//! ```rust
//! use contour_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "0.0.0.0:8080");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use contour_extract::MultipartConfig;
use http::StatusCode;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Per-request pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Status sent with channel parse/validate errors. Defaults to 200.
    pub input_error_status: StatusCode,
    /// Limits for multipart request bodies.
    pub multipart: MultipartConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_error_status: StatusCode::OK,
            multipart: MultipartConfig::default(),
        }
    }
}

/// Listener, timeout and pipeline settings for a [`Server`](crate::Server).
///
/// Built with [`ServerConfig::builder()`]; the defaults bind
/// [`DEFAULT_HTTP_ADDR`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    http_addr: String,
    /// Grace period for open connections once shutdown starts.
    shutdown_timeout: Duration,
    /// Deadline for receiving the body, and again for the pipeline.
    request_timeout: Duration,
    pipeline: PipelineOptions,
}

impl ServerConfig {
    /// Starts from the defaults.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Bind address as configured.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Bind address, parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Shutdown grace period.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Per-request deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Settings the server hands to its [`App`](crate::App).
    #[must_use]
    pub fn pipeline(&self) -> PipelineOptions {
        self.pipeline
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            pipeline: PipelineOptions::default(),
        }
    }
}

/// Builder for [`ServerConfig`].
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Starts from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind address, e.g. `127.0.0.1:3000`.
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.http_addr = addr.into();
        self
    }

    /// Grace period for open connections on shutdown.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Per-request deadline.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Status for `Invalid <channel>` responses.
    pub fn input_error_status(mut self, status: StatusCode) -> Self {
        self.config.pipeline.input_error_status = status;
        self
    }

    /// Multipart request limits.
    pub fn multipart(mut self, multipart: MultipartConfig) -> Self {
        self.config.pipeline.multipart = multipart;
        self
    }

    /// Finishes the config.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}
