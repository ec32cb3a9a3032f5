//! Layered configuration for Contour servers.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides, optionally read from `.env`
//! - Strict parsing (unknown fields are errors)
//! - Layered configuration (defaults → files → env)
//!
//! [`ContourConfig`] holds one section per runtime component and converts
//! into the types those components take: [`ServerConfig`](contour_server::ServerConfig),
//! [`LogConfig`](contour_telemetry::LogConfig),
//! [`MetricsConfig`](contour_telemetry::MetricsConfig) and
//! [`MultipartConfig`](contour_extract::MultipartConfig).
//!
//! # Example
//!
//! ```no_run
//! use contour_config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_file("contour.toml")?
//!     .with_env_prefix("CONTOUR")
//!     .load()?;
//!
//! let server_config = config.server_config()?;
//! contour_telemetry::init_telemetry(&config.telemetry_config())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_secs = 30
//! input_error_status = 200
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! listen_addr = "0.0.0.0:9090"
//!
//! [multipart]
//! max_body_size = 52428800
//! max_field_size = 10485760
//! max_fields = 100
//! ```

#![doc(html_root_url = "https://docs.rs/contour-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod sections;

pub use config::ContourConfig;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use sections::{LoggingSection, MetricsSection, MultipartSection, ServerSection};
