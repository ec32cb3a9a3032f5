//! Errors raised while loading or validating configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for this crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A configuration layer that could not be applied, or a final config that
/// failed validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `with_file` was given a path that does not exist.
    #[error("configuration file not found: {path}")]
    Missing {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but reading it failed.
    #[error("cannot read configuration file {path}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Neither `toml` nor `json`.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Malformed TOML.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or a merged document with unknown or mistyped fields.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),

    /// A field failed validation.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `server.http_addr`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A prefixed environment variable could not be applied.
    #[error("cannot apply environment variable {var}: {reason}")]
    Env {
        /// Full variable name.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `.env` file could not be loaded.
    #[error("cannot load .env file")]
    Dotenv(#[source] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages_name_the_culprit() {
        assert_eq!(
            ConfigError::missing("/etc/contour.toml").to_string(),
            "configuration file not found: /etc/contour.toml"
        );
        assert_eq!(
            ConfigError::invalid("server.http_addr", "not a socket address").to_string(),
            "invalid configuration value for server.http_addr: not a socket address"
        );
        assert_eq!(
            ConfigError::env("CONTOUR_METRICS_ENABLED", "expected boolean").to_string(),
            "cannot apply environment variable CONTOUR_METRICS_ENABLED: expected boolean"
        );
    }

    #[test]
    fn test_read_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read("contour.toml", io);
        assert_eq!(err.source().map(ToString::to_string), Some("denied".to_string()));
    }
}
