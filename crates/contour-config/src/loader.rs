//! Configuration loader with layered approach.
//!
//! Layers are applied in order, later ones overriding earlier ones:
//!
//! 1. Defaults (or a preset)
//! 2. Configuration files and strings, merged key by key
//! 3. Environment variables under a prefix
//!
//! # Environment Variable Overrides
//!
//! With prefix `CONTOUR`, a variable is `CONTOUR_<SECTION>_<KEY>`:
//!
//! - `CONTOUR_SERVER_HTTP_ADDR=0.0.0.0:9000`
//! - `CONTOUR_SERVER_INPUT_ERROR_STATUS=400`
//! - `CONTOUR_LOGGING_LEVEL=debug`
//! - `CONTOUR_METRICS_LISTEN_ADDR=0.0.0.0:9090`
//! - `CONTOUR_MULTIPART_MAX_FIELDS=10`

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use contour_telemetry::LogFormat;
use serde_json::Value;

use crate::config::ContourConfig;
use crate::error::{ConfigError, ConfigResult};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "CONTOUR";

/// Configuration loader with layered approach.
///
/// # Example
///
/// ```no_run
/// use contour_config::ConfigLoader;
///
/// # fn main() -> Result<(), contour_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("contour.toml")?
///     .with_dotenv()?
///     .with_env_prefix("CONTOUR")
///     .load()?;
///
/// println!("listening on {}", config.server.http_addr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: ContourConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ContourConfig::default(),
            env_prefix: None,
        }
    }

    /// Reset to default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = ContourConfig::default();
        self
    }

    /// Reset to the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use contour_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ContourConfig::development();
        self
    }

    /// Reset to the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = ContourConfig::production();
        self
    }

    /// Merge a configuration file. The format follows the extension:
    /// `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or unreadable, has an
    /// unsupported extension, fails to parse, or names unknown fields.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::missing(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.with_string(&content, format)
    }

    /// Merge a configuration file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) once the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merge configuration from a string in `format` (`"toml"` or `"json"`).
    ///
    /// Only the keys present in `content` change; everything else keeps its
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the merged configuration
    /// has unknown fields or mistyped values.
    ///
    /// # Example
    ///
    /// ```
    /// use contour_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// assert_eq!(config.server.request_timeout_secs, 30);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> ConfigResult<Self> {
        let layer: Value = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        let mut merged = serde_json::to_value(&self.config)?;
        merge(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Apply environment variables named `PREFIX_SECTION_KEY` when loading.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load `.env` from the current directory into the process environment.
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file exists but is malformed.
    pub fn with_dotenv(self) -> ConfigResult<Self> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::Dotenv(e)),
        }
    }

    /// Load variables from a specific `.env`-style file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        dotenvy::from_path(path.as_ref()).map_err(ConfigError::Dotenv)?;
        Ok(self)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value does not parse or the
    /// final configuration is invalid.
    pub fn load(mut self) -> ConfigResult<ContourConfig> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Finish without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> ContourConfig {
        self.config
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> ConfigResult<()> {
        let scoped = format!("{prefix}_");
        let mut vars: Vec<(String, String)> = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(key, _)| key.starts_with(&scoped))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> ConfigResult<()> {
        let name = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix('_'))
            .ok_or_else(|| ConfigError::env(key, "invalid key format"))?;

        let config = &mut self.config;
        match name {
            "SERVER_HTTP_ADDR" => config.server.http_addr = value.to_string(),
            "SERVER_SHUTDOWN_TIMEOUT_SECS" => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            "SERVER_REQUEST_TIMEOUT_SECS" => {
                config.server.request_timeout_secs = parse_number(key, value)?;
            }
            "SERVER_INPUT_ERROR_STATUS" => {
                config.server.input_error_status = parse_number(key, value)?;
            }

            "LOGGING_ENABLED" => config.logging.enabled = parse_flag(key, value)?,
            "LOGGING_LEVEL" => config.logging.level = value.to_string(),
            "LOGGING_FORMAT" => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    "compact" => LogFormat::Compact,
                    _ => {
                        return Err(ConfigError::env(
                            key,
                            "expected 'json', 'pretty' or 'compact'",
                        ))
                    }
                };
            }
            "LOGGING_SPAN_EVENTS" => config.logging.span_events = parse_flag(key, value)?,
            "LOGGING_FILE_LINE_INFO" => config.logging.file_line_info = parse_flag(key, value)?,
            "LOGGING_INCLUDE_TARGET" => config.logging.include_target = parse_flag(key, value)?,

            "METRICS_ENABLED" => config.metrics.enabled = parse_flag(key, value)?,
            "METRICS_LISTEN_ADDR" => {
                config.metrics.listen_addr = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            "MULTIPART_MAX_BODY_SIZE" => config.multipart.max_body_size = parse_number(key, value)?,
            "MULTIPART_MAX_FIELD_SIZE" => {
                config.multipart.max_field_size = parse_number(key, value)?;
            }
            "MULTIPART_MAX_FIELDS" => config.multipart.max_fields = parse_number(key, value)?,

            // Unrelated variables sharing the prefix.
            _ => {}
        }
        Ok(())
    }
}

/// Deep-merges `layer` into `base`. Objects merge per key; anything else
/// replaces.
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env(key, "expected integer"))
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    parse_bool(value).ok_or_else(|| ConfigError::env(key, "expected boolean"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
