//! core::config::schema
//!
//! Configuration schema types.
//!
//! Located at (in order of precedence):
//! 1. `$DAGPATH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dagpath/config.toml`
//! 3. `~/.dagpath/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the API url must be an absolute http(s) URL).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// [api]
/// url = "http://127.0.0.1:5001"
/// timeout_secs = 30
///
/// [naming]
/// enabled = true
/// max_depth = 32
///
/// [logging]
/// level = "info"
/// format = "json"
///
/// [logging.modules]
/// "dagpath::rpc" = "debug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Remote RPC endpoint settings
    pub api: Option<ApiConfig>,

    /// Name resolution settings
    pub naming: Option<NamingConfig>,

    /// Logging settings
    pub logging: Option<LoggingConfig>,
}

impl Settings {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api) = &self.api {
            api.validate()?;
        }
        if let Some(naming) = &self.naming {
            naming.validate()?;
        }
        if let Some(logging) = &self.logging {
            logging.validate()?;
        }
        Ok(())
    }
}

/// Remote RPC endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the RPC API (default: "http://127.0.0.1:5001")
    pub url: Option<String>,

    /// Value for the `Authorization` header, e.g. "Bearer <token>"
    pub auth: Option<String>,

    /// Per-request timeout in seconds (no timeout if unset)
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Validate the API configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| ConfigError::InvalidValue(format!("invalid api url '{}': {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid api url '{}': scheme must be http or https",
                    url
                )));
            }
        }

        if let Some(auth) = &self.auth {
            if auth.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "api auth cannot be empty".to_string(),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "api timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Name resolution configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Whether mutable names may be resolved at all
    pub enabled: Option<bool>,

    /// Maximum number of record hops when resolving a name
    pub max_depth: Option<u32>,
}

impl NamingConfig {
    /// Upper bound for `max_depth`.
    pub const MAX_DEPTH_LIMIT: u32 = 128;

    /// Validate the naming configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(depth) = self.max_depth {
            if depth == 0 || depth > Self::MAX_DEPTH_LIMIT {
                return Err(ConfigError::InvalidValue(format!(
                    "naming max_depth must be between 1 and {}, got {}",
                    Self::MAX_DEPTH_LIMIT,
                    depth
                )));
            }
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub level: Option<String>,

    /// Output format: text or json
    pub format: Option<String>,

    /// Module-specific log levels
    pub modules: BTreeMap<String, String>,
}

impl LoggingConfig {
    /// Valid log levels.
    pub const VALID_LEVELS: &'static [&'static str] =
        &["trace", "debug", "info", "warn", "error", "off"];

    /// Valid output formats.
    pub const VALID_FORMATS: &'static [&'static str] = &["text", "json"];

    /// Validate the logging configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.level {
            Self::validate_level(level)?;
        }

        if let Some(format) = &self.format {
            if !Self::VALID_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log format '{}', must be one of: {}",
                    format,
                    Self::VALID_FORMATS.join(", ")
                )));
            }
        }

        for level in self.modules.values() {
            Self::validate_level(level)?;
        }

        Ok(())
    }

    fn validate_level(level: &str) -> Result<(), ConfigError> {
        if Self::VALID_LEVELS.contains(&level) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue(format!(
                "invalid log level '{}', must be one of: {}",
                level,
                Self::VALID_LEVELS.join(", ")
            )))
        }
    }
}
